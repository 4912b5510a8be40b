use crate::graph::ClusterGraph;
use crate::store::{KeyIndex, RecordStore};

/// Outcome counts of a single [`attach_matches`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttachStats {
    pub attached: usize,
    pub residual: usize,
    pub anomalies: usize,
}

/// Appends B->A search hits onto the clustering loaded into `graph`, and returns the subset of
/// `B` that matched nothing — the residual index later fed to a de novo clustering step.
///
/// `hits` is keyed by query key (a sequence only present in the new database) with a payload of
/// newline-separated `targetKey\tidentity` lines, best hit first; an empty payload means the
/// query matched nothing. Only the first line is used — `appendToClustering` in the original tool
/// takes just the best hit per query, it does not fold in every alignment a query produced.
///
/// Grounded on `Updating.cpp::appendToClustering`: resolve the target's representative via
/// `idToRep`, append the query to that cluster. A target key that isn't in the current database
/// at all is a corrupt search result and aborts the whole update (`CorruptInput`); a target that
/// *is* in the current database but carries no representative is a non-fatal clustering anomaly —
/// logged and the query is dropped (not routed to residual), per the Open Question decision
/// recorded in `DESIGN.md`.
pub fn attach_matches(
    graph: &mut ClusterGraph,
    hits: &impl RecordStore,
    new_index: &KeyIndex,
    id_of: impl Fn(&str) -> Option<usize>,
) -> Result<(KeyIndex, AttachStats), crate::errors::ClustUpdateError> {
    use crate::errors::ClustUpdateError;

    let mut residual = KeyIndex::new();
    let mut stats = AttachStats::default();

    let mut push_residual = |key: &str, stats: &mut AttachStats| {
        if let Some(rec) = new_index.get(key) {
            residual.push(rec.key.clone(), rec.offset, rec.length);
        }
        stats.residual += 1;
    };

    for i in 0..hits.len() {
        let query_key = hits.get_key(i);
        let payload = hits.get_data(i);
        let text = std::str::from_utf8(payload).unwrap_or("");
        let best_line = text.split('\n').map(|line| line.trim()).find(|line| !line.is_empty());

        let Some(best_line) = best_line else {
            push_residual(query_key, &mut stats);
            continue;
        };
        let target_key = best_line.split('\t').next().unwrap_or(best_line);

        let target_id = id_of(target_key).ok_or_else(|| ClustUpdateError::CorruptInput {
            reason: "search hit names a target absent from the current database".to_string(),
            key: target_key.to_string(),
        })?;
        let query_id = id_of(query_key).ok_or_else(|| ClustUpdateError::CorruptInput {
            reason: "search hit names a query absent from the current database".to_string(),
            key: query_key.to_string(),
        })?;

        match graph.rep_of(target_id) {
            Some(rep) => {
                graph.add_member(rep, query_id);
                stats.attached += 1;
            }
            None => {
                log::warn!(
                    "clustering anomaly: target '{target_key}' has no representative, dropping query '{query_key}'"
                );
                stats.anomalies += 1;
            }
        }
    }

    Ok((residual, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FlatRecordStore, FlatRecordWriter, RecordWriter};
    use std::collections::HashMap;

    fn hits_store(records: &[(&str, &str)]) -> (FlatRecordStore, String) {
        let path = std::env::temp_dir()
            .join(format!("bioshell-clust-update-attach-{}-{}", std::process::id(), records.len()))
            .to_str().unwrap().to_string();
        let mut w = FlatRecordWriter::create(&path).unwrap();
        for (key, payload) in records { w.write(payload.as_bytes(), key).unwrap(); }
        w.close().unwrap();
        (FlatRecordStore::open(&path).unwrap(), path)
    }

    fn index_of(keys: &[&str]) -> KeyIndex {
        let mut idx = KeyIndex::new();
        for (i, k) in keys.iter().enumerate() { idx.push(k.to_string(), (i * 10) as u64, 5); }
        idx
    }

    fn resolver(keys: &[&str]) -> impl Fn(&str) -> Option<usize> + '_ {
        let map: HashMap<&str, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        move |k: &str| map.get(k).copied()
    }

    #[test]
    fn attaches_query_to_best_targets_cluster() {
        let (hits, path) = hits_store(&[("q1", "t1\t0.95\nt2\t0.80\n")]);
        let new_index = index_of(&["t1", "t2", "q1"]);
        let mut graph = ClusterGraph::new(3);
        graph.promote_representative(0, "C1".to_string()); // t1 is id 0

        let (residual, stats) = attach_matches(&mut graph, &hits, &new_index, resolver(&["t1", "t2", "q1"])).unwrap();
        assert_eq!(stats, AttachStats { attached: 1, residual: 0, anomalies: 0 });
        assert!(residual.is_empty());
        assert_eq!(graph.members_of(0).collect::<Vec<_>>(), vec![0, 2]);

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn empty_payload_routes_to_residual() {
        let (hits, path) = hits_store(&[("q1", "")]);
        let new_index = index_of(&["q1"]);
        let mut graph = ClusterGraph::new(1);

        let (residual, stats) = attach_matches(&mut graph, &hits, &new_index, resolver(&["q1"])).unwrap();
        assert_eq!(stats, AttachStats { attached: 0, residual: 1, anomalies: 0 });
        assert_eq!(residual.len(), 1);
        assert_eq!(residual.record(0).key, "q1");

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn target_without_representative_is_a_non_fatal_anomaly() {
        let (hits, path) = hits_store(&[("q1", "t1\t0.95\n")]);
        let new_index = index_of(&["t1", "q1"]);
        let mut graph = ClusterGraph::new(2); // t1 (id 0) never promoted to a representative

        let (residual, stats) = attach_matches(&mut graph, &hits, &new_index, resolver(&["t1", "q1"])).unwrap();
        assert_eq!(stats, AttachStats { attached: 0, residual: 0, anomalies: 1 });
        assert!(residual.is_empty());

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn target_absent_from_current_db_is_fatal() {
        let (hits, path) = hits_store(&[("q1", "ghost\t0.95\n")]);
        let new_index = index_of(&["q1"]);
        let mut graph = ClusterGraph::new(1);

        let err = attach_matches(&mut graph, &hits, &new_index, resolver(&["q1"])).unwrap_err();
        assert!(matches!(err, crate::errors::ClustUpdateError::CorruptInput { .. }));

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }
}
