use crate::errors::ClustUpdateError;
use crate::graph::ClusterGraph;
use crate::store::RecordWriter;

/// Streams the final [`ClusterGraph`] out to a record store, one record per representative,
/// keyed by the representative's cluster name, with a payload of member keys joined by newlines
/// (representative first, matching the input shape [`crate::loader::load_clustering`] reads back).
///
/// Grounded on `Updating.cpp::writeResults`, which accumulates each cluster's member list into a
/// fixed-size buffer before flushing it to the output DB — a cluster whose members overflowed
/// that buffer was silently truncated. This implementation writes each cluster's member list
/// straight to `out` with no size cap, per the Open Question decision recorded in `DESIGN.md`.
pub fn emit_clustering(
    graph: &ClusterGraph,
    key_of: impl Fn(usize) -> String,
    out: &mut impl RecordWriter,
) -> Result<usize, ClustUpdateError> {
    let mut n_written = 0usize;
    for (rep, name) in graph.representatives() {
        let mut payload = String::new();
        for (i, member_id) in graph.members_of(rep).enumerate() {
            if i > 0 { payload.push('\n'); }
            payload.push_str(&key_of(member_id));
        }
        out.write(payload.as_bytes(), name)?;
        n_written += 1;
    }
    Ok(n_written)
}

/// Convenience `key_of` for when member ids directly index a [`crate::store::KeyIndex`] — the
/// common case once old and new ids have been unified by the orchestrator.
pub fn key_lookup<'a>(index: &'a crate::store::KeyIndex) -> impl Fn(usize) -> String + 'a {
    move |id| index.record(id).key.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FlatRecordStore, FlatRecordWriter, RecordStore};

    #[test]
    fn writes_one_record_per_representative_in_insertion_order() {
        let mut graph = ClusterGraph::new(4);
        graph.promote_representative(0, "C1".to_string());
        graph.add_member(0, 1);
        graph.promote_representative(2, "C2".to_string());
        graph.add_member(2, 3);

        let names = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let key_of = move |id: usize| names[id].clone();

        let path = std::env::temp_dir().join(format!("bioshell-clust-update-emit-{}", std::process::id())).to_str().unwrap().to_string();
        let mut w = FlatRecordWriter::create(&path).unwrap();
        let n = emit_clustering(&graph, key_of, &mut w).unwrap();
        w.close().unwrap();

        assert_eq!(n, 2);
        let store = FlatRecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_key(0), "C1");
        assert_eq!(store.get_data(0), b"a\nb");
        assert_eq!(store.get_key(1), "C2");
        assert_eq!(store.get_data(1), b"c\nd");

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn empty_graph_writes_nothing() {
        let graph = ClusterGraph::new(3);
        let path = std::env::temp_dir().join(format!("bioshell-clust-update-emit-empty-{}", std::process::id())).to_str().unwrap().to_string();
        let mut w = FlatRecordWriter::create(&path).unwrap();
        let n = emit_clustering(&graph, |id| id.to_string(), &mut w).unwrap();
        w.close().unwrap();
        assert_eq!(n, 0);
        let store = FlatRecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 0);

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }
}
