use crate::graph::ClusterGraph;
use crate::store::RecordStore;

/// Parses an existing clustering — a record store keyed by cluster name, payload of
/// newline-separated member keys — into a [`ClusterGraph`], resolving member keys against the
/// *current* sequence database.
///
/// Grounded directly on `readClustering` in `Updating.cpp`: for each record, tokenise the
/// payload, resolve each member key with `resolve`, skip members absent from the current
/// database, promote the first surviving member to representative, and drop the record silently
/// if every member was deleted. Unlike the original, tokens are produced as non-destructive
/// `&str` slices over the record's own payload rather than being copied into a scratch buffer
/// first.
///
/// Returns the number of records processed (used by the orchestrator to report how many fresh
/// clusters a de novo (B->B) clustering step folded in).
pub fn load_clustering(
    graph: &mut ClusterGraph,
    clustering: &impl RecordStore,
    resolve: impl Fn(&str) -> Option<usize>,
) -> usize {
    let n_records = clustering.len();
    for i in 0..n_records {
        let name = clustering.get_key(i).to_string();
        let payload = clustering.get_data(i);
        let text = std::str::from_utf8(payload).unwrap_or("");

        let mut rep: Option<usize> = None;
        for token in text.split('\n') {
            let token = token.trim();
            if token.is_empty() { continue; }
            let Some(member_id) = resolve(token) else { continue };

            match rep {
                None => {
                    rep = Some(member_id);
                    graph.promote_representative(member_id, name.clone());
                }
                Some(r) => graph.add_member(r, member_id),
            }
        }
    }
    n_records
}
