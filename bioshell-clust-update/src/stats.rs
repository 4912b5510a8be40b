/// Counts produced by a single [`run`](crate::orchestrator::run) invocation.
///
/// The original tool kept these as process-wide mutable globals (`oldDBSize`, `sharedSeqs`, ...);
/// here they are just a plain value threaded through the orchestrator and handed to the reporter
/// once the run finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// number of sequences in the previous database version
    pub old_db_size: usize,
    /// number of sequences in the current database version
    pub new_db_size: usize,
    /// sequences present in both database versions
    pub shared: usize,
    /// sequences present only in the previous database version
    pub deleted: usize,
    /// sequences present only in the current database version
    pub new_seqs: usize,
    /// new sequences that matched an existing cluster
    pub seqs_with_matches: usize,
    /// new sequences with no acceptable match, clustered de novo
    pub seqs_without_matches: usize,
    /// clusters created from the residual (B->B) clustering
    pub new_clusters: usize,
}

impl Stats {
    /// Renders a short human-readable report, in the spirit of the banner the original
    /// `clusterupdate()` tool printed at the end of a run.
    pub fn report(&self) -> String {
        format!(
            "previous database version: {} entries\n\
             new database version     : {} entries\n\
             {} entries were deleted, {} are new, {} are shared\n\
             {} new sequences matched the previous database version\n\
             remaining {} were grouped into {} new clusters",
            self.old_db_size, self.new_db_size,
            self.deleted, self.new_seqs, self.shared,
            self.seqs_with_matches,
            self.seqs_without_matches, self.new_clusters,
        )
    }
}
