use thiserror::Error;

/// Errors that may appear while running an incremental clustering update
#[derive(Debug, Error)]
pub enum ClustUpdateError {
    #[error("can't allocate a sequence store of {total_bytes} bytes for {n_sequences} sequences")]
    /// A [`SequenceStore`](crate::store::SequenceStore) could not reserve its backing buffers
    AllocError { n_sequences: usize, total_bytes: usize },

    #[error("input is corrupt: {reason}; offending key: {key}")]
    /// An alignment record names a target absent from the current database, or an index
    /// file violates the sort order its reader assumes
    CorruptInput { reason: String, key: String },

    #[error("tried to append {attempted} bytes past the declared capacity of {capacity} bytes")]
    /// An `append` call would write past the store's declared capacity
    OverflowError { attempted: usize, capacity: usize },

    #[error("sub-stage '{stage}' failed: {reason}")]
    /// A prefilter/alignment/clustering sub-stage reported failure
    SubstageFailure { stage: String, reason: String },

    #[error("general I/O error occurred while running the update")]
    /// I/O error occurred while reading or writing a record store, index or sequence file
    Io(#[from] std::io::Error),
}
