//! Incrementally updates a clustering of a sequence database to a new database version, without
//! re-clustering sequences the update didn't touch.

pub mod attach;
pub mod diff;
pub mod emit;
pub mod errors;
pub mod graph;
pub mod loader;
pub mod orchestrator;
pub mod similarity;
pub mod stats;
pub mod store;

pub use attach::{attach_matches, AttachStats};
pub use diff::{diff, DiffStats};
pub use emit::{emit_clustering, key_lookup};
pub use errors::ClustUpdateError;
pub use graph::ClusterGraph;
pub use loader::load_clustering;
pub use orchestrator::{run, Config};
pub use similarity::{DenovoClusterer, GreedySetCoverClusterer, KmerPrefilterAligner, SimilarityPipeline, SubstitutionMatrixChoice};
pub use stats::Stats;
pub use store::{FlatRecordStore, FlatRecordWriter, KeyIndex, KeyRecord, RecordStore, RecordWriter, SequenceStore};
