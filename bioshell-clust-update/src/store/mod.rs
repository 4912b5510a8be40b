//! Packed sequence storage and the generic keyed record store it is built on top of.

mod key_index;
mod record_store;
mod sequence_store;

pub use key_index::{KeyIndex, KeyRecord};
pub use record_store::{FlatRecordStore, FlatRecordWriter, RecordStore, RecordWriter};
pub use sequence_store::SequenceStore;
