use std::fs::File;
use std::io::{Read, Write};
use bioshell_io::out_writer;
use crate::errors::ClustUpdateError;
use crate::store::key_index::KeyIndex;

/// A generic keyed record store: a named payload of bytes per record, addressable both by its
/// textual key and by its integer position (`id`) in key-sorted order.
///
/// Every downstream component (diff, loader, attach, similarity, emit) only ever calls these
/// four methods, so any storage backend that implements them can be dropped in.
pub trait RecordStore {
    fn len(&self) -> usize;
    fn get_key(&self, id: usize) -> &str;
    fn get_data(&self, id: usize) -> &[u8];
    fn id_of(&self, key: &str) -> Option<usize>;
}

/// Writer side of a [`RecordStore`]: appends `(key, data)` pairs and produces the store's
/// `.index` sidecar on close.
pub trait RecordWriter {
    fn write(&mut self, data: &[u8], key: &str) -> Result<(), ClustUpdateError>;
    fn close(self) -> Result<(), ClustUpdateError>;
}

/// A [`RecordStore`] backed by one flat data file plus a [`KeyIndex`] sidecar.
///
/// Modeled on the `DBReader`/`ffindex` pair in the original tool: the data file is one
/// contiguous blob, and the index gives `(key, offset, length)` slices into it in key-sorted
/// order. The whole blob is read into memory once on open — records are then borrowed slices,
/// no further I/O.
pub struct FlatRecordStore {
    data: Vec<u8>,
    index: KeyIndex,
}

impl FlatRecordStore {
    /// Opens a record store whose data file lives at `data_path` and whose index lives at
    /// `<data_path>.index`.
    pub fn open(data_path: &str) -> Result<Self, ClustUpdateError> {
        let mut data = Vec::new();
        File::open(data_path)?.read_to_end(&mut data)?;
        let index = KeyIndex::from_file(&format!("{data_path}.index"))?;
        Ok(FlatRecordStore { data, index })
    }

    /// The [`KeyIndex`] backing this store, e.g. to hand to [`IndexDiffer`](crate::diff::IndexDiffer).
    pub fn index(&self) -> &KeyIndex { &self.index }
}

impl RecordStore for FlatRecordStore {
    fn len(&self) -> usize { self.index.len() }

    fn get_key(&self, id: usize) -> &str { &self.index.record(id).key }

    fn get_data(&self, id: usize) -> &[u8] {
        let r = self.index.record(id);
        let start = r.offset as usize;
        let end = start + r.length as usize;
        &self.data[start..end]
    }

    fn id_of(&self, key: &str) -> Option<usize> {
        self.index.position_of(key)
    }
}

/// Writer side of a [`FlatRecordStore`]: appends payloads to a growing data file and accumulates
/// the matching [`KeyIndex`], written out on [`close`](RecordWriter::close).
pub struct FlatRecordWriter {
    data_path: String,
    file: File,
    cursor: u64,
    index: KeyIndex,
}

impl FlatRecordWriter {
    /// Creates (truncating) the data file at `data_path`; its index will be written to
    /// `<data_path>.index` on close.
    pub fn create(data_path: &str) -> Result<Self, ClustUpdateError> {
        let file = File::create(data_path)?;
        Ok(FlatRecordWriter { data_path: data_path.to_string(), file, cursor: 0, index: KeyIndex::new() })
    }
}

impl RecordWriter for FlatRecordWriter {
    fn write(&mut self, data: &[u8], key: &str) -> Result<(), ClustUpdateError> {
        self.file.write_all(data)?;
        self.index.push(key.to_string(), self.cursor, data.len() as u64);
        self.cursor += data.len() as u64;
        Ok(())
    }

    fn close(self) -> Result<(), ClustUpdateError> {
        let mut index_file = out_writer(&format!("{}.index", self.data_path), false);
        self.index.write_to(&mut index_file)?;
        index_file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> String {
        env::temp_dir().join(format!("bioshell-clust-update-test-{name}-{}", std::process::id())).to_str().unwrap().to_string()
    }

    #[test]
    fn writes_and_reads_back_records() {
        let path = temp_path("recstore");
        let mut w = FlatRecordWriter::create(&path).unwrap();
        w.write(b"MKT", "seq1").unwrap();
        w.write(b"ACDE", "seq2").unwrap();
        w.close().unwrap();

        let store = FlatRecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_key(0), "seq1");
        assert_eq!(store.get_data(0), b"MKT");
        assert_eq!(store.get_key(1), "seq2");
        assert_eq!(store.get_data(1), b"ACDE");
        assert_eq!(store.id_of("seq2"), Some(1));
        assert_eq!(store.id_of("missing"), None);

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }
}
