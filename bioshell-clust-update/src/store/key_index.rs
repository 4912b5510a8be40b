use std::collections::HashMap;
use std::io::{BufRead, Write};
use bioshell_io::open_file;
use crate::errors::ClustUpdateError;

/// A single entry of a [`KeyIndex`]: the key of a record plus its `(offset, length)` slice
/// into the data blob it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: String,
    pub offset: u64,
    pub length: u64,
}

/// Sorted `(key, offset, length)` table describing named slices of an on-disk blob.
///
/// Entries are expected in ascending key order — [`crate::diff::diff`] and
/// [`FlatRecordStore`](crate::store::FlatRecordStore) both rely on that ordering. The on-disk
/// format is a tab-separated text table: one `<key>\t<offset>\t<length>\n` line per record.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    records: Vec<KeyRecord>,
    by_key: HashMap<String, usize>,
}

impl KeyIndex {
    /// An empty index.
    pub fn new() -> Self { KeyIndex { records: Vec::new(), by_key: HashMap::new() } }

    /// Appends a record; callers are responsible for keeping keys in ascending order.
    pub fn push(&mut self, key: String, offset: u64, length: u64) {
        let idx = self.records.len();
        self.by_key.insert(key.clone(), idx);
        self.records.push(KeyRecord { key, offset, length });
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// The record at a given logical position, in key-sorted order.
    pub fn record(&self, i: usize) -> &KeyRecord { &self.records[i] }

    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> { self.records.iter() }

    /// Logarithmic-free key lookup (backed by a hash map — the sortedness is what the two-pointer
    /// merge in [`crate::diff::diff`] needs, lookups themselves don't require it).
    pub fn get(&self, key: &str) -> Option<&KeyRecord> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }

    /// The logical position of `key` in this index, i.e. the id a [`RecordStore`](crate::store::RecordStore)
    /// backed by this index would assign it.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Reads a `KeyIndex` back from the tab-separated format written by [`KeyIndex::write_to`].
    pub fn from_file(path: &str) -> Result<Self, ClustUpdateError> {
        let reader = open_file(path)?;
        let mut index = KeyIndex::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() { continue; }
            let mut fields = line.splitn(3, '\t');
            let key = fields.next().unwrap_or_default().to_string();
            let offset: u64 = fields.next().unwrap_or("0").parse().unwrap_or(0);
            let length: u64 = fields.next().unwrap_or("0").parse().unwrap_or(0);
            index.push(key, offset, length);
        }
        Ok(index)
    }

    /// Writes this index out as one `<key>\t<offset>\t<length>` line per record.
    pub fn write_to(&self, mut w: impl Write) -> Result<(), ClustUpdateError> {
        for r in &self.records {
            writeln!(w, "{}\t{}\t{}", r.key, r.offset, r.length)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_through_text_format() {
        let mut idx = KeyIndex::new();
        idx.push("a".to_string(), 0, 4);
        idx.push("b".to_string(), 4, 6);

        let mut buf = Cursor::new(Vec::new());
        idx.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), "a\t0\t4\nb\t4\t6\n");
    }

    #[test]
    fn looks_up_by_key() {
        let mut idx = KeyIndex::new();
        idx.push("a".to_string(), 0, 4);
        idx.push("b".to_string(), 4, 6);
        assert_eq!(idx.get("b").unwrap().offset, 4);
        assert!(idx.get("c").is_none());
    }
}
