use crate::errors::ClustUpdateError;

/// Packed, offset-indexed immutable store of fixed-alphabet sequences.
///
/// `N` sequences of total length `T` are packed into one contiguous byte arena (`data`, length
/// `T + 1`, the extra byte is a sentinel slot that is never read past `T`) addressed by an
/// `offsets` table of length `N + 1`: sequence `i` occupies `data[offsets[i] .. offsets[i+1])`.
/// This mirrors `SequenceLookup` in the original tool one-for-one, translated from raw `new[]`
/// buffers to owned `Vec`s (or, in the borrowed constructor, to slices over buffers the caller
/// keeps alive).
///
/// Prefilter and alignment kernels scan sequences at rate; per-sequence heap indirection is
/// unacceptable. A single arena with an offsets table gives O(1) random access, cache-friendly
/// sequential scan, and once sealed the store needs no synchronization to be shared by concurrent
/// readers.
pub struct SequenceStore {
    data: SequenceData,
    offsets: Vec<u64>,
    total_bytes: u64,
    cursor: u64,
    filled: usize,
}

enum SequenceData {
    Owned(Vec<u8>),
    Borrowed(&'static [u8]),
}

impl SequenceData {
    fn as_slice(&self) -> &[u8] {
        match self {
            SequenceData::Owned(v) => v,
            SequenceData::Borrowed(s) => s,
        }
    }
}

impl SequenceStore {
    /// Allocates an empty, owned store for `n` sequences totalling `total_bytes` residues.
    pub fn new_owned(n: usize, total_bytes: usize) -> Result<Self, ClustUpdateError> {
        let data = vec![0u8; total_bytes + 1];
        let mut offsets = vec![0u64; n + 1];
        offsets[n] = total_bytes as u64;
        Ok(SequenceStore {
            data: SequenceData::Owned(data),
            offsets,
            total_bytes: total_bytes as u64,
            cursor: 0,
            filled: 0,
        })
    }

    /// Adopts externally-owned buffers in borrowed mode: the store never frees them.
    ///
    /// `offsets_buf` must already be fully populated (length `N + 1`, `offsets_buf[N] ==
    /// total_bytes`) — this is the Rust analogue of `SequenceLookup::initLookupByExternalData`,
    /// which simply assigns raw pointers without taking ownership, for a store that was filled
    /// by its caller before being handed over.
    pub fn from_external(data_buf: &'static [u8], total_bytes: usize, offsets_buf: Vec<u64>) -> Self {
        let filled = offsets_buf.len().saturating_sub(1);
        SequenceStore {
            data: SequenceData::Borrowed(data_buf),
            offsets: offsets_buf,
            total_bytes: total_bytes as u64,
            cursor: total_bytes as u64,
            filled,
        }
    }

    /// Appends `seq` at the running cursor; advances the cursor and the fill count by one slot.
    pub fn append(&mut self, seq: &[u8]) -> Result<(), ClustUpdateError> {
        if self.filled >= self.offsets.len() - 1 || self.cursor + seq.len() as u64 > self.total_bytes {
            return Err(ClustUpdateError::OverflowError {
                attempted: (self.cursor + seq.len() as u64) as usize,
                capacity: self.total_bytes as usize,
            });
        }
        let start = self.cursor as usize;
        if let SequenceData::Owned(buf) = &mut self.data {
            buf[start..start + seq.len()].copy_from_slice(seq);
        }
        self.offsets[self.filled] = self.cursor;
        self.cursor += seq.len() as u64;
        self.filled += 1;
        Ok(())
    }

    /// Random-position append used by parallel fillers: writes `seq` straight into
    /// `data[offset..]` and records `offsets[id] = offset`. The caller guarantees no two calls
    /// overlap.
    pub fn append_at(&mut self, seq: &[u8], id: usize, offset: u64) -> Result<(), ClustUpdateError> {
        let end = offset as usize + seq.len();
        if end as u64 > self.total_bytes {
            return Err(ClustUpdateError::OverflowError { attempted: end, capacity: self.total_bytes as usize });
        }
        if let SequenceData::Owned(buf) = &mut self.data {
            buf[offset as usize..end].copy_from_slice(seq);
        }
        self.offsets[id] = offset;
        self.filled = self.filled.max(id + 1);
        Ok(())
    }

    /// Returns a borrow into `data` for sequence `id`, plus its length.
    pub fn get(&self, id: usize) -> (&[u8], usize) {
        let start = self.offsets[id] as usize;
        let end = self.offsets[id + 1] as usize;
        (&self.data.as_slice()[start..end], end - start)
    }

    /// Number of sequences held by this store.
    pub fn len(&self) -> usize { self.offsets.len() - 1 }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The whole packed byte arena (length `T + 1`).
    pub fn data_bytes(&self) -> &[u8] { self.data.as_slice() }

    /// The offsets table (length `N + 1`).
    pub fn offsets(&self) -> &[u64] { &self.offsets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_get_round_trips() {
        let seqs: &[&[u8]] = &[b"MKT", b"ACDEFG", b"P"];
        let total: usize = seqs.iter().map(|s| s.len()).sum();
        let mut store = SequenceStore::new_owned(seqs.len(), total).unwrap();
        for s in seqs { store.append(s).unwrap(); }

        assert_eq!(store.len(), 3);
        for (i, s) in seqs.iter().enumerate() {
            let (bytes, len) = store.get(i);
            assert_eq!(len, s.len());
            assert_eq!(bytes, *s);
        }
        // concatenating get(0..N) reproduces data[0..T]
        let mut concatenated = Vec::new();
        for i in 0..store.len() { concatenated.extend_from_slice(store.get(i).0); }
        assert_eq!(&concatenated, &store.data_bytes()[..total]);
    }

    #[test]
    fn append_past_capacity_overflows() {
        let mut store = SequenceStore::new_owned(1, 2).unwrap();
        assert!(matches!(store.append(b"ABC"), Err(ClustUpdateError::OverflowError { .. })));
    }

    #[test]
    fn append_past_declared_count_overflows() {
        let mut store = SequenceStore::new_owned(1, 10).unwrap();
        store.append(b"AB").unwrap();
        assert!(matches!(store.append(b"C"), Err(ClustUpdateError::OverflowError { .. })));
    }

    #[test]
    fn length_is_offset_difference() {
        let mut store = SequenceStore::new_owned(2, 5).unwrap();
        store.append(b"AB").unwrap();
        store.append(b"CDE").unwrap();
        assert_eq!(store.offsets(), &[0, 2, 5]);
        assert_eq!(store.get(1).1, 3);
    }
}
