use crate::store::KeyIndex;

/// Statistics produced by a single [`diff`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub deleted: usize,
    pub shared: usize,
    pub new: usize,
}

/// Three-way partition of an old and a new [`KeyIndex`] into the keys present in both (`A`) and
/// the keys present only in the new index (`B`), plus a count of keys present only in the old
/// index (deleted).
///
/// A two-pointer merge on lexicographic key order, translated line-for-line from
/// `Updating.cpp::writeIndexes`: on equal keys, emit to `A` (taking offset/length from `new`) and
/// advance both pointers; on `old < new`, count a deletion and advance `old`; on `old > new`, emit
/// to `B` and advance `new`; finally drain whichever side has a tail left.
pub fn diff(old: &KeyIndex, new: &KeyIndex) -> (KeyIndex, KeyIndex, DiffStats) {
    let mut a = KeyIndex::new();
    let mut b = KeyIndex::new();
    let mut stats = DiffStats::default();

    let mut i = 0usize;
    let mut j = 0usize;
    while i < old.len() && j < new.len() {
        let oi = old.record(i);
        let nj = new.record(j);
        match oi.key.cmp(&nj.key) {
            std::cmp::Ordering::Equal => {
                a.push(nj.key.clone(), nj.offset, nj.length);
                stats.shared += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                stats.deleted += 1;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                b.push(nj.key.clone(), nj.offset, nj.length);
                stats.new += 1;
                j += 1;
            }
        }
    }
    while i < old.len() {
        stats.deleted += 1;
        i += 1;
    }
    while j < new.len() {
        let nj = new.record(j);
        b.push(nj.key.clone(), nj.offset, nj.length);
        stats.new += 1;
        j += 1;
    }

    (a, b, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(keys: &[&str]) -> KeyIndex {
        let mut idx = KeyIndex::new();
        for (i, k) in keys.iter().enumerate() {
            idx.push(k.to_string(), (i * 10) as u64, 5);
        }
        idx
    }

    fn keys_of(idx: &KeyIndex) -> Vec<String> { idx.iter().map(|r| r.key.clone()).collect() }

    #[test]
    fn all_shared_when_databases_are_identical() {
        let old = index_of(&["a", "b", "c"]);
        let new = index_of(&["a", "b", "c"]);
        let (a, b, stats) = diff(&old, &new);
        assert_eq!(keys_of(&a), vec!["a", "b", "c"]);
        assert!(b.is_empty());
        assert_eq!(stats, DiffStats { deleted: 0, shared: 3, new: 0 });
    }

    #[test]
    fn empty_old_puts_everything_in_b() {
        let old = index_of(&[]);
        let new = index_of(&["x", "y"]);
        let (a, b, stats) = diff(&old, &new);
        assert!(a.is_empty());
        assert_eq!(keys_of(&b), vec!["x", "y"]);
        assert_eq!(stats, DiffStats { deleted: 0, shared: 0, new: 2 });
    }

    #[test]
    fn empty_new_deletes_everything() {
        let old = index_of(&["x", "y"]);
        let new = index_of(&[]);
        let (a, b, stats) = diff(&old, &new);
        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(stats, DiffStats { deleted: 2, shared: 0, new: 0 });
    }

    #[test]
    fn complete_and_disjoint() {
        let old = index_of(&["a", "b", "d"]);
        let new = index_of(&["b", "c", "d", "e"]);
        let (a, b, _stats) = diff(&old, &new);
        assert_eq!(keys_of(&a), vec!["b", "d"]);
        assert_eq!(keys_of(&b), vec!["c", "e"]);
    }
}
