use std::collections::HashMap;

struct Node {
    member_id: usize,
    next: Option<usize>,
}

/// In-memory clustering of a sequence database: for each representative id, a singly-linked
/// list of member ids, plus `memberId -> repId` and `repId -> clusterName` maps.
///
/// The original tool builds these lists out of heap-allocated `clu_entry_t` nodes chained by raw
/// `next` pointers (`original_source/src/workflow/Updating.cpp`). Here that becomes a
/// bump-allocated arena (`pool`) addressed by `next` *indices* rather than pointers: no per-insert
/// heap allocation, the graph stays relocatable, and the representation is trivially
/// serializable. `first`/`last`/`size` are indexed by id directly, as in the original
/// `cluster_t[seqDBSize]` array.
pub struct ClusterGraph {
    first: Vec<Option<usize>>,
    last: Vec<Option<usize>>,
    size: Vec<usize>,
    id_to_rep: Vec<Option<usize>>,
    rep_to_name: HashMap<usize, String>,
    pool: Vec<Node>,
}

impl ClusterGraph {
    /// Creates an empty graph with capacity for `capacity` sequence ids (the current DB size).
    pub fn new(capacity: usize) -> Self {
        ClusterGraph {
            first: vec![None; capacity],
            last: vec![None; capacity],
            size: vec![0; capacity],
            id_to_rep: vec![None; capacity],
            rep_to_name: HashMap::new(),
            pool: Vec::with_capacity(capacity),
        }
    }

    /// Number of ids this graph has capacity for.
    pub fn capacity(&self) -> usize { self.first.len() }

    /// Appends `id` to the member list of `rep`'s cluster and records `idToRep[id] = rep`.
    ///
    /// `rep` must already be a representative (have a name recorded via
    /// [`promote_representative`](Self::promote_representative)) or this call is establishing a
    /// member of a cluster whose representative was set up by a prior call — callers are
    /// responsible for that ordering, exactly as `appendToClustering` in the original tool
    /// assumes `readClustering` has already run.
    pub fn add_member(&mut self, rep: usize, id: usize) {
        let node_idx = self.pool.len();
        self.pool.push(Node { member_id: id, next: None });
        match self.last[rep] {
            Some(last_idx) => self.pool[last_idx].next = Some(node_idx),
            None => self.first[rep] = Some(node_idx),
        }
        self.last[rep] = Some(node_idx);
        self.size[rep] += 1;
        self.id_to_rep[id] = Some(rep);
    }

    /// Establishes `id` as a brand-new representative under `name`, and adds it as the first
    /// member of its own cluster.
    pub fn promote_representative(&mut self, id: usize, name: String) {
        self.rep_to_name.insert(id, name);
        self.add_member(id, id);
    }

    /// `true` if `id` is a representative (heads a non-empty cluster).
    pub fn is_representative(&self, id: usize) -> bool { self.size[id] > 0 }

    /// The size of the cluster represented by `rep` (0 if `rep` is not a representative).
    pub fn cluster_size(&self, rep: usize) -> usize { self.size[rep] }

    /// The representative of the cluster `id` belongs to, if any.
    pub fn rep_of(&self, id: usize) -> Option<usize> { self.id_to_rep[id] }

    /// The name recorded for representative `rep`, if any.
    pub fn name_of(&self, rep: usize) -> Option<&str> { self.rep_to_name.get(&rep).map(|s| s.as_str()) }

    /// Iterates the member ids of `rep`'s cluster in insertion order (loaded members first, then
    /// matched new members in the order they were attached).
    pub fn members_of(&self, rep: usize) -> MemberIter<'_> {
        MemberIter { pool: &self.pool, next: self.first[rep] }
    }

    /// Iterates every representative id in ascending order, together with its cluster name.
    /// Ids with an empty cluster (`size == 0`) are skipped.
    pub fn representatives(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        (0..self.first.len())
            .filter(move |&r| self.size[r] > 0)
            .map(move |r| (r, self.name_of(r).unwrap_or_default()))
    }

    /// Total number of ids that belong to some cluster — used by the invariant check that the
    /// union of all member lists equals the set of ids with a representative.
    pub fn total_members(&self) -> usize { self.id_to_rep.iter().filter(|r| r.is_some()).count() }
}

/// Iterator over the member ids of one cluster, walking the arena-backed linked list.
pub struct MemberIter<'a> {
    pool: &'a [Node],
    next: Option<usize>,
}

impl<'a> Iterator for MemberIter<'a> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        let idx = self.next?;
        let node = &self.pool[idx];
        self.next = node.next;
        Some(node.member_id)
    }
}
