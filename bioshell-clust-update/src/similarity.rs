use std::collections::{HashMap, HashSet};

use bioshell_seq::alignment::{aligned_sequences, GlobalAligner};
use bioshell_seq::scoring::{SequenceSimilarityScore, SubstitutionMatrixList};
use bioshell_seq::sequence::{count_identical, Sequence};
use log::debug;

use crate::errors::ClustUpdateError;
use crate::store::{FlatRecordStore, FlatRecordWriter, KeyIndex, RecordStore, RecordWriter};
use crate::store::SequenceStore;

/// Searches every sequence in `queries` against every sequence in `targets` and writes one hit
/// record per query, keyed by the query's own key, with a payload of newline-separated
/// `targetKey\tidentity` lines ordered best match first (empty payload if nothing passed the
/// identity threshold).
///
/// This trait is the pluggable search step used both for the B->A step (matching new sequences
/// against the surviving old ones) and the residual B->B search step that feeds
/// [`DenovoClusterer`]. A single method serves both: [`crate::attach::attach_matches`] only reads
/// the first line of a hit record, a de novo clusterer reads every line as a neighbor edge.
pub trait SimilarityPipeline {
    fn search(
        &self,
        queries: &SequenceStore,
        query_index: &KeyIndex,
        targets: &SequenceStore,
        target_index: &KeyIndex,
        out: &mut FlatRecordWriter,
    ) -> Result<(), ClustUpdateError>;
}

/// Groups sequences left over after B->A attachment (the residual set) into brand-new clusters,
/// using a precomputed B->B hit store as the adjacency graph.
///
/// Output is a clustering record store in the same shape [`crate::loader::load_clustering`]
/// expects: one record per new cluster, keyed by the chosen representative's sequence key, with a
/// payload of newline-separated member keys (representative first).
pub trait DenovoClusterer {
    fn cluster(
        &self,
        seqs: &SequenceStore,
        residual_index: &KeyIndex,
        hits: &FlatRecordStore,
        out: &mut FlatRecordWriter,
    ) -> Result<(), ClustUpdateError>;
}

/// Generates k-mers of length `k` from `seq` as owned byte vectors.
///
/// `bucket_clustering` in `bioshell-seq` borrows k-mers straight out of the sequence they came
/// from; here queries and targets are stored in two separate [`SequenceStore`] arenas, so k-mers
/// are collected as owned `Vec<u8>` instead to avoid tying the hash set's lifetime to whichever
/// arena happens to outlive the loop.
fn generate_kmers(seq: &[u8], k: usize) -> HashSet<Vec<u8>> {
    let mut kmers = HashSet::new();
    if seq.len() < k { return kmers; }
    for i in 0..=seq.len() - k {
        kmers.insert(seq[i..i + k].to_vec());
    }
    kmers
}

/// Bounds on sequence identity implied by a count of differing k-mers, as in `bucket_clustering`.
fn kmer_identity_bounds(different_kmers: usize, kmer_len: usize, shorter_len: usize) -> (f32, f32) {
    if shorter_len == 0 { return (0.0, 0.0); }
    let min_mutations = different_kmers / kmer_len + 1;
    let upper = (shorter_len - min_mutations.min(shorter_len)) as f32 / shorter_len as f32;
    let max_mutations = different_kmers + kmer_len - 1;
    let lower = (shorter_len as isize - max_mutations as isize).max(0) as f32 / shorter_len as f32;
    (lower.max(0.0), upper.min(1.0))
}

/// Word length heuristic matching `bucket_clustering::suggest_word_length`.
fn suggest_word_length(identity_level: f32) -> usize {
    match identity_level {
        x if x >= 0.95 => 6,
        x if x >= 0.90 => 5,
        x if x >= 0.85 => 5,
        x if x >= 0.80 => 4,
        x if x >= 0.75 => 4,
        x if x >= 0.70 => 3,
        x if x >= 0.60 => 3,
        x if x >= 0.50 => 2,
        _ => 1,
    }
}

/// Which shipped substitution matrix a [`KmerPrefilterAligner`] scores alignments with.
///
/// `bioshell_seq::scoring::SubstitutionMatrixList` carries no derives, so it can't be stashed in
/// a field and reused across calls without being moved out from behind a shared reference; this
/// small `Copy` enum is the knob `KmerPrefilterAligner` actually stores, translated to the
/// teacher's enum at the point each alignment is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionMatrixChoice {
    Blosum45,
    Blosum80,
    Pam250,
    Pam70,
    Blosum62,
    Pam120,
    Pam30,
}

impl std::str::FromStr for SubstitutionMatrixChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blosum45" => Ok(SubstitutionMatrixChoice::Blosum45),
            "blosum80" => Ok(SubstitutionMatrixChoice::Blosum80),
            "blosum62" => Ok(SubstitutionMatrixChoice::Blosum62),
            "pam250" => Ok(SubstitutionMatrixChoice::Pam250),
            "pam70" => Ok(SubstitutionMatrixChoice::Pam70),
            "pam120" => Ok(SubstitutionMatrixChoice::Pam120),
            "pam30" => Ok(SubstitutionMatrixChoice::Pam30),
            other => Err(format!("unknown substitution matrix '{other}'")),
        }
    }
}

impl SubstitutionMatrixChoice {
    fn to_teacher(self) -> SubstitutionMatrixList {
        match self {
            SubstitutionMatrixChoice::Blosum45 => SubstitutionMatrixList::BLOSUM45,
            SubstitutionMatrixChoice::Blosum80 => SubstitutionMatrixList::BLOSUM80,
            SubstitutionMatrixChoice::Pam250 => SubstitutionMatrixList::PAM250,
            SubstitutionMatrixChoice::Pam70 => SubstitutionMatrixList::PAM70,
            SubstitutionMatrixChoice::Blosum62 => SubstitutionMatrixList::BLOSUM62,
            SubstitutionMatrixChoice::Pam120 => SubstitutionMatrixList::PAM120,
            SubstitutionMatrixChoice::Pam30 => SubstitutionMatrixList::PAM30,
        }
    }
}

/// A [`SimilarityPipeline`] and [`DenovoClusterer`] built on the same k-mer prefilter plus
/// Needleman-Wunsch fallback as `bucket_clustering`: fast inclusion/exclusion from k-mer identity
/// bounds, falling back to an exact global alignment only when the bounds straddle `min_seq_id`.
pub struct KmerPrefilterAligner {
    min_seq_id: f32,
    matrix: SubstitutionMatrixChoice,
    max_hits: usize,
}

impl KmerPrefilterAligner {
    pub fn new(min_seq_id: f32) -> Self {
        KmerPrefilterAligner { min_seq_id, matrix: SubstitutionMatrixChoice::Blosum62, max_hits: usize::MAX }
    }

    pub fn with_options(min_seq_id: f32, matrix: SubstitutionMatrixChoice, max_hits: usize) -> Self {
        KmerPrefilterAligner { min_seq_id, matrix, max_hits }
    }

    fn identity(&self, aligner: &mut GlobalAligner<SequenceSimilarityScore>, scoring: &mut SequenceSimilarityScore, query: &Sequence, target: &Sequence) -> Result<f32, ClustUpdateError> {
        scoring.query_from_sequence(query);
        scoring.template_from_sequence(target);
        aligner.align(scoring, -11, -1);
        let path = aligner.backtrace();
        let (ali_q, ali_t) = aligned_sequences(&path, query, target, '-');
        let n_identical = count_identical(&ali_q, &ali_t).map_err(|e| ClustUpdateError::SubstageFailure {
            stage: "similarity".to_string(),
            reason: e.to_string(),
        })?;
        let shorter = query.len().min(target.len());
        Ok(if shorter == 0 { 0.0 } else { n_identical as f32 / shorter as f32 })
    }
}

impl SimilarityPipeline for KmerPrefilterAligner {
    fn search(
        &self,
        queries: &SequenceStore,
        query_index: &KeyIndex,
        targets: &SequenceStore,
        target_index: &KeyIndex,
        out: &mut FlatRecordWriter,
    ) -> Result<(), ClustUpdateError> {
        let word_size = suggest_word_length(self.min_seq_id);

        let longest = (0..targets.len()).map(|i| targets.get(i).1)
            .chain((0..queries.len()).map(|i| queries.get(i).1))
            .max().unwrap_or(1).max(1);
        let mut aligner: GlobalAligner<SequenceSimilarityScore> = GlobalAligner::new(longest);
        let mut scoring = SequenceSimilarityScore::new(self.matrix.to_teacher());

        let target_kmers: Vec<HashSet<Vec<u8>>> = (0..targets.len())
            .map(|i| generate_kmers(targets.get(i).0, word_size))
            .collect();

        let mut n_aligned = 0usize;
        for qi in 0..queries.len() {
            let (qseq_bytes, qlen) = queries.get(qi);
            let qkey = &query_index.record(qi).key;
            let qkmers = generate_kmers(qseq_bytes, word_size);
            let qseq_str = std::str::from_utf8(qseq_bytes).map_err(|_| ClustUpdateError::CorruptInput {
                reason: "sequence is not valid UTF-8".to_string(),
                key: qkey.clone(),
            })?;
            let query_seq = Sequence::from_str(qkey, qseq_str);

            let mut hits: Vec<(f32, &str)> = Vec::new();
            for ti in 0..targets.len() {
                let tkey = &target_index.record(ti).key;
                if tkey == qkey { continue; }
                let (tseq_bytes, tlen) = targets.get(ti);

                let shared = qkmers.intersection(&target_kmers[ti]).count();
                let different = qkmers.len().saturating_sub(shared);
                let shorter = qlen.min(tlen);
                let (lower, upper) = kmer_identity_bounds(different, word_size, shorter);

                if lower >= self.min_seq_id {
                    hits.push((lower, tkey.as_str()));
                    continue;
                }
                if upper < self.min_seq_id { continue; }

                debug!("identity in range {lower:.2}..{upper:.2} for {qkey}/{tkey}, aligning");
                let tseq_str = std::str::from_utf8(tseq_bytes).map_err(|_| ClustUpdateError::CorruptInput {
                    reason: "sequence is not valid UTF-8".to_string(),
                    key: tkey.clone(),
                })?;
                let target_seq = Sequence::from_str(tkey, tseq_str);
                let identity = self.identity(&mut aligner, &mut scoring, &query_seq, &target_seq)?;
                n_aligned += 1;
                if identity >= self.min_seq_id {
                    hits.push((identity, tkey.as_str()));
                }
            }

            hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            hits.truncate(self.max_hits);
            let payload = hits.iter().map(|(identity, k)| format!("{k}\t{identity:.4}")).collect::<Vec<_>>().join("\n");
            out.write(payload.as_bytes(), qkey)?;
        }
        debug!("similarity search ran {n_aligned} exact alignments");
        Ok(())
    }
}

/// Greedy set-cover clustering of the residual sequences, using a precomputed B->B hit store as
/// the neighbor graph: repeatedly pick the uncovered sequence with the most uncovered neighbors
/// as a new representative and fold its neighbors in, until every residual sequence is covered.
pub struct GreedySetCoverClusterer;

impl DenovoClusterer for GreedySetCoverClusterer {
    fn cluster(
        &self,
        _seqs: &SequenceStore,
        residual_index: &KeyIndex,
        hits: &FlatRecordStore,
        out: &mut FlatRecordWriter,
    ) -> Result<(), ClustUpdateError> {
        let mut neighbors: HashMap<String, Vec<String>> = HashMap::new();
        for i in 0..hits.len() {
            let key = hits.get_key(i).to_string();
            let payload = hits.get_data(i);
            let text = std::str::from_utf8(payload).unwrap_or("");
            let list: Vec<String> = text.split('\n')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.split('\t').next().unwrap_or(s).to_string())
                .collect();
            neighbors.insert(key, list);
        }

        let mut covered: HashSet<String> = HashSet::new();
        let all_keys: Vec<String> = residual_index.iter().map(|r| r.key.clone()).collect();

        loop {
            let mut best: Option<(&str, usize)> = None;
            for key in &all_keys {
                if covered.contains(key) { continue; }
                let uncovered_neighbors = neighbors.get(key)
                    .map(|ns| ns.iter().filter(|n| !covered.contains(*n)).count())
                    .unwrap_or(0);
                if best.map(|(_, n)| uncovered_neighbors > n).unwrap_or(true) {
                    best = Some((key.as_str(), uncovered_neighbors));
                }
            }
            let Some((rep_key, _)) = best else { break };
            if covered.contains(rep_key) { break; }

            let mut members = vec![rep_key.to_string()];
            covered.insert(rep_key.to_string());
            if let Some(ns) = neighbors.get(rep_key) {
                for n in ns {
                    if covered.insert(n.clone()) {
                        members.push(n.clone());
                    }
                }
            }

            let payload = members.join("\n");
            out.write(payload.as_bytes(), rep_key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FlatRecordWriter;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir().join(format!("bioshell-clust-update-similarity-{name}-{}", std::process::id())).to_str().unwrap().to_string()
    }

    fn store_of(seqs: &[(&str, &str)]) -> (SequenceStore, KeyIndex) {
        let total: usize = seqs.iter().map(|(_, s)| s.len()).sum();
        let mut store = SequenceStore::new_owned(seqs.len(), total).unwrap();
        let mut index = KeyIndex::new();
        let mut offset = 0u64;
        for (key, seq) in seqs {
            store.append(seq.as_bytes()).unwrap();
            index.push(key.to_string(), offset, seq.len() as u64);
            offset += seq.len() as u64;
        }
        (store, index)
    }

    #[test]
    fn identical_sequences_produce_a_hit() {
        let (queries, qidx) = store_of(&[("q1", "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWELVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWSTPSELGHAGLNGDILVWNPVLEDAFELSSMGIRVDADTLKHQLALTGDEDRLELEWHQALLRGEMPQTIGGGIGQSRLTMLLLQLPHIGQVQAGVWPAAVRESVPSLL")]);
        let (targets, tidx) = store_of(&[("t1", "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWELVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWSTPSELGHAGLNGDILVWNPVLEDAFELSSMGIRVDADTLKHQLALTGDEDRLELEWHQALLRGEMPQTIGGGIGQSRLTMLLLQLPHIGQVQAGVWPAAVRESVPSLL")]);

        let path = temp_path("hits1");
        let mut w = FlatRecordWriter::create(&path).unwrap();
        let pipeline = KmerPrefilterAligner::new(0.9);
        pipeline.search(&queries, &qidx, &targets, &tidx, &mut w).unwrap();
        w.close().unwrap();

        let store = FlatRecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        let payload = std::str::from_utf8(store.get_data(0)).unwrap();
        let mut fields = payload.split('\t');
        assert_eq!(fields.next(), Some("t1"));
        let identity: f32 = fields.next().unwrap().parse().unwrap();
        assert!(identity >= 0.9);

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn unrelated_sequences_produce_no_hit() {
        let (queries, qidx) = store_of(&[("q1", "MKTAYIAKQRQISFVKSHFSRQ")]);
        let (targets, tidx) = store_of(&[("t1", "GGGGGGGGGGGGGGGGGGGGGG")]);

        let path = temp_path("hits2");
        let mut w = FlatRecordWriter::create(&path).unwrap();
        KmerPrefilterAligner::new(0.9).search(&queries, &qidx, &targets, &tidx, &mut w).unwrap();
        w.close().unwrap();

        let store = FlatRecordStore::open(&path).unwrap();
        assert_eq!(store.get_data(0), b"");

        std::fs::remove_file(&path).ok();
        std::fs::remove_file(format!("{path}.index")).ok();
    }

    #[test]
    fn greedy_set_cover_groups_connected_residuals() {
        let hits_path = temp_path("bbhits");
        let mut w = FlatRecordWriter::create(&hits_path).unwrap();
        w.write(b"b\t0.9800\nc\t0.9500", "a").unwrap();
        w.write(b"a\t0.9800", "b").unwrap();
        w.write(b"a\t0.9500", "c").unwrap();
        w.write(b"", "d").unwrap();
        w.close().unwrap();
        let hits = FlatRecordStore::open(&hits_path).unwrap();

        let mut residual_index = KeyIndex::new();
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() { residual_index.push(k.to_string(), i as u64, 1); }
        let (seqs, _) = store_of(&[("a", "M"), ("b", "M"), ("c", "M"), ("d", "M")]);

        let out_path = temp_path("newclusters");
        let mut out = FlatRecordWriter::create(&out_path).unwrap();
        GreedySetCoverClusterer.cluster(&seqs, &residual_index, &hits, &mut out).unwrap();
        out.close().unwrap();

        let clusters = FlatRecordStore::open(&out_path).unwrap();
        assert_eq!(clusters.len(), 2); // {a,b,c} and {d}
        assert_eq!(clusters.get_key(0), "a");
        assert_eq!(clusters.get_data(0), b"a\nb\nc");
        assert_eq!(clusters.get_key(1), "d");

        std::fs::remove_file(&hits_path).ok();
        std::fs::remove_file(format!("{hits_path}.index")).ok();
        std::fs::remove_file(&out_path).ok();
        std::fs::remove_file(format!("{out_path}.index")).ok();
    }
}
