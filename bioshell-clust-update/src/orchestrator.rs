use log::{info, warn};

use crate::attach::attach_matches;
use crate::diff::diff;
use crate::emit::emit_clustering;
use crate::errors::ClustUpdateError;
use crate::graph::ClusterGraph;
use crate::loader::load_clustering;
use crate::similarity::{DenovoClusterer, GreedySetCoverClusterer, KmerPrefilterAligner, SimilarityPipeline, SubstitutionMatrixChoice};
use crate::stats::Stats;
use crate::store::{FlatRecordStore, FlatRecordWriter, KeyIndex, RecordStore, RecordWriter, SequenceStore};

/// Tunables for a single [`run`] invocation, matching the `update` CLI surface (§6).
#[derive(Debug, Clone)]
pub struct Config {
    pub sub_mat: SubstitutionMatrixChoice,
    pub max_seqs: usize,
    pub max_seq_len: usize,
    pub min_seq_id: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config { sub_mat: SubstitutionMatrixChoice::Blosum62, max_seqs: 20, max_seq_len: 32000, min_seq_id: 0.3 }
    }
}

/// Packs every record named by `index` out of `db`'s data blob into a fresh [`SequenceStore`],
/// dropping (and logging) any entry longer than `max_seq_len` — the prefilter/alignment kernels
/// in the original tool refuse sequences past a configured length outright.
fn pack_filtered(db: &FlatRecordStore, index: &KeyIndex, max_seq_len: usize) -> Result<(SequenceStore, KeyIndex), ClustUpdateError> {
    let mut kept = KeyIndex::new();
    let mut n_dropped = 0usize;
    for rec in index.iter() {
        if rec.length as usize > max_seq_len {
            n_dropped += 1;
            continue;
        }
        kept.push(rec.key.clone(), rec.offset, rec.length);
    }
    if n_dropped > 0 {
        warn!("dropped {n_dropped} sequences longer than max_seq_len={max_seq_len}");
    }

    let total: usize = kept.iter().map(|r| r.length as usize).sum();
    let mut store = SequenceStore::new_owned(kept.len(), total)?;
    for rec in kept.iter() {
        let id = db.id_of(&rec.key).ok_or_else(|| ClustUpdateError::CorruptInput {
            reason: "index names a key absent from its own database".to_string(),
            key: rec.key.clone(),
        })?;
        store.append(db.get_data(id))?;
    }
    Ok((store, kept))
}

/// Runs one incremental clustering update end to end: diffs `old_db`'s key index against
/// `new_db`'s, attaches every matched new sequence onto `old_clustering`, de novo clusters
/// whatever is left over, and writes the folded clustering to `out_db`.
///
/// Mirrors the state machine `Updating.cpp::clusterupdate` drives (INIT -> DIFFED -> BA_SCORED ->
/// ATTACHED -> [BB_SCORED -> BB_CLUSTERED -> FOLDED] -> DONE): each stage below corresponds to one
/// named state, and a failure at any stage aborts before `out_db` is written — partial output is
/// never committed.
pub fn run(
    old_db_path: &str,
    new_db_path: &str,
    old_clustering_path: &str,
    out_db_path: &str,
    tmp_dir: &str,
    config: &Config,
) -> Result<Stats, ClustUpdateError> {
    // ---------- INIT ----------
    info!("opening old and new databases");
    let old_db = FlatRecordStore::open(old_db_path)?;
    let new_db = FlatRecordStore::open(new_db_path)?;
    let old_clustering = FlatRecordStore::open(old_clustering_path)?;

    // ---------- DIFFED ----------
    let (a_index, b_index, diff_stats) = diff(old_db.index(), new_db.index());
    info!(
        "diffed {} old / {} new keys: {} shared, {} deleted, {} new",
        old_db.len(), new_db.len(), diff_stats.shared, diff_stats.deleted, diff_stats.new
    );

    let mut graph = ClusterGraph::new(new_db.len());
    load_clustering(&mut graph, &old_clustering, |key| new_db.id_of(key));

    if b_index.is_empty() {
        info!("no new sequences, nothing to attach or cluster");
        let mut out = FlatRecordWriter::create(out_db_path)?;
        let n_written = emit_clustering(&graph, |id| new_db.index().record(id).key.clone(), &mut out)?;
        out.close()?;
        info!("wrote {n_written} clusters");
        return Ok(Stats {
            old_db_size: old_db.len(),
            new_db_size: new_db.len(),
            shared: diff_stats.shared,
            deleted: diff_stats.deleted,
            new_seqs: diff_stats.new,
            seqs_with_matches: 0,
            seqs_without_matches: 0,
            new_clusters: 0,
        });
    }

    // ---------- BA_SCORED ----------
    let pipeline = KmerPrefilterAligner::with_options(config.min_seq_id, config.sub_mat, config.max_seqs);
    let (query_store, query_index) = pack_filtered(&new_db, &b_index, config.max_seq_len)?;
    let (target_store, target_index) = pack_filtered(&new_db, &a_index, config.max_seq_len)?;

    let ba_hits_path = format!("{}/ba_hits", tmp_dir.trim_end_matches('/'));
    let mut ba_hits_writer = FlatRecordWriter::create(&ba_hits_path)?;
    pipeline.search(&query_store, &query_index, &target_store, &target_index, &mut ba_hits_writer)?;
    ba_hits_writer.close()?;
    let ba_hits = FlatRecordStore::open(&ba_hits_path)?;
    info!("B->A search produced {} hit records", ba_hits.len());

    // ---------- ATTACHED ----------
    let (residual_index, attach_stats) = attach_matches(&mut graph, &ba_hits, &b_index, |key| new_db.id_of(key))?;
    info!(
        "attached {} sequences, {} anomalies, {} left over",
        attach_stats.attached, attach_stats.anomalies, attach_stats.residual
    );

    let mut new_clusters = 0usize;
    if !residual_index.is_empty() {
        // ---------- BB_SCORED ----------
        let (residual_store, residual_index) = pack_filtered(&new_db, &residual_index, config.max_seq_len)?;
        let bb_hits_path = format!("{}/bb_hits", tmp_dir.trim_end_matches('/'));
        let mut bb_hits_writer = FlatRecordWriter::create(&bb_hits_path)?;
        pipeline.search(&residual_store, &residual_index, &residual_store, &residual_index, &mut bb_hits_writer)?;
        bb_hits_writer.close()?;
        let bb_hits = FlatRecordStore::open(&bb_hits_path)?;

        // ---------- BB_CLUSTERED ----------
        let new_clusters_path = format!("{}/new_clusters", tmp_dir.trim_end_matches('/'));
        let mut new_clusters_writer = FlatRecordWriter::create(&new_clusters_path)?;
        GreedySetCoverClusterer.cluster(&residual_store, &residual_index, &bb_hits, &mut new_clusters_writer)?;
        new_clusters_writer.close()?;
        let new_clusters_store = FlatRecordStore::open(&new_clusters_path)?;

        // ---------- FOLDED ----------
        new_clusters = load_clustering(&mut graph, &new_clusters_store, |key| new_db.id_of(key));
        info!("folded {new_clusters} de novo clusters into the clustering");

        std::fs::remove_file(&bb_hits_path).ok();
        std::fs::remove_file(format!("{bb_hits_path}.index")).ok();
        std::fs::remove_file(&new_clusters_path).ok();
        std::fs::remove_file(format!("{new_clusters_path}.index")).ok();
    }
    std::fs::remove_file(&ba_hits_path).ok();
    std::fs::remove_file(format!("{ba_hits_path}.index")).ok();

    // ---------- DONE ----------
    let mut out = FlatRecordWriter::create(out_db_path)?;
    let n_written = emit_clustering(&graph, |id| new_db.index().record(id).key.clone(), &mut out)?;
    out.close()?;
    info!("wrote {n_written} clusters to {out_db_path}");

    Ok(Stats {
        old_db_size: old_db.len(),
        new_db_size: new_db.len(),
        shared: diff_stats.shared,
        deleted: diff_stats.deleted,
        new_seqs: diff_stats.new,
        seqs_with_matches: attach_stats.attached,
        seqs_without_matches: attach_stats.residual,
        new_clusters,
    })
}
