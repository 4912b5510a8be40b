use bioshell_clust_update::orchestrator::{run, Config};
use bioshell_clust_update::store::{FlatRecordStore, FlatRecordWriter, RecordStore, RecordWriter};
use tempfile::TempDir;

fn write_store(dir: &std::path::Path, name: &str, records: &[(&str, &str)]) -> String {
    let path = dir.join(name).to_str().unwrap().to_string();
    let mut w = FlatRecordWriter::create(&path).unwrap();
    for (key, payload) in records { w.write(payload.as_bytes(), key).unwrap(); }
    w.close().unwrap();
    path
}

/// S1: new database is byte-for-byte identical to the old one. The updated clustering must equal
/// the input clustering exactly, and the update must be idempotent when run again on its own
/// output.
#[test]
fn s1_identical_database_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db = write_store(dir.path(), "db", &[("a", "MKTAYIAKQRQ"), ("b", "GVLADDEEQQR"), ("c", "AAAAAAAAAAA")]);
    let clustering = write_store(dir.path(), "clu", &[("a", "a\nb"), ("c", "c")]);
    let out1 = dir.path().join("out1").to_str().unwrap().to_string();

    let stats1 = run(&db, &db, &clustering, &out1, dir.path().to_str().unwrap(), &Config::default()).unwrap();
    assert_eq!(stats1.new_seqs, 0);
    assert_eq!(stats1.deleted, 0);

    let store1 = FlatRecordStore::open(&out1).unwrap();
    assert_eq!(store1.len(), 2);

    // Running again with the freshly produced clustering as input reproduces the same output.
    let out2 = dir.path().join("out2").to_str().unwrap().to_string();
    let stats2 = run(&db, &db, &out1, &out2, dir.path().to_str().unwrap(), &Config::default()).unwrap();
    assert_eq!(stats2.new_seqs, 0);
    let store2 = FlatRecordStore::open(&out2).unwrap();
    assert_eq!(store2.len(), store1.len());
    for i in 0..store1.len() {
        assert_eq!(store1.get_key(i), store2.get_key(i));
        assert_eq!(store1.get_data(i), store2.get_data(i));
    }
}

/// S2: a handful of new sequences are added, each an exact copy of an existing cluster member, so
/// every addition should attach rather than start a new cluster.
#[test]
fn s2_additions_identical_to_existing_members_attach() {
    let dir = TempDir::new().unwrap();
    let old_db = write_store(dir.path(), "old_db", &[("a", "MKTAYIAKQRQISFVKSHFSRQ")]);
    let new_db = write_store(dir.path(), "new_db", &[("a", "MKTAYIAKQRQISFVKSHFSRQ"), ("a2", "MKTAYIAKQRQISFVKSHFSRQ")]);
    let clustering = write_store(dir.path(), "clu", &[("a", "a")]);
    let out = dir.path().join("out").to_str().unwrap().to_string();

    let stats = run(&old_db, &new_db, &clustering, &out, dir.path().to_str().unwrap(), &Config::default()).unwrap();
    assert_eq!(stats.new_seqs, 1);
    assert_eq!(stats.seqs_with_matches, 1);
    assert_eq!(stats.seqs_without_matches, 0);
    assert_eq!(stats.new_clusters, 0);

    let out_store = FlatRecordStore::open(&out).unwrap();
    assert_eq!(out_store.len(), 1);
    assert_eq!(out_store.get_key(0), "a");
    assert_eq!(out_store.get_data(0), b"a\na2");
}

/// S3: a new sequence unrelated to anything in the database becomes its own singleton cluster
/// after falling through B->A search and de novo (B->B) clustering.
#[test]
fn s3_unrelated_addition_becomes_its_own_cluster() {
    let dir = TempDir::new().unwrap();
    let old_db = write_store(dir.path(), "old_db", &[("a", "MKTAYIAKQRQISFVKSHFSRQ")]);
    let new_db = write_store(dir.path(), "new_db", &[("a", "MKTAYIAKQRQISFVKSHFSRQ"), ("z", "GGGGGGGGGGGGGGGGGGGGGG")]);
    let clustering = write_store(dir.path(), "clu", &[("a", "a")]);
    let out = dir.path().join("out").to_str().unwrap().to_string();

    let config = Config { min_seq_id: 0.8, ..Config::default() };
    let stats = run(&old_db, &new_db, &clustering, &out, dir.path().to_str().unwrap(), &config).unwrap();
    assert_eq!(stats.new_clusters, 1);

    let out_store = FlatRecordStore::open(&out).unwrap();
    assert_eq!(out_store.len(), 2);
    assert_eq!(out_store.get_key(1), "z");
    assert_eq!(out_store.get_data(1), b"z");
}

/// S4: the representative of a cluster is removed from the new database, but other members of
/// that cluster survive. The clustering must not be silently dropped — the load step promotes the
/// next surviving member.
#[test]
fn s4_representative_deletion_promotes_a_surviving_member() {
    let dir = TempDir::new().unwrap();
    let old_db = write_store(dir.path(), "old_db", &[("a", "MKTAYIAKQRQ"), ("b", "MKTAYIAKQRQ")]);
    let new_db = write_store(dir.path(), "new_db", &[("b", "MKTAYIAKQRQ")]);
    let clustering = write_store(dir.path(), "clu", &[("a", "a\nb")]);
    let out = dir.path().join("out").to_str().unwrap().to_string();

    let stats = run(&old_db, &new_db, &clustering, &out, dir.path().to_str().unwrap(), &Config::default()).unwrap();
    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.shared, 1);

    let out_store = FlatRecordStore::open(&out).unwrap();
    assert_eq!(out_store.len(), 1);
    assert_eq!(out_store.get_key(0), "b");
    assert_eq!(out_store.get_data(0), b"b");
}

/// S5: a clustering record names a representative that is no longer resolvable at all because
/// every one of its members was deleted. The whole record must vanish from the output with no
/// error raised.
#[test]
fn s5_cluster_with_every_member_deleted_disappears() {
    let dir = TempDir::new().unwrap();
    let old_db = write_store(dir.path(), "old_db", &[("a", "MKTAYIAKQRQ"), ("b", "MKTAYIAKQRQ")]);
    let new_db = write_store(dir.path(), "new_db", &[("c", "ACDEFGHIKLM")]);
    let clustering = write_store(dir.path(), "clu", &[("a", "a\nb")]);
    let out = dir.path().join("out").to_str().unwrap().to_string();

    let config = Config { min_seq_id: 0.9, ..Config::default() };
    let stats = run(&old_db, &new_db, &clustering, &out, dir.path().to_str().unwrap(), &config).unwrap();
    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.new_seqs, 1);

    let out_store = FlatRecordStore::open(&out).unwrap();
    // the old cluster is gone entirely; "c" forms a fresh singleton cluster of its own
    assert_eq!(out_store.len(), 1);
    assert_eq!(out_store.get_key(0), "c");
}

/// S6: an empty old database (bootstrap case) — everything is new, nothing to attach, the entire
/// database becomes de novo clusters.
#[test]
fn s6_bootstrapping_from_an_empty_old_database() {
    let dir = TempDir::new().unwrap();
    let old_db = write_store(dir.path(), "old_db", &[]);
    let new_db = write_store(dir.path(), "new_db", &[("a", "MKTAYIAKQRQISFVKSHFSRQ"), ("z", "GGGGGGGGGGGGGGGGGGGGGG")]);
    let clustering = write_store(dir.path(), "clu", &[]);
    let out = dir.path().join("out").to_str().unwrap().to_string();

    let config = Config { min_seq_id: 0.8, ..Config::default() };
    let stats = run(&old_db, &new_db, &clustering, &out, dir.path().to_str().unwrap(), &config).unwrap();
    assert_eq!(stats.old_db_size, 0);
    assert_eq!(stats.new_seqs, 2);
    assert_eq!(stats.new_clusters, 2);

    let out_store = FlatRecordStore::open(&out).unwrap();
    assert_eq!(out_store.len(), 2);
}

/// A search result naming a target key that exists in neither the old nor the new database is
/// corrupt input and must abort the whole update rather than attach to a phantom cluster.
#[test]
fn corrupt_search_hit_aborts_the_update() {
    use bioshell_clust_update::{attach_matches, ClusterGraph};
    use bioshell_clust_update::store::KeyIndex;

    let dir = TempDir::new().unwrap();
    let hits_path = write_store(dir.path(), "hits", &[("q1", "ghost")]);
    let hits = FlatRecordStore::open(&hits_path).unwrap();
    let mut new_index = KeyIndex::new();
    new_index.push("q1".to_string(), 0, 1);
    let mut graph = ClusterGraph::new(1);

    let err = attach_matches(&mut graph, &hits, &new_index, |k| if k == "q1" { Some(0) } else { None }).unwrap_err();
    assert!(matches!(err, bioshell_clust_update::ClustUpdateError::CorruptInput { .. }));
}
