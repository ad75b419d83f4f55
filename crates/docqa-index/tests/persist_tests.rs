mod common;

use std::fs;

use common::VocabEmbedder;
use docqa_core::error::Error;
use docqa_core::types::Passage;
use docqa_index::persist::{MANIFEST_FILE, PASSAGES_FILE, VECTORS_FILE};
use docqa_index::{read_manifest, IndexManifest, VectorIndex};
use tempfile::TempDir;

fn built() -> (VocabEmbedder, VectorIndex) {
    let embedder = VocabEmbedder::animals();
    let passages = vec![
        Passage::new("cats chase mice", "a.pdf", 1),
        Passage::new("dogs chase cats", "a.pdf", 2),
        Passage::new("mice hide", "b.pdf", 1),
        Passage::new("dogs dogs hide", "b.pdf", 3),
    ];
    let index = VectorIndex::build(&embedder, passages).expect("build");
    (embedder, index)
}

#[test]
fn save_then_load_answers_queries_identically() {
    let (embedder, index) = built();
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("index");
    let manifest = index.save(&dir).expect("save");
    assert_eq!(manifest.count, 4);
    assert_eq!(manifest.dim, 5);
    assert_eq!(manifest.embedder_id.as_deref(), Some("test:vocab"));

    let loaded = VectorIndex::load(&dir).expect("load");
    assert_eq!(loaded.passages(), index.passages());
    assert_eq!(loaded.embedder_id(), index.embedder_id());

    for q in ["cats", "mice hide", "dogs", "chase cats", "nothing known"] {
        let a = index.query(&embedder, q, 10).unwrap();
        let b = loaded.query(&embedder, q, 10).unwrap();
        assert_eq!(a.len(), b.len(), "query {q}");
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.passage, y.passage);
            assert!((x.score - y.score).abs() < 1e-6);
        }
    }
}

#[test]
fn empty_index_round_trips() {
    let tmp = TempDir::new().unwrap();
    VectorIndex::build(&VocabEmbedder::animals(), Vec::new()).unwrap().save(tmp.path()).unwrap();
    let loaded = VectorIndex::load(tmp.path()).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(read_manifest(tmp.path()).unwrap().count, 0);
}

#[test]
fn missing_directory_is_a_persistence_failure() {
    let tmp = TempDir::new().unwrap();
    let err = VectorIndex::load(&tmp.path().join("absent")).unwrap_err();
    assert!(matches!(err, Error::PersistenceFailure { .. }));
}

#[test]
fn corrupted_vectors_are_detected() {
    let (_, index) = built();
    let tmp = TempDir::new().unwrap();
    index.save(tmp.path()).unwrap();

    let path = tmp.path().join(VECTORS_FILE);
    let mut bytes = fs::read(&path).unwrap();
    bytes[0] ^= 0xff;
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(VectorIndex::load(tmp.path()), Err(Error::PersistenceFailure { .. })));

    bytes.truncate(bytes.len() - 4);
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(VectorIndex::load(tmp.path()), Err(Error::PersistenceFailure { .. })));
}

#[test]
fn passage_count_mismatch_is_detected() {
    let (_, index) = built();
    let tmp = TempDir::new().unwrap();
    index.save(tmp.path()).unwrap();
    fs::write(tmp.path().join(PASSAGES_FILE), "[]").unwrap();
    assert!(matches!(VectorIndex::load(tmp.path()), Err(Error::PersistenceFailure { .. })));
}

#[test]
fn save_overwrites_previous_contents() {
    let (embedder, index) = built();
    let tmp = TempDir::new().unwrap();
    index.save(tmp.path()).unwrap();
    let smaller = VectorIndex::build(&embedder, vec![Passage::new("cats", "c.pdf", 1)]).unwrap();
    smaller.save(tmp.path()).unwrap();
    let loaded = VectorIndex::load(tmp.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(tmp.path().join(MANIFEST_FILE).exists());
    // Only the three index files remain; temp files were renamed away.
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 3);
}

fn rewrite_manifest(dir: &std::path::Path, edit: impl FnOnce(&mut IndexManifest)) {
    let mut manifest = read_manifest(dir).unwrap();
    edit(&mut manifest);
    fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest).unwrap()).unwrap();
}

#[test]
fn oversized_manifest_counts_fail_without_panicking() {
    let tmp = TempDir::new().unwrap();
    VectorIndex::empty().save(tmp.path()).unwrap();
    rewrite_manifest(tmp.path(), |m| {
        m.count = usize::MAX / 2;
        m.dim = 3;
    });
    let err = VectorIndex::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::PersistenceFailure { ref reason, .. } if reason.contains("overflows")), "{err}");
}

#[test]
fn passages_without_dimension_are_rejected() {
    let (_, index) = built();
    let tmp = TempDir::new().unwrap();
    index.save(tmp.path()).unwrap();
    rewrite_manifest(tmp.path(), |m| m.dim = 0);
    let err = VectorIndex::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::PersistenceFailure { ref reason, .. } if reason.contains("dimension 0")), "{err}");
}
