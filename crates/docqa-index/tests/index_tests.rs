mod common;

use common::{BrokenEmbedder, ShortEmbedder, VocabEmbedder};
use docqa_core::error::Error;
use docqa_core::types::Passage;
use docqa_index::VectorIndex;

fn animal_passages() -> Vec<Passage> {
    ["cats chase mice", "dogs chase cats", "mice hide"]
        .iter()
        .map(|t| Passage::new(*t, "animals.pdf", 1))
        .collect()
}

#[test]
fn query_ranks_passages_sharing_terms_first() {
    let embedder = VocabEmbedder::animals();
    let index = VectorIndex::build(&embedder, animal_passages()).expect("build");
    assert_eq!(index.len(), 3);
    assert_eq!(index.dim(), 5);

    let hits = index.query(&embedder, "cats", 2).expect("query");
    assert_eq!(hits.len(), 2);
    for h in &hits {
        assert!(h.passage.text.contains("cats"), "unexpected hit {:?}", h.passage.text);
    }
    // Equal scores: lower ordinal first.
    assert_eq!(hits[0].id, 0);
    assert_eq!(hits[1].id, 1);
    assert!((hits[0].score - hits[1].score).abs() < 1e-6);
    assert!((hits[0].score - 1.0 / 3f32.sqrt()).abs() < 1e-5);
}

#[test]
fn top_k_beyond_size_returns_everything_descending() {
    let embedder = VocabEmbedder::animals();
    let index = VectorIndex::build(&embedder, animal_passages()).expect("build");
    let hits = index.query(&embedder, "mice hide", 10).expect("query");
    assert_eq!(hits.len(), 3);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(hits[0].passage.text, "mice hide");
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits.iter().all(|h| (-1.0..=1.0 + 1e-6).contains(&h.score)));
}

#[test]
fn never_built_index_returns_empty() {
    let index = VectorIndex::empty();
    assert!(index.is_empty() && !index.is_built());
    let hits = index.query(&BrokenEmbedder, "anything", 5).expect("empty index is not an error");
    assert!(hits.is_empty());
}

#[test]
fn building_from_no_passages_gives_empty_index() {
    let embedder = VocabEmbedder::animals();
    let index = VectorIndex::build(&embedder, Vec::new()).expect("build");
    assert_eq!(index.len(), 0);
    assert!(index.is_built());
    assert!(index.query(&embedder, "cats", 3).expect("query").is_empty());
}

#[test]
fn embedder_errors_propagate() {
    let err = VectorIndex::build(&BrokenEmbedder, animal_passages()).unwrap_err();
    assert!(matches!(err, Error::EmbeddingFailure(ref m) if m.contains("model unavailable")), "{err}");

    let err = VectorIndex::build(&ShortEmbedder, animal_passages()).unwrap_err();
    assert!(matches!(err, Error::EmbeddingFailure(_)));

    let index = VectorIndex::build(&VocabEmbedder::animals(), animal_passages()).expect("build");
    assert!(matches!(index.query(&BrokenEmbedder, "cats", 1), Err(Error::EmbeddingFailure(_))));
}

#[test]
fn query_with_no_known_terms_scores_zero_without_nan() {
    let embedder = VocabEmbedder::animals();
    let index = VectorIndex::build(&embedder, animal_passages()).expect("build");
    let hits = index.query(&embedder, "zebra", 3).expect("query");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.score == 0.0));
    let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}
