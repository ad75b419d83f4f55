use std::cmp::Ordering;

use tracing::{debug, info, warn};

use docqa_core::error::{Error, Result};
use docqa_core::traits::Embedder;
use docqa_core::types::{Passage, PassageId, ScoredPassage};

use crate::normalize::{dot, normalize, normalized};

/// Exact (flat) cosine-similarity index over normalized vectors.
///
/// Vectors are stored row-major in one buffer; row `i` belongs to
/// `passages[i]` and ordinal `i` is the passage id. An index is an immutable
/// value: building or loading produces a new one, so a failed build can never
/// leave a previous index half-overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorIndex {
    pub(crate) dim: usize,
    pub(crate) embedder_id: Option<String>,
    pub(crate) vectors: Vec<f32>,
    pub(crate) passages: Vec<Passage>,
}

impl VectorIndex {
    /// The never-built index. Queries against it return no results.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Embed every passage in one batch call, normalize and assign ids `0..n-1`.
    pub fn build(embedder: &dyn Embedder, passages: Vec<Passage>) -> Result<Self> {
        let dim = embedder.dim();
        if passages.is_empty() {
            info!(embedder = embedder.id(), "built empty index");
            return Ok(Self { dim, embedder_id: Some(embedder.id().to_string()), vectors: Vec::new(), passages });
        }
        if dim == 0 {
            return Err(Error::embedding(format!("embedder {} reports dimension 0", embedder.id())));
        }
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).map_err(|e| Error::embedding(format!("{e:#}")))?;
        if embeddings.len() != passages.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} passages",
                embeddings.len(),
                passages.len()
            )));
        }

        let mut vectors = Vec::with_capacity(passages.len() * dim);
        let mut zero_rows = 0usize;
        for (i, mut v) in embeddings.into_iter().enumerate() {
            if v.len() != dim {
                return Err(Error::embedding(format!("vector {i} has dimension {} (expected {dim})", v.len())));
            }
            if !v.iter().all(|x| x.is_finite()) {
                return Err(Error::embedding(format!("vector {i} has a non-finite component")));
            }
            if v.iter().all(|x| *x == 0.0) {
                zero_rows += 1;
            }
            normalize(&mut v);
            vectors.extend_from_slice(&v);
        }
        if zero_rows > 0 {
            warn!(zero_rows, "embedder produced zero vectors; they score 0 against every query");
        }
        info!(passages = passages.len(), dim, embedder = embedder.id(), "built index");
        Ok(Self { dim, embedder_id: Some(embedder.id().to_string()), vectors, passages })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// False only for [`VectorIndex::empty`]; a build over zero passages
    /// still counts as built.
    pub fn is_built(&self) -> bool {
        self.embedder_id.is_some()
    }

    /// Vector dimension, 0 for the never-built index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embedder_id(&self) -> Option<&str> {
        self.embedder_id.as_deref()
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn passage(&self, id: PassageId) -> Option<&Passage> {
        self.passages.get(id)
    }

    pub fn vector(&self, id: PassageId) -> Option<&[f32]> {
        (id < self.len()).then(|| &self.vectors[id * self.dim..(id + 1) * self.dim])
    }

    /// Embed `query_text` and return the `top_k` most similar passages.
    ///
    /// An empty index or `top_k == 0` yields an empty result without calling
    /// the embedder.
    pub fn query(&self, embedder: &dyn Embedder, query_text: &str, top_k: usize) -> Result<Vec<ScoredPassage>> {
        if self.is_empty() || top_k == 0 {
            debug!(indexed = self.len(), top_k, "nothing to search");
            return Ok(Vec::new());
        }
        if self.embedder_id.as_deref().is_some_and(|id| id != embedder.id()) {
            warn!(index = ?self.embedder_id, query = embedder.id(), "querying with a different embedder than the index was built with");
        }
        let q = embedder.embed_one(query_text).map_err(|e| Error::embedding(format!("{e:#}")))?;
        self.query_vector(&q, top_k)
    }

    /// Rank every stored vector against `query` (normalized here).
    ///
    /// Results are ordered by descending score; equal scores keep ordinal
    /// order. `top_k` larger than the index returns everything.
    pub fn query_vector(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredPassage>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(Error::embedding(format!(
                "query vector has dimension {} (index expects {})",
                query.len(),
                self.dim
            )));
        }
        if !query.iter().all(|x| x.is_finite()) {
            return Err(Error::embedding("query vector has a non-finite component"));
        }
        let q = normalized(query.to_vec());
        let mut scored: Vec<(PassageId, f32)> = self
            .vectors
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(id, row)| (id, dot(&q, row)))
            .collect();

        let by_rank = |a: &(PassageId, f32), b: &(PassageId, f32)| -> Ordering { b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)) };
        if top_k < scored.len() {
            scored.select_nth_unstable_by(top_k - 1, by_rank);
            scored.truncate(top_k);
        }
        scored.sort_by(by_rank);

        Ok(scored
            .into_iter()
            .map(|(id, score)| ScoredPassage { id, score, passage: self.passages[id].clone() })
            .collect())
    }
}
