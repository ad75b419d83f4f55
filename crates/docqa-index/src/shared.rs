//! A swappable index handle for long-lived sessions.
//!
//! Readers clone the current `Arc<VectorIndex>` and search it without holding
//! any lock, so a query racing a rebuild sees either the old or the new index
//! in full. Rebuilds are serialized and only take the write lock for the swap.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use docqa_core::error::Result;
use docqa_core::traits::Embedder;
use docqa_core::types::{Passage, ScoredPassage};

use crate::index::VectorIndex;

#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<VectorIndex>>,
    build_lock: Mutex<()>,
}

impl SharedIndex {
    pub fn new(index: VectorIndex) -> Self {
        Self { current: RwLock::new(Arc::new(index)), build_lock: Mutex::new(()) }
    }

    /// The index as of now. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<VectorIndex> {
        // The guarded value is a single Arc, so a poisoned lock still holds a whole index.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `index` and return the one it replaced.
    pub fn replace(&self, index: VectorIndex) -> Arc<VectorIndex> {
        self.install(Arc::new(index))
    }

    /// Install an already shared index and return the one it replaced.
    pub fn install(&self, index: Arc<VectorIndex>) -> Arc<VectorIndex> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, index)
    }

    /// Build a new index off-lock and swap it in. On failure the current
    /// index stays installed.
    pub fn rebuild(&self, embedder: &dyn Embedder, passages: Vec<Passage>) -> Result<Arc<VectorIndex>> {
        let _building = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let built = Arc::new(VectorIndex::build(embedder, passages)?);
        self.install(Arc::clone(&built));
        debug!("installed rebuilt index");
        Ok(built)
    }

    pub fn query(&self, embedder: &dyn Embedder, query_text: &str, top_k: usize) -> Result<Vec<ScoredPassage>> {
        self.snapshot().query(embedder, query_text, top_k)
    }
}
