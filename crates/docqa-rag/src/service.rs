use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use docqa_core::error::{Error, Result};
use docqa_core::segment::{segment_pages, SegmentParams};
use docqa_core::traits::{Embedder, TextExtractor};
use docqa_core::types::{Document, PageText, ScoredPassage};
use docqa_index::{IndexManifest, SharedIndex, VectorIndex};

/// Extract every document, in order, into one flat page list.
fn extract_all(extractor: &dyn TextExtractor, documents: &[Document]) -> Result<Vec<PageText>> {
    let mut pages = Vec::new();
    for doc in documents {
        let extracted = extractor
            .extract_pages(&doc.bytes, &doc.name)
            .map_err(|e| Error::Extraction(format!("{}: {e:#}", doc.name)))?;
        debug!(document = %doc.name, pages = extracted.len(), "extracted");
        pages.extend(extracted);
    }
    Ok(pages)
}

/// Segment, embed and index a batch of documents in one pass.
///
/// Parameters are validated before anything is extracted or embedded.
pub fn build_index(
    embedder: &dyn Embedder,
    extractor: &dyn TextExtractor,
    documents: &[Document],
    chunk_size: usize,
    overlap: usize,
) -> Result<VectorIndex> {
    let params = SegmentParams::new(chunk_size, overlap)?;
    let pages = extract_all(extractor, documents)?;
    let passages = segment_pages(&pages, params)?;
    VectorIndex::build(embedder, passages)
}

/// Top-k passages for `query_text`; empty for an unbuilt index.
pub fn query_index(
    index: &VectorIndex,
    embedder: &dyn Embedder,
    query_text: &str,
    top_k: usize,
) -> Result<Vec<ScoredPassage>> {
    index.query(embedder, query_text, top_k)
}

/// Session-level retrieval: owns the embedder and the current index.
///
/// Building replaces the current index only once the new one is complete, so
/// a failed build leaves earlier results queryable.
pub struct RetrievalService {
    embedder: Box<dyn Embedder>,
    params: SegmentParams,
    index: SharedIndex,
}

impl RetrievalService {
    pub fn new(embedder: Box<dyn Embedder>, params: SegmentParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { embedder, params, index: SharedIndex::default() })
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn params(&self) -> SegmentParams {
        self.params
    }

    /// Segment and index already extracted pages.
    pub fn build_from_pages(&self, pages: &[PageText]) -> Result<Arc<VectorIndex>> {
        let start = Instant::now();
        let passages = segment_pages(pages, self.params)?;
        let built = self.index.rebuild(self.embedder.as_ref(), passages)?;
        info!(pages = pages.len(), passages = built.len(), elapsed_ms = start.elapsed().as_millis() as u64, "index ready");
        Ok(built)
    }

    pub fn build_from_documents(&self, extractor: &dyn TextExtractor, documents: &[Document]) -> Result<Arc<VectorIndex>> {
        let pages = extract_all(extractor, documents)?;
        info!(documents = documents.len(), pages = pages.len(), "extracted documents");
        self.build_from_pages(&pages)
    }

    /// Ranked passages for `query_text` from the current index.
    pub fn answer_query(&self, query_text: &str, top_k: usize) -> Result<Vec<ScoredPassage>> {
        let hits = self.index.query(self.embedder.as_ref(), query_text, top_k)?;
        debug!(top_k, hits = hits.len(), "answered query");
        Ok(hits)
    }

    pub fn current(&self) -> Arc<VectorIndex> {
        self.index.snapshot()
    }

    /// Install an index built elsewhere (e.g. loaded from disk).
    pub fn install(&self, index: VectorIndex) {
        self.index.replace(index);
    }

    pub fn save(&self, dir: &Path) -> Result<IndexManifest> {
        self.current().save(dir)
    }

    /// Load a saved index and make it current. A failed load keeps the
    /// existing index.
    pub fn load(&self, dir: &Path) -> Result<Arc<VectorIndex>> {
        let loaded = Arc::new(VectorIndex::load(dir)?);
        self.index.install(Arc::clone(&loaded));
        Ok(loaded)
    }
}
