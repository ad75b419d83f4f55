//! Domain types shared by the segmenter, the index and the retrieval service.

use serde::{Deserialize, Serialize};

/// Ordinal position of a passage inside one built index (`0..n-1`).
pub type PassageId = usize;

/// The atomic unit of retrieval: a trimmed, overlap-windowed excerpt of one page.
///
/// - `text`: passage content, never empty after trimming
/// - `source_id`: originating document (file name or equivalent)
/// - `page`: 1-based page number within the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    pub source_id: String,
    pub page: u32,
}

impl Passage {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>, page: u32) -> Self {
        Self { text: text.into(), source_id: source_id.into(), page }
    }
}

/// One ranked query hit. `score` is cosine similarity in `[-1, 1]`, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub id: PassageId,
    pub score: f32,
    pub passage: Passage,
}

/// Plain text of a single page as produced by a `TextExtractor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub source_id: String,
    pub page: u32,
    pub text: String,
}

/// A raw uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}
