use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid segmentation parameters: chunk_size={chunk_size}, overlap={overlap} (need chunk_size > 0 and overlap < chunk_size)")]
    InvalidSegmentationParameters { chunk_size: usize, overlap: usize },

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("Persistence failed for {}: {reason}", path.display())]
    PersistenceFailure { path: PathBuf, reason: String },

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::PersistenceFailure { path: path.into(), reason: reason.to_string() }
    }

    pub fn embedding(reason: impl ToString) -> Self {
        Self::EmbeddingFailure(reason.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
