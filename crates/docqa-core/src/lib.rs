//! docqa-core
//!
//! Domain types, the error taxonomy, capability traits for the external
//! collaborators (embedding, extraction, generation), the page segmenter and
//! the layered configuration shared by the other crates.

pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod segment;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use segment::{segment, segment_pages, SegmentParams};
pub use types::{Document, PageText, Passage, PassageId, ScoredPassage};
