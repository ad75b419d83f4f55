//! docqa-rag
//!
//! Wires segmentation, embedding and the vector index into a retrieval
//! service, and composes retrieved passages into a grounded prompt for an
//! external generator.

pub mod prompt;
pub mod service;
pub mod terms;

pub use prompt::{build_prompt, Answer, AnswerPipeline};
pub use service::{build_index, query_index, RetrievalService};
pub use terms::{highlight_terms, query_terms};
