//! Grounded prompt composition and the retrieve-then-generate pipeline.

use tracing::{debug, info};

use docqa_core::error::{Error, Result};
use docqa_core::traits::Generator;
use docqa_core::types::ScoredPassage;

use crate::service::RetrievalService;

const NO_CONTEXT: &str = "No relevant content was found in the indexed documents.";

/// Compose the generator input: numbered `[SOURCE i]` context blocks, then
/// the question.
pub fn build_prompt<S: AsRef<str>>(question: &str, contexts: &[S]) -> String {
    let ctx = contexts
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[SOURCE {}]\n{}", i + 1, c.as_ref()))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Use ONLY the provided context to answer the question.\n\
         Reason step by step, then state the final answer clearly.\n\
         If the context does not contain the answer, say so.\n\n\
         Context:\n{ctx}\n\n\
         Question:\n{question}\n"
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Passages the answer was grounded on, best first.
    pub sources: Vec<ScoredPassage>,
}

impl Answer {
    pub fn no_context() -> Self {
        Self { text: NO_CONTEXT.to_string(), sources: Vec::new() }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Retrieve `top_k` passages, build a prompt from them and hand it to the
/// generator.
pub struct AnswerPipeline {
    pub service: RetrievalService,
    pub generator: Box<dyn Generator>,
    pub top_k: usize,
}

impl AnswerPipeline {
    pub fn new(service: RetrievalService, generator: Box<dyn Generator>, top_k: usize) -> Self {
        Self { service, generator, top_k }
    }

    /// The generator is not called when nothing was retrieved.
    pub fn ask(&self, question: &str) -> Result<Answer> {
        let sources = self.service.answer_query(question, self.top_k)?;
        if sources.is_empty() {
            info!("no passages retrieved; skipping generation");
            return Ok(Answer::no_context());
        }
        let contexts: Vec<&str> = sources.iter().map(|s| s.passage.text.as_str()).collect();
        let prompt = build_prompt(question, &contexts);
        debug!(sources = sources.len(), prompt_chars = prompt.chars().count(), "generating answer");
        let text = self
            .generator
            .generate(&prompt)
            .map_err(|e| Error::Generation(format!("{e:#}")))?;
        Ok(Answer { text, sources })
    }
}
