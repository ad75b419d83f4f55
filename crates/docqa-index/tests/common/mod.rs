#![allow(dead_code)]

use docqa_core::traits::Embedder;

/// Bag-of-words over a fixed vocabulary: one dimension per known word.
/// Lets tests reason exactly about which passages share terms with a query.
pub struct VocabEmbedder {
    vocab: Vec<&'static str>,
}

impl VocabEmbedder {
    pub fn new(vocab: &[&'static str]) -> Self {
        Self { vocab: vocab.to_vec() }
    }

    pub fn animals() -> Self {
        Self::new(&["cats", "dogs", "mice", "chase", "hide"])
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.vocab.len()];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            if let Some(i) = self.vocab.iter().position(|w| *w == word) {
                v[i] += 1.0;
            }
        }
        v
    }
}

impl Embedder for VocabEmbedder {
    fn id(&self) -> &str { "test:vocab" }
    fn dim(&self) -> usize { self.vocab.len() }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

/// Always fails, to check that errors propagate and state is kept.
pub struct BrokenEmbedder;

impl Embedder for BrokenEmbedder {
    fn id(&self) -> &str { "test:broken" }
    fn dim(&self) -> usize { 5 }
    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        anyhow::bail!("model unavailable")
    }
}

/// Returns vectors of the wrong dimension.
pub struct ShortEmbedder;

impl Embedder for ShortEmbedder {
    fn id(&self) -> &str { "test:short" }
    fn dim(&self) -> usize { 5 }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
    }
}
