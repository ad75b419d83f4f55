use crate::types::PageText;

/// Maps text to fixed-dimension dense vectors.
///
/// One vector per input, same order, `dim()` entries each. Vectors need not be
/// normalized; the index normalizes everything it stores.
pub trait Embedder: Send + Sync {
    /// Stable identity of the backend/model, persisted with a saved index.
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut out = self.embed_batch(&[text.to_string()])?;
        match out.len() {
            1 => Ok(out.remove(0)),
            n => anyhow::bail!("embedder returned {n} vectors for a single input"),
        }
    }
}

/// Turns a binary document into per-page plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8], name: &str) -> anyhow::Result<Vec<PageText>>;
}

/// Turns a composed prompt into generated answer text.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
