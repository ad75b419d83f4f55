//! docqa-embed
//!
//! Embedding backends behind `docqa_core::traits::Embedder`: a local
//! sentence-transformer (BERT/MiniLM family) run through candle, and a
//! deterministic token-hashing embedder for tests and offline development.

use anyhow::{Result, anyhow, ensure, Context};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, Tensor, DType};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use docqa_core::config::{expand_path, EmbedBackend, EmbedSettings};
use docqa_core::traits::Embedder;

pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

/// Texts per forward pass; bounds peak memory on large builds.
const FORWARD_BATCH: usize = 32;

/// Sentence-transformer with a BERT backbone (e.g. all-MiniLM-L6-v2, D = 384).
pub struct MiniLmEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize, pad_id: u32, id: String }

impl MiniLmEmbedder {
    /// Load `tokenizer.json`, `config.json` and `model.safetensors` (or
    /// `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = select_device();
        info!(model_dir = %model_dir.display(), "loading sentence-transformer");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw_config)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;
        let pad_id = serde_json::from_str::<serde_json::Value>(&raw_config)?
            .get("pad_token_id")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as u32;

        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        let name = model_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "model".to_string());
        let id = format!("local:{}:d{}", name, dim);
        info!(%id, "sentence-transformer loaded");
        Ok(Self { model, tokenizer, device, dim, max_len, pad_id, id })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(dev) => {
                info!(device = "metal", "embedding device selected");
                return dev;
            }
            Err(e) => warn!(error = %e, "metal unavailable, falling back to CPU"),
        }
    }
    info!(device = "cpu", "embedding device selected");
    Device::Cpu
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pth = model_dir.join("pytorch_model.bin");
    if pth.exists() {
        let weights = candle_core::pickle::read_all(&pth)?;
        return weights
            .into_iter()
            .map(|(k, t)| -> Result<(String, Tensor)> { Ok((k, t.to_device(device)?)) })
            .collect();
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

impl Embedder for MiniLmEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(FORWARD_BATCH) {
            out.extend(self.embed_chunk(chunk)?);
        }
        debug!(texts = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(out)
    }
}

/// Feature-hashing bag of words: each lowercase alphanumeric token adds a
/// positive weight to bucket `xxh64(token) % dim`. Shared tokens therefore
/// always raise cosine similarity, which is all retrieval tests need.
pub struct HashEmbedder { dim: usize, id: String }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("hash:xxh64:d{}", dim) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let idx = (hasher.finish() % self.dim as u64) as usize;
            v[idx] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Pick the backend from settings. `APP_USE_FAKE_EMBEDDINGS=1` forces the
/// hashing embedder regardless of the configured backend.
pub fn get_default_embedder(settings: &EmbedSettings) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake || settings.backend == EmbedBackend::Hash {
        ensure!(settings.dim > 0, "hash embedder needs embedding.dim > 0");
        info!(dim = settings.dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(settings.dim)));
    }
    let model_dir = resolve_model_dir(settings)?;
    Ok(Box::new(MiniLmEmbedder::load(&model_dir, settings.max_len)?))
}

fn resolve_model_dir(settings: &EmbedSettings) -> Result<PathBuf> {
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = expand_path(&dir);
            if p.exists() { debug!(var, dir = %p.display(), "model dir from env"); return Ok(p); }
            warn!(var, dir = %p.display(), "model dir from env does not exist");
        }
    }
    let configured = expand_path(&settings.model_dir);
    if configured.exists() { return Ok(configured); }
    Err(anyhow!("Could not locate embedding model directory (tried {})", configured.display()))
}
