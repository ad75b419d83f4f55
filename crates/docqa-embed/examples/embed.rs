use docqa_core::config::EmbedSettings;
use docqa_core::traits::Embedder;
use docqa_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(&EmbedSettings::default())?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={} id={}", embs.len(), embedder.dim(), embedder.id());
    Ok(())
}
