use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docqa_core::config::{expand_path, Config, Settings};
use docqa_core::extract::PlainTextExtractor;
use docqa_core::loader::load_documents;
use docqa_core::segment::SegmentParams;
use docqa_core::traits::TextExtractor;
use docqa_embed::get_default_embedder;
use docqa_index::read_manifest;
use docqa_rag::{build_prompt, highlight_terms, query_terms, RetrievalService};

mod cli;

use cli::{Cli, Commands, IngestArgs, QueryArgs};

/// Characters of each hit shown in query output.
const PREVIEW_CHARS: usize = 2000;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let settings = config.settings()?;
    init_logging(&settings.logging.level);

    let index_dir = cli.index_dir.clone().unwrap_or_else(|| expand_path(&settings.index.dir));
    match cli.command {
        Commands::Ingest(args) => ingest(&settings, &index_dir, args),
        Commands::Query(args) => query(&settings, &index_dir, args),
        Commands::Status => status(&index_dir),
    }
}

fn ingest(settings: &Settings, index_dir: &Path, args: IngestArgs) -> Result<()> {
    let data_dir: PathBuf = args.dir.unwrap_or_else(|| expand_path(&settings.data.documents_dir));
    let params = SegmentParams::new(
        args.chunk_size.unwrap_or(settings.retrieval.chunk_size),
        args.overlap.unwrap_or(settings.retrieval.overlap),
    )?;
    let extensions: Vec<&str> = settings.data.extensions.iter().map(String::as_str).collect();
    let documents = load_documents(&data_dir, &extensions)?;
    if documents.is_empty() {
        warn!(dir = %data_dir.display(), "no documents found");
    }
    println!("Ingesting {} documents from {}", documents.len(), data_dir.display());

    let start = Instant::now();
    let extractor = PlainTextExtractor::new();
    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let mut pages = Vec::new();
    for doc in &documents {
        pb.set_message(doc.name.clone());
        let extracted = extractor
            .extract_pages(&doc.bytes, &doc.name)
            .with_context(|| format!("extracting {}", doc.name))?;
        pages.extend(extracted);
        pb.inc(1);
    }
    pb.finish_with_message("extracted");

    let embedder = get_default_embedder(&settings.embedding)?;
    let service = RetrievalService::new(embedder, params)?;
    let index = service.build_from_pages(&pages)?;
    let manifest = service.save(index_dir)?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "ingest finished");
    println!(
        "Indexed {} passages from {} pages (D = {}) into {}",
        manifest.count,
        pages.len(),
        index.dim(),
        index_dir.display()
    );
    Ok(())
}

fn query(settings: &Settings, index_dir: &Path, args: QueryArgs) -> Result<()> {
    let embedder = get_default_embedder(&settings.embedding)?;
    let service = RetrievalService::new(embedder, settings.retrieval.segment_params())?;
    service
        .load(index_dir)
        .with_context(|| format!("no usable index in {} (run `docqa ingest` first)", index_dir.display()))?;

    let top_k = args.top_k.unwrap_or(settings.retrieval.top_k);
    let hits = service.answer_query(&args.question, top_k)?;
    if hits.is_empty() {
        println!("No relevant content found.");
        return Ok(());
    }

    if args.prompt {
        let contexts: Vec<&str> = hits.iter().map(|h| h.passage.text.as_str()).collect();
        println!("{}", build_prompt(&args.question, &contexts));
        return Ok(());
    }

    let terms = query_terms(&args.question, 6);
    for (rank, hit) in hits.iter().enumerate() {
        println!("{}. {} (page {}) score {:.3}", rank + 1, hit.passage.source_id, hit.passage.page, hit.score);
        let preview: String = hit.passage.text.chars().take(PREVIEW_CHARS).collect();
        println!("{}\n", highlight_terms(&preview, &terms, "\x1b[1m", "\x1b[0m"));
    }
    Ok(())
}

fn status(index_dir: &Path) -> Result<()> {
    let manifest = read_manifest(index_dir).with_context(|| format!("reading index in {}", index_dir.display()))?;
    println!("Index:      {}", index_dir.display());
    println!("Passages:   {}", manifest.count);
    println!("Dimension:  {}", manifest.dim);
    println!("Embedder:   {}", manifest.embedder_id.as_deref().unwrap_or("unknown"));
    println!("Created:    {}", manifest.created_at.to_rfc3339());
    println!("Checksum:   {}", manifest.vectors_blake3);
    Ok(())
}
