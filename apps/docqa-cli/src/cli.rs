use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Question answering over a local document collection.
#[derive(Debug, Parser)]
#[command(name = "docqa", version, about)]
pub struct Cli {
    /// Index directory (defaults to `index.dir` from config)
    #[arg(long, global = true, env = "DOCQA_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment, embed and index every document under a directory
    Ingest(IngestArgs),
    /// Retrieve the passages most similar to a question
    Query(QueryArgs),
    /// Show what the saved index contains
    Status,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Directory to ingest (defaults to `data.documents_dir`)
    pub dir: Option<PathBuf>,
    #[arg(long)]
    pub chunk_size: Option<usize>,
    #[arg(long)]
    pub overlap: Option<usize>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    pub question: String,
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
    /// Print the grounded prompt that would be sent to a generator
    #[arg(long)]
    pub prompt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_overrides() {
        let cli = Cli::try_parse_from(["docqa", "ingest", "docs", "--chunk-size", "500", "--overlap", "50"]).unwrap();
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.dir, Some(PathBuf::from("docs")));
                assert_eq!((args.chunk_size, args.overlap), (Some(500), Some(50)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_query_flags() {
        let cli = Cli::try_parse_from(["docqa", "query", "what is a limit", "-k", "3", "--prompt"]).unwrap();
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.question, "what is a limit");
                assert_eq!(args.top_k, Some(3));
                assert!(args.prompt);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn query_requires_a_question() {
        assert!(Cli::try_parse_from(["docqa", "query"]).is_err());
    }
}
