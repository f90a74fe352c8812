use anyhow::{Context, Result};
use clap::Parser;
use sift_core::{Analyzer, IndexConfig, SearchResult, ShardedIndex, StopWords};
use sift_indexer::pipeline::DEFAULT_BATCH_SIZE;
use sift_indexer::{index_stream, CancelToken, DocumentStream};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Index a document collection in memory and run a TF-IDF query", long_about = None)]
struct Args {
    /// Input file or directory (.json, .jsonl, .jsonl.zst)
    #[arg(long)]
    input: PathBuf,
    /// Search query
    #[arg(long, default_value = "Small wild cat")]
    query: String,
    /// Number of index shards
    #[arg(long, default_value_t = 8)]
    shards: usize,
    /// Documents analyzed concurrently
    #[arg(long, default_value_t = 8)]
    workers: usize,
    /// Maximum results to print
    #[arg(long, default_value_t = 10)]
    max: usize,
    /// Documents per index batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Stop ingesting after this many seconds
    #[arg(long, default_value_t = 300)]
    timeout: u64,
    /// Stopword list, one word per line (defaults to a small English set)
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let stopwords = match &args.stopwords {
        Some(path) => {
            let list = std::fs::read_to_string(path)
                .with_context(|| format!("reading stopwords from {}", path.display()))?;
            StopWords::parse(&list)
        }
        None => StopWords::english(),
    };
    let config = IndexConfig { shards: args.shards, workers: args.workers };
    let index = ShardedIndex::with_config(config, Analyzer::new(stopwords))?;

    let cancel = CancelToken::with_timeout(Duration::from_secs(args.timeout));
    let stream = DocumentStream::open(&args.input, cancel)
        .with_context(|| format!("opening {}", args.input.display()))?;

    tracing::info!(shards = args.shards, workers = args.workers, "starting processing pipeline");
    let ingested = index_stream(stream, &index, args.batch_size);
    if let Some(err) = &ingested.error {
        tracing::error!(error = %err, "ingestion stopped early");
    }

    let start = Instant::now();
    let results = index.search(&args.query, args.max, &ingested.corpus);
    tracing::info!(results = results.len(), elapsed = ?start.elapsed(), "search completed");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results, args.max);
    }

    match ingested.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn print_results(results: &[SearchResult], max: usize) {
    println!("\nTop {max} results:");
    for (i, hit) in results.iter().enumerate() {
        println!("{}. [Score: {:.3}] ID: {}\n{}\n", i + 1, hit.score, hit.id, hit.text);
    }
}
