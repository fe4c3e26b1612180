//! Offline embedding ingestion
//!
//! Embeds every plant of a dataset and replaces the contents of the LanceDB
//! index the server queries for nearest-neighbor search.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use orchard::catalog::load_dataset;
use orchard::config::default_model_cache;
use orchard::ingest::{ingest_table, resolve_dataset_path, DEFAULT_BATCH_SIZE};
use orchard::search::embedder::{Embedder, FastEmbedder};
use orchard::search::lancedb::LanceDbIndex;

#[derive(Parser)]
#[command(name = "orchard_ingest")]
#[command(about = "Build the plant embedding index from a dataset")]
#[command(version)]
struct Args {
  /// Dataset file, or a directory whose newest dataset is used
  #[arg(long, env = "ORCHARD_DATA_DIR", default_value = "data")]
  dataset: PathBuf,

  /// LanceDB directory of the embedding index
  #[arg(long, env = "ORCHARD_INDEX_DIR", default_value = "orchard_db")]
  index_dir: PathBuf,

  /// Table holding plant embeddings
  #[arg(long, env = "ORCHARD_INDEX_TABLE", default_value = "plants")]
  table: String,

  /// Where the embedding model is cached
  #[arg(long, env = "ORCHARD_MODEL_CACHE")]
  model_cache: Option<PathBuf>,

  /// Documents embedded per model call
  #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
  batch_size: usize,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,lance=warn,lancedb=warn,datafusion=warn,ort=warn")
  } else {
    EnvFilter::new("orchard=info,orchard_ingest=info,lance=error,lancedb=error,datafusion=error,ort=error,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let dataset_path = resolve_dataset_path(&args.dataset)?;
  let table = load_dataset(&dataset_path).map_err(|e| anyhow!("Failed to load {}: {e}", dataset_path.display()))?;
  tracing::info!("Loaded {} plants from {}", table.len(), dataset_path.display());

  let cache_dir = args.model_cache.unwrap_or_else(default_model_cache);
  let embedder = tokio::task::spawn_blocking(move || FastEmbedder::load(cache_dir)).await??;
  let embedder: Arc<dyn Embedder> = Arc::new(embedder);

  let index = LanceDbIndex::open(args.index_dir.clone(), &args.table, embedder).await?;
  let report = ingest_table(&index, &table, args.batch_size).await?;

  tracing::info!(
    "Indexed {}/{} plants into {} (table '{}')",
    report.embedded,
    report.records,
    args.index_dir.display(),
    args.table
  );
  Ok(())
}
