//! Offline ingestion: embed every plant of a dataset into the LanceDB index.
//! Runs from the `orchard_ingest` binary, never on the serving path.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::catalog::{find_newest_dataset, RecordTable};
use crate::search::lancedb::LanceDbIndex;
use crate::search::EmbeddingEntry;

pub const DEFAULT_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
  pub records: usize,
  pub embedded: usize,
}

/// Resolve a dataset argument: a file is used as is, a directory yields its
/// newest dataset file.
pub fn resolve_dataset_path(path: &Path) -> Result<PathBuf> {
  if path.is_dir() {
    find_newest_dataset(path)?.ok_or_else(|| anyhow!("No dataset file found in {}", path.display()))
  } else if path.is_file() {
    Ok(path.to_path_buf())
  } else {
    Err(anyhow!("Dataset path {} does not exist", path.display()))
  }
}

/// Embed every record of `table` and replace the index contents with them
pub async fn ingest_table(index: &LanceDbIndex, table: &RecordTable, batch_size: usize) -> Result<IngestReport> {
  let records = table.records();
  if records.is_empty() {
    return Err(anyhow!("Dataset contains no plants to embed"));
  }

  let batch_size = batch_size.max(1);
  let total_batches = records.len().div_ceil(batch_size);
  let mut entries = Vec::with_capacity(records.len());

  for (batch_number, batch) in records.chunks(batch_size).enumerate() {
    let documents: Vec<String> = batch.iter().map(|record| record.document_text()).collect();
    let embeddings = index
      .embedder()
      .embed(documents)
      .await
      .with_context(|| format!("Failed to embed batch {}/{}", batch_number + 1, total_batches))?;

    if embeddings.len() != batch.len() {
      return Err(anyhow!("Embedder returned {} vectors for {} documents", embeddings.len(), batch.len()));
    }

    entries.extend(batch.iter().zip(embeddings).map(|(record, embedding)| EmbeddingEntry::from_record(record, embedding)));
    tracing::info!("Embedded batch {}/{} ({} plants so far)", batch_number + 1, total_batches, entries.len());
  }

  index.replace_all(&entries).await?;

  Ok(IngestReport { records: records.len(), embedded: entries.len() })
}
