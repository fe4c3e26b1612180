//! Vector search and result extraction for LanceDB

use anyhow::{anyhow, Result};
use arrow::array::{Array, Float32Array, Int64Array};
use arrow::record_batch::RecordBatch;
use futures::stream::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Table;

use super::records::{EMBEDDING_FIELD, ID_FIELD};
use crate::search::index::NeighborMatch;

const DISTANCE_FIELD: &str = "_distance";

/// Up to `k` nearest rows to `query_embedding`, closest first
pub async fn search_nearest(table: &Table, query_embedding: &[f32], k: usize) -> Result<Vec<NeighborMatch>> {
  let mut results_stream = table
    .vector_search(query_embedding)?
    .column(EMBEDDING_FIELD)
    .limit(k)
    .execute()
    .await
    .map_err(|e| anyhow!("Vector search failed: {}", e))?;

  let mut neighbors = Vec::new();
  while let Some(batch_result) = results_stream.next().await {
    let batch = batch_result.map_err(|e| anyhow!("Error reading batch: {}", e))?;
    neighbors.extend(neighbors_from_batch(&batch)?);
  }

  neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
  if neighbors.is_empty() {
    tracing::debug!("Vector search returned no neighbors");
  }
  Ok(neighbors)
}

fn neighbors_from_batch(batch: &RecordBatch) -> Result<Vec<NeighborMatch>> {
  let ids = batch
    .column_by_name(ID_FIELD)
    .ok_or_else(|| anyhow!("Missing '{}' column", ID_FIELD))?
    .as_any()
    .downcast_ref::<Int64Array>()
    .ok_or_else(|| anyhow!("Failed to cast '{}' column to Int64Array", ID_FIELD))?;

  let distances = batch
    .column_by_name(DISTANCE_FIELD)
    .ok_or_else(|| anyhow!("Missing '{}' column", DISTANCE_FIELD))?
    .as_any()
    .downcast_ref::<Float32Array>()
    .ok_or_else(|| anyhow!("Failed to cast '{}' column to Float32Array", DISTANCE_FIELD))?;

  Ok(
    (0..batch.num_rows())
      .filter(|&row| !ids.is_null(row) && !distances.is_null(row))
      .map(|row| NeighborMatch { id: ids.value(row), distance: distances.value(row) })
      .collect(),
  )
}
