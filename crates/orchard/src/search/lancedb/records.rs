//! Arrow RecordBatch conversion for embedding entries

use anyhow::{anyhow, Result};
use arrow::array::{Array, FixedSizeListBuilder, Float32Builder, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::search::index::EmbeddingEntry;

pub const ID_FIELD: &str = "plant_id";
pub const TITLE_FIELD: &str = "title";
pub const DOCUMENT_FIELD: &str = "document";
pub const EMBEDDING_FIELD: &str = "embedding";

/// Convert entries to a single Arrow batch. All embeddings must share one
/// dimension, which becomes the fixed list size of the embedding column.
pub fn entries_to_arrow_batch(entries: &[EmbeddingEntry]) -> Result<RecordBatch> {
  let dimension = validate_entries(entries)?;
  let schema = embedding_schema(dimension);

  let ids = Int64Array::from(entries.iter().map(|e| e.id).collect::<Vec<_>>());
  let titles = StringArray::from(entries.iter().map(|e| e.title.as_str()).collect::<Vec<_>>());
  let documents = StringArray::from(entries.iter().map(|e| e.document.as_str()).collect::<Vec<_>>());
  let embeddings = embedding_array(entries, dimension);

  let columns: Vec<Arc<dyn Array>> =
    vec![Arc::new(ids), Arc::new(titles), Arc::new(documents), Arc::new(embeddings)];

  RecordBatch::try_new(schema, columns).map_err(|e| anyhow!("Failed to create RecordBatch: {}", e))
}

/// Arrow schema of the plants embedding table
pub fn embedding_schema(dimension: usize) -> Arc<Schema> {
  Arc::new(Schema::new(vec![
    Field::new(ID_FIELD, DataType::Int64, false),
    Field::new(TITLE_FIELD, DataType::Utf8, false),
    Field::new(DOCUMENT_FIELD, DataType::Utf8, false),
    Field::new(
      EMBEDDING_FIELD,
      DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dimension as i32),
      false,
    ),
  ]))
}

fn validate_entries(entries: &[EmbeddingEntry]) -> Result<usize> {
  let first = entries.first().ok_or_else(|| anyhow!("Cannot create RecordBatch from empty entries"))?;
  let dimension = first.embedding.len();
  if dimension == 0 {
    return Err(anyhow!("Embedding for plant {} is empty", first.id));
  }

  if let Some(mismatch) = entries.iter().find(|e| e.embedding.len() != dimension) {
    return Err(anyhow!(
      "Embedding for plant {} has {} dimensions, expected {}",
      mismatch.id,
      mismatch.embedding.len(),
      dimension
    ));
  }
  Ok(dimension)
}

fn embedding_array(entries: &[EmbeddingEntry], dimension: usize) -> arrow::array::FixedSizeListArray {
  let mut builder =
    FixedSizeListBuilder::new(Float32Builder::with_capacity(dimension * entries.len()), dimension as i32);

  for entry in entries {
    builder.values().append_slice(&entry.embedding);
    builder.append(true);
  }

  builder.finish()
}
