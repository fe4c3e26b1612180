//! Embedding index abstraction
//!
//! The resolver only needs nearest-neighbor lookups by raw query text, so the
//! index is injected as a trait object and can be swapped for a stub in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::PlantRecord;

/// One neighbor returned by the index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborMatch {
  /// Plant id the embedded document was built from
  pub id: i64,
  /// Distance to the query; smaller is closer
  pub distance: f32,
}

/// Nearest-neighbor lookup over precomputed plant embeddings
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
  /// Up to `k` neighbors of `query`, ordered by ascending distance
  async fn nearest_neighbors(&self, query: &str, k: usize) -> Result<Vec<NeighborMatch>>;
}

/// A stored document embedding, produced by the offline ingestion job
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingEntry {
  pub id: i64,
  pub title: String,
  pub document: String,
  pub embedding: Vec<f32>,
}

impl EmbeddingEntry {
  pub fn from_record(record: &PlantRecord, embedding: Vec<f32>) -> Self {
    Self {
      id: record.id,
      title: record.latin_name().to_string(),
      document: record.document_text(),
      embedding,
    }
  }
}
