//! LanceDB-backed embedding index
//!
//! Stores one row per plant (id, title, document, embedding). Queries embed
//! the raw text with the same model used at ingestion and return LanceDB's
//! L2 `_distance`, so smaller values mean closer matches.

pub mod connection;
pub mod records;
pub mod search;
pub mod table_manager;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::search::embedder::Embedder;
use crate::search::index::{EmbeddingEntry, EmbeddingIndex, NeighborMatch};
use connection::create_connection;
use search::search_nearest;
use table_manager::TableManager;

pub const DEFAULT_TABLE_NAME: &str = "plants";

pub struct LanceDbIndex {
  table_manager: TableManager,
  embedder: Arc<dyn Embedder>,
}

impl LanceDbIndex {
  /// Open (or create) the index directory
  pub async fn open(index_dir: PathBuf, table_name: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
    let connection = create_connection(index_dir).await?;
    let table_manager = TableManager::new(connection, table_name.to_string());
    Ok(Self { table_manager, embedder })
  }

  pub fn embedder(&self) -> &Arc<dyn Embedder> {
    &self.embedder
  }

  /// Number of stored embeddings, zero when the table does not exist yet
  pub async fn count(&self) -> Result<usize> {
    if !self.table_manager.table_exists().await? {
      return Ok(0);
    }
    self.table_manager.count_rows().await
  }

  /// Replace every stored embedding with `entries`
  pub async fn replace_all(&self, entries: &[EmbeddingEntry]) -> Result<()> {
    self.table_manager.replace_entries(entries).await
  }
}

#[async_trait]
impl EmbeddingIndex for LanceDbIndex {
  async fn nearest_neighbors(&self, query: &str, k: usize) -> Result<Vec<NeighborMatch>> {
    let query_embedding = self
      .embedder
      .embed(vec![query.to_string()])
      .await?
      .into_iter()
      .next()
      .ok_or_else(|| anyhow!("Embedder returned no vector for the query"))?;

    let table = self.table_manager.get_table().await?;
    search_nearest(&table, &query_embedding, k).await
  }
}
