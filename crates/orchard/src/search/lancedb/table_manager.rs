//! Table management operations for LanceDB

use anyhow::{anyhow, Result};
use arrow::record_batch::RecordBatchIterator;
use lancedb::{Connection, Table};

use super::records::{entries_to_arrow_batch, ID_FIELD};
use crate::search::index::EmbeddingEntry;

pub struct TableManager {
  connection: Connection,
  table_name: String,
}

impl TableManager {
  pub fn new(connection: Connection, table_name: String) -> Self {
    Self { connection, table_name }
  }

  pub async fn table_exists(&self) -> Result<bool> {
    let tables = self
      .connection
      .table_names()
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to list tables: {}", e))?;
    Ok(tables.contains(&self.table_name))
  }

  pub async fn get_table(&self) -> Result<Table> {
    self
      .connection
      .open_table(&self.table_name)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to open table '{}': {}", self.table_name, e))
  }

  pub async fn count_rows(&self) -> Result<usize> {
    let table = self.get_table().await?;
    table.count_rows(None).await.map_err(|e| anyhow!("Failed to count rows: {}", e))
  }

  /// Replace the table contents with `entries`, creating the table on first use
  pub async fn replace_entries(&self, entries: &[EmbeddingEntry]) -> Result<()> {
    let batch = entries_to_arrow_batch(entries)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    if self.table_exists().await? {
      let table = self.get_table().await?;
      table
        .delete(&format!("{ID_FIELD} IS NOT NULL"))
        .await
        .map_err(|e| anyhow!("Failed to clear table '{}': {}", self.table_name, e))?;
      table
        .add(batch_iter)
        .execute()
        .await
        .map_err(|e| anyhow!("Failed to store embeddings: {}", e))?;
    } else {
      self
        .connection
        .create_table(&self.table_name, batch_iter)
        .execute()
        .await
        .map_err(|e| anyhow!("Failed to create table '{}': {}", self.table_name, e))?;
    }

    tracing::info!("Stored {} embeddings in table '{}'", entries.len(), self.table_name);
    Ok(())
  }
}
