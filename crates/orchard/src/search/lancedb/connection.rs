//! Database connection management for LanceDB

use anyhow::{anyhow, Result};
use lancedb::{connect, Connection};
use std::path::{Path, PathBuf};

/// Create a LanceDB connection, creating the index directory if needed
pub async fn create_connection(index_dir: PathBuf) -> Result<Connection> {
  ensure_index_directory_exists(&index_dir)?;

  connect(&index_dir.to_string_lossy())
    .execute()
    .await
    .map_err(|e| anyhow!("Failed to connect to LanceDB at {}: {}", index_dir.display(), e))
}

fn ensure_index_directory_exists(index_dir: &Path) -> Result<()> {
  if !index_dir.exists() {
    std::fs::create_dir_all(index_dir)
      .map_err(|e| anyhow!("Failed to create index directory: {}", e))?;
  }
  Ok(())
}
