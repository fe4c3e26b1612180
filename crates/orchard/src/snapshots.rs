//! Date-named dataset snapshots with bounded retention
//!
//! Each accepted upload is written as `plants-YYYY-MM-DD.csv`. At most one
//! snapshot exists per date and only the newest `max_snapshots` are kept.

use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::catalog::{parse_dataset, DatasetError};

pub const SNAPSHOT_PREFIX: &str = "plants-";
pub const SNAPSHOT_SUFFIX: &str = ".csv";
pub const DEFAULT_MAX_SNAPSHOTS: usize = 3;

#[derive(Debug, Error)]
pub enum SnapshotError {
  #[error("snapshot {0} already exists")]
  AlreadyExists(String),

  #[error("invalid dataset: {0}")]
  InvalidDataset(#[from] DatasetError),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Outcome of an accepted upload
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
  pub name: String,
  pub path: PathBuf,
  pub records: usize,
  /// Snapshots removed to stay within the retention bound
  pub evicted: Vec<PathBuf>,
}

/// File name of the snapshot ingested on `date`
pub fn snapshot_name(date: NaiveDate) -> String {
  format!("{SNAPSHOT_PREFIX}{}{SNAPSHOT_SUFFIX}", date.format("%Y-%m-%d"))
}

/// Ingestion date encoded in a snapshot file name
pub fn parse_snapshot_date(file_name: &str) -> Option<NaiveDate> {
  let date = file_name.strip_prefix(SNAPSHOT_PREFIX)?.strip_suffix(SNAPSHOT_SUFFIX)?;
  NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

pub struct SnapshotDirectory {
  dir: PathBuf,
  max_snapshots: usize,
  // serializes the exists-check, write and eviction of concurrent uploads
  lock: Mutex<()>,
}

impl SnapshotDirectory {
  pub fn new(dir: impl Into<PathBuf>, max_snapshots: usize) -> Self {
    Self { dir: dir.into(), max_snapshots: max_snapshots.max(1), lock: Mutex::new(()) }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Snapshot files present on disk, oldest first
  pub fn list(&self) -> std::io::Result<Vec<(NaiveDate, PathBuf)>> {
    if !self.dir.exists() {
      return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for entry in std::fs::read_dir(&self.dir)? {
      let path = entry?.path();
      let date = path.file_name().and_then(|name| name.to_str()).and_then(parse_snapshot_date);
      if let Some(date) = date {
        if path.is_file() {
          snapshots.push((date, path));
        }
      }
    }
    snapshots.sort();
    Ok(snapshots)
  }

  /// Validate and store an uploaded dataset as the snapshot for `date`,
  /// then evict the oldest snapshots beyond the retention bound.
  pub async fn ingest(&self, contents: &[u8], date: NaiveDate) -> Result<StoredSnapshot, SnapshotError> {
    let _guard = self.lock.lock().await;

    let table = parse_dataset(contents)?;
    let name = snapshot_name(date);
    let path = self.dir.join(&name);

    tokio::fs::create_dir_all(&self.dir).await?;
    let mut file = match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
      Ok(file) => file,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(SnapshotError::AlreadyExists(name)),
      Err(e) => return Err(e.into()),
    };

    if let Err(e) = write_contents(&mut file, contents).await {
      drop(file);
      let _ = tokio::fs::remove_file(&path).await;
      return Err(e.into());
    }

    let evicted = self.evict_oldest(&path).await;
    tracing::info!(
      "Stored dataset snapshot {name} with {} plants ({} evicted)",
      table.len(),
      evicted.len()
    );

    Ok(StoredSnapshot { name, path, records: table.len(), evicted })
  }

  /// Remove the oldest snapshots other than `keep` until the retention bound
  /// holds. The upload is already stored, so failures are only logged.
  async fn evict_oldest(&self, keep: &Path) -> Vec<PathBuf> {
    let candidates: Vec<PathBuf> = match self.list() {
      Ok(snapshots) => snapshots.into_iter().map(|(_, path)| path).filter(|path| path != keep).collect(),
      Err(e) => {
        tracing::warn!("Failed to list snapshots in {} for eviction: {e}", self.dir.display());
        return Vec::new();
      }
    };

    let excess = (candidates.len() + 1).saturating_sub(self.max_snapshots);
    remove_snapshots(candidates.into_iter().take(excess)).await
  }
}

/// Delete each path, returning the ones actually removed
async fn remove_snapshots(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
  let mut evicted = Vec::new();
  for path in paths {
    match tokio::fs::remove_file(&path).await {
      Ok(()) => {
        tracing::info!("Evicted dataset snapshot {}", path.display());
        evicted.push(path);
      }
      Err(e) => tracing::warn!("Failed to evict dataset snapshot {}: {e}", path.display()),
    }
  }
  evicted
}

async fn write_contents(file: &mut tokio::fs::File, contents: &[u8]) -> std::io::Result<()> {
  file.write_all(contents).await?;
  file.flush().await?;
  file.sync_all().await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_snapshot_name_round_trips_date() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();
    assert_eq!(snapshot_name(date), "plants-2025-04-05.csv");
    assert_eq!(parse_snapshot_date("plants-2025-04-05.csv"), Some(date));
  }

  #[tokio::test]
  async fn test_failed_removal_does_not_stop_eviction() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let missing = dir.path().join("plants-2025-04-01.csv");
    let present = dir.path().join("plants-2025-04-02.csv");
    std::fs::write(&present, "ID,LATIN NAME\n1,Ficus carica\n")?;

    let evicted = remove_snapshots(vec![missing, present.clone()]).await;
    assert_eq!(evicted, vec![present.clone()]);
    assert!(!present.exists());
    Ok(())
  }

  #[test]
  fn test_foreign_names_are_not_snapshots() {
    assert_eq!(parse_snapshot_date("plants.csv"), None);
    assert_eq!(parse_snapshot_date("plants-2025-13-01.csv"), None);
    assert_eq!(parse_snapshot_date("trees-2025-04-05.csv"), None);
  }
}
