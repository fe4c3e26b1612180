//! Record store holding the current dataset snapshot
//!
//! The table is immutable once loaded. A refresh builds a complete new table
//! and swaps the shared pointer, so requests holding the previous snapshot
//! keep reading a consistent table.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::loader::{find_newest_dataset, load_dataset};
use super::record::{PlantRecord, RecordTable};

/// A loaded table together with where it came from
#[derive(Debug, Default)]
pub struct TableSnapshot {
  pub table: RecordTable,
  /// Dataset file backing this table, `None` when no file was found
  pub source: Option<PathBuf>,
  /// Why the dataset could not be loaded; the table is empty when set
  pub load_error: Option<String>,
}

impl TableSnapshot {
  pub fn is_degraded(&self) -> bool {
    self.load_error.is_some()
  }
}

pub struct RecordStore {
  data_dir: Option<PathBuf>,
  current: RwLock<Arc<TableSnapshot>>,
}

impl RecordStore {
  /// Open the store on a data directory, loading its newest dataset.
  /// Load failures leave the store empty and degraded instead of failing.
  pub fn open(data_dir: impl Into<PathBuf>) -> Self {
    let data_dir = data_dir.into();
    let snapshot = load_snapshot(&data_dir);
    Self { data_dir: Some(data_dir), current: RwLock::new(Arc::new(snapshot)) }
  }

  /// Store over an already built table, with no backing directory
  pub fn from_table(table: RecordTable) -> Self {
    let snapshot = TableSnapshot { table, source: None, load_error: None };
    Self { data_dir: None, current: RwLock::new(Arc::new(snapshot)) }
  }

  pub fn data_dir(&self) -> Option<&Path> {
    self.data_dir.as_deref()
  }

  /// The current snapshot
  pub fn all(&self) -> Arc<TableSnapshot> {
    self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
  }

  pub fn lookup_by_id(&self, id: i64) -> Option<PlantRecord> {
    self.all().table.get(id).cloned()
  }

  pub fn filter<P>(&self, predicate: P) -> Vec<PlantRecord>
  where
    P: Fn(&PlantRecord) -> bool,
  {
    self.all().table.filter(predicate)
  }

  /// Rediscover the newest dataset and publish it. Without a data directory
  /// the current snapshot is kept.
  pub fn refresh(&self) -> Arc<TableSnapshot> {
    let Some(data_dir) = &self.data_dir else {
      return self.all();
    };

    let snapshot = Arc::new(load_snapshot(data_dir));
    let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *current = snapshot.clone();
    snapshot
  }
}

fn load_snapshot(data_dir: &Path) -> TableSnapshot {
  let source = match find_newest_dataset(data_dir) {
    Ok(Some(path)) => path,
    Ok(None) => {
      tracing::warn!("No plant dataset found in {}; starting with an empty catalog", data_dir.display());
      return TableSnapshot::default();
    }
    Err(e) => {
      tracing::error!("Failed to scan {} for datasets: {e:#}", data_dir.display());
      return TableSnapshot { load_error: Some(format!("{e:#}")), ..Default::default() };
    }
  };

  match load_dataset(&source) {
    Ok(table) => {
      tracing::info!("Loaded {} plants from {}", table.len(), source.display());
      TableSnapshot { table, source: Some(source), load_error: None }
    }
    Err(e) => {
      tracing::error!("Failed to load plant dataset {}: {e}", source.display());
      TableSnapshot { table: RecordTable::default(), source: Some(source), load_error: Some(e.to_string()) }
    }
  }
}
