//! Dataset discovery and CSV parsing

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use super::record::{PlantRecord, RecordTable, ID_COLUMN, REQUIRED_COLUMNS};

pub const DATASET_EXTENSION: &str = "csv";

#[derive(Debug, Error)]
pub enum DatasetError {
  #[error("failed to read {path}: {source}")]
  Io { path: PathBuf, source: std::io::Error },

  #[error("malformed CSV: {0}")]
  Csv(#[from] csv::Error),

  #[error("missing required column '{0}'")]
  MissingColumn(&'static str),

  #[error("row {row}: invalid plant id '{value}'")]
  InvalidId { row: usize, value: String },

  #[error("duplicate plant id {0}")]
  DuplicateId(i64),
}

/// Parse a CSV dataset into a record table
pub fn parse_dataset<R: Read>(reader: R) -> Result<RecordTable, DatasetError> {
  let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

  let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
  for &column in REQUIRED_COLUMNS {
    if !headers.iter().any(|h| h == column) {
      return Err(DatasetError::MissingColumn(column));
    }
  }
  let id_index = headers.iter().position(|h| h == ID_COLUMN).ok_or(DatasetError::MissingColumn(ID_COLUMN))?;

  let mut records = Vec::new();
  for (row, row_result) in csv_reader.records().enumerate() {
    let row_record = row_result?;
    let raw_id = row_record.get(id_index).unwrap_or("").trim();
    let id = raw_id
      .parse::<i64>()
      .map_err(|_| DatasetError::InvalidId { row: row + 1, value: raw_id.to_string() })?;

    let fields: BTreeMap<String, String> = headers
      .iter()
      .enumerate()
      .filter(|(index, _)| *index != id_index)
      .map(|(index, header)| (header.clone(), row_record.get(index).unwrap_or("").to_string()))
      .collect();

    records.push(PlantRecord::new(id, fields));
  }

  RecordTable::from_records(records)
}

/// Load a dataset file from disk
pub fn load_dataset(path: &Path) -> Result<RecordTable, DatasetError> {
  let file =
    fs::File::open(path).map_err(|source| DatasetError::Io { path: path.to_path_buf(), source })?;
  parse_dataset(file)
}

/// Check whether a path looks like a dataset file
pub fn is_dataset_file(path: &Path) -> bool {
  path.is_file()
    && path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case(DATASET_EXTENSION))
}

/// Most recently modified dataset file in `dir`, if any.
/// A missing directory counts as empty.
pub fn find_newest_dataset(dir: &Path) -> Result<Option<PathBuf>> {
  if !dir.exists() {
    return Ok(None);
  }

  let mut newest: Option<(SystemTime, PathBuf)> = None;
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
    let path = entry?.path();
    if !is_dataset_file(&path) {
      continue;
    }

    let modified = fs::metadata(&path)?.modified()?;
    let is_newer = match &newest {
      Some((best_time, best_path)) => (modified, &path) > (*best_time, best_path),
      None => true,
    };
    if is_newer {
      newest = Some((modified, path));
    }
  }

  Ok(newest.map(|(_, path)| path))
}
