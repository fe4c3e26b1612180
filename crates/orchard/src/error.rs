//! Service error taxonomy shared by the resolver, the snapshot directory and
//! the HTTP layer.

use thiserror::Error;

use crate::snapshots::SnapshotError;

#[derive(Debug, Error)]
pub enum ServiceError {
  /// No plant carries the requested id
  #[error("Plant {0} not found")]
  PlantNotFound(i64),

  /// A search produced an empty result set
  #[error("No plants found matching '{0}'")]
  NoMatches(String),

  /// Malformed selector, id or parameter supplied by the client
  #[error("{0}")]
  InvalidRequest(String),

  /// An upload targeted a snapshot name that is already taken
  #[error("A dataset snapshot named '{0}' already exists")]
  SnapshotExists(String),

  /// The embedding index is missing or failed to answer
  #[error("Embedding index unavailable: {0}")]
  IndexUnavailable(String),

  /// The record store could not load its dataset
  #[error("Plant dataset unavailable: {0}")]
  DatasetUnavailable(String),

  #[error(transparent)]
  Internal(#[from] anyhow::Error),
}

impl From<SnapshotError> for ServiceError {
  fn from(error: SnapshotError) -> Self {
    match error {
      SnapshotError::AlreadyExists(name) => ServiceError::SnapshotExists(name),
      SnapshotError::InvalidDataset(e) => {
        ServiceError::InvalidRequest(format!("Uploaded file is not a valid plant dataset: {e}"))
      }
      SnapshotError::Io(e) => ServiceError::Internal(anyhow::Error::new(e).context("snapshot write failed")),
    }
  }
}
