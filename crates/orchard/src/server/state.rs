//! Shared handles injected into every handler

use std::sync::Arc;

use crate::catalog::RecordStore;
use crate::config::ServerConfig;
use crate::search::{EmbeddingIndex, QueryResolver};
use crate::snapshots::SnapshotDirectory;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<ServerConfig>,
  pub store: Arc<RecordStore>,
  pub resolver: Arc<QueryResolver>,
  pub snapshots: Arc<SnapshotDirectory>,
}

impl AppState {
  /// Wire the components around an opened record store
  pub fn new(config: ServerConfig, store: Arc<RecordStore>, index: Option<Arc<dyn EmbeddingIndex>>) -> Self {
    let resolver = Arc::new(QueryResolver::new(store.clone(), index, config.default_limit));
    let snapshots = Arc::new(SnapshotDirectory::new(config.data_dir.clone(), config.max_snapshots));
    Self { config: Arc::new(config), store, resolver, snapshots }
  }
}
