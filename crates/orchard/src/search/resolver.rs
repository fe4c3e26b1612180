//! Query resolver: substring filtering or nearest-neighbor retrieval,
//! reconciled against the current record table

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalog::{PlantRecord, RecordStore, TableSnapshot};
use crate::error::ServiceError;
use crate::search::index::{EmbeddingIndex, NeighborMatch};

/// How a free-text query is matched against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
  /// Case-insensitive substring match over every field
  #[default]
  Substring,
  /// Embedding similarity through the embedding index
  NearestNeighbor,
}

impl Strategy {
  pub fn as_str(&self) -> &'static str {
    match self {
      Strategy::Substring => "substring",
      Strategy::NearestNeighbor => "nearest-neighbor",
    }
  }
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Strategy {
  type Err = ServiceError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "substring" => Ok(Strategy::Substring),
      "nearest-neighbor" | "nearest_neighbor" | "semantic" => Ok(Strategy::NearestNeighbor),
      other => Err(ServiceError::InvalidRequest(format!(
        "Invalid strategy '{other}'. Must be 'substring' or 'nearest-neighbor'."
      ))),
    }
  }
}

/// Records matched by one query, in resolver order
#[derive(Debug, Clone)]
pub struct QueryResult {
  pub query: String,
  pub strategy: Strategy,
  pub records: Vec<PlantRecord>,
}

impl QueryResult {
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }
}

pub struct QueryResolver {
  store: Arc<RecordStore>,
  index: Option<Arc<dyn EmbeddingIndex>>,
  default_limit: usize,
}

impl QueryResolver {
  pub fn new(store: Arc<RecordStore>, index: Option<Arc<dyn EmbeddingIndex>>, default_limit: usize) -> Self {
    Self { store, index, default_limit: default_limit.max(1) }
  }

  pub fn has_index(&self) -> bool {
    self.index.is_some()
  }

  pub fn store(&self) -> &Arc<RecordStore> {
    &self.store
  }

  /// Resolve `query` to an ordered record set. An empty result is returned
  /// as such; callers decide how to present it.
  pub async fn resolve(
    &self,
    query: &str,
    limit: Option<usize>,
    strategy: Strategy,
  ) -> Result<QueryResult, ServiceError> {
    if limit == Some(0) {
      return Err(ServiceError::InvalidRequest("limit must be at least 1".to_string()));
    }

    let snapshot = self.store.all();
    if let Some(reason) = &snapshot.load_error {
      return Err(ServiceError::DatasetUnavailable(reason.clone()));
    }

    let records = match strategy {
      Strategy::Substring => resolve_substring(&snapshot, query, limit),
      Strategy::NearestNeighbor => {
        let k = limit.unwrap_or(self.default_limit);
        self.resolve_nearest(&snapshot, query, k).await?
      }
    };

    Ok(QueryResult { query: query.to_string(), strategy, records })
  }

  async fn resolve_nearest(
    &self,
    snapshot: &TableSnapshot,
    query: &str,
    k: usize,
  ) -> Result<Vec<PlantRecord>, ServiceError> {
    let index = self
      .index
      .as_ref()
      .ok_or_else(|| ServiceError::IndexUnavailable("no embedding index is configured".to_string()))?;

    let neighbors = index
      .nearest_neighbors(query, k)
      .await
      .map_err(|e| ServiceError::IndexUnavailable(format!("{e:#}")))?;

    Ok(reconcile_neighbors(snapshot, neighbors, k))
  }
}

fn resolve_substring(snapshot: &TableSnapshot, query: &str, limit: Option<usize>) -> Vec<PlantRecord> {
  let needle = query.to_lowercase();
  let matches = snapshot.table.records().iter().filter(|record| record.contains_lowercase(&needle));

  match limit {
    Some(limit) => matches.take(limit).cloned().collect(),
    None => matches.cloned().collect(),
  }
}

/// Join neighbor ids back to table rows, closest first. Ids the table does
/// not know (index built from another dataset) are dropped.
fn reconcile_neighbors(snapshot: &TableSnapshot, mut neighbors: Vec<NeighborMatch>, k: usize) -> Vec<PlantRecord> {
  neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));

  let mut records = Vec::with_capacity(neighbors.len().min(k));
  for neighbor in neighbors {
    if records.len() == k {
      break;
    }
    match snapshot.table.get(neighbor.id) {
      Some(record) => records.push(record.clone().with_similarity(neighbor.distance)),
      None => tracing::warn!("Embedding index returned unknown plant id {}", neighbor.id),
    }
  }
  records
}
