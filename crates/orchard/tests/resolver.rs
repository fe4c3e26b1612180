mod common;

#[cfg(test)]
mod resolver_tests {
  use super::common;
  use anyhow::{anyhow, Result};
  use async_trait::async_trait;
  use mockall::mock;
  use orchard::catalog::RecordStore;
  use orchard::search::{EmbeddingIndex, NeighborMatch, QueryResolver, Strategy};
  use orchard::ServiceError;
  use std::fs;
  use std::sync::Arc;
  use tempfile::TempDir;

  /// Index that answers every query with a fixed neighbor list
  struct FixedIndex {
    neighbors: Vec<NeighborMatch>,
  }

  #[async_trait]
  impl EmbeddingIndex for FixedIndex {
    async fn nearest_neighbors(&self, _query: &str, k: usize) -> Result<Vec<NeighborMatch>> {
      Ok(self.neighbors.iter().copied().take(k).collect())
    }
  }

  mock! {
    Index {}

    #[async_trait]
    impl EmbeddingIndex for Index {
      async fn nearest_neighbors(&self, query: &str, k: usize) -> Result<Vec<NeighborMatch>>;
    }
  }

  fn neighbor(id: i64, distance: f32) -> NeighborMatch {
    NeighborMatch { id, distance }
  }

  fn resolver(store: RecordStore, index: Option<Arc<dyn EmbeddingIndex>>) -> QueryResolver {
    QueryResolver::new(Arc::new(store), index, 10)
  }

  #[tokio::test]
  async fn test_substring_mango_matches_only_mango() -> Result<()> {
    let resolver = resolver(RecordStore::from_table(common::sample_table()), None);

    let result = resolver.resolve("mango", None, Strategy::Substring).await?;
    assert_eq!(result.len(), 1);
    assert_eq!(result.records[0].id, 1);
    assert_eq!(result.records[0].similarity, None);
    assert_eq!(result.strategy, Strategy::Substring);
    Ok(())
  }

  #[tokio::test]
  async fn test_substring_is_case_insensitive_and_complete() -> Result<()> {
    let table = common::sample_table();
    let resolver = resolver(RecordStore::from_table(table.clone()), None);

    for query in ["FULL SUN", "evergreen", "Fruit"] {
      let result = resolver.resolve(query, None, Strategy::Substring).await?;
      let needle = query.to_lowercase();
      let expected: Vec<i64> =
        table.records().iter().filter(|r| r.contains_lowercase(&needle)).map(|r| r.id).collect();
      let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
      assert_eq!(ids, expected, "query {query}");
      assert_eq!(ids, vec![1, 2, 3], "query {query}");
    }
    Ok(())
  }

  #[tokio::test]
  async fn test_substring_matches_id_text() -> Result<()> {
    let resolver = resolver(RecordStore::from_table(common::numbered_table(30)), None);

    let result = resolver.resolve("Plantus 17", None, Strategy::Substring).await?;
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![17]);
    Ok(())
  }

  #[tokio::test]
  async fn test_substring_without_match_is_empty() -> Result<()> {
    let resolver = resolver(RecordStore::from_table(common::sample_table()), None);

    let result = resolver.resolve("xyzzynotaplant", None, Strategy::Substring).await?;
    assert!(result.is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_substring_limit_keeps_table_order() -> Result<()> {
    let resolver = resolver(RecordStore::from_table(common::numbered_table(20)), None);

    let result = resolver.resolve("testaceae", Some(5), Strategy::Substring).await?;
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    Ok(())
  }

  #[tokio::test]
  async fn test_zero_limit_is_invalid() {
    let resolver = resolver(RecordStore::from_table(common::sample_table()), None);

    let result = resolver.resolve("mango", Some(0), Strategy::Substring).await;
    assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
  }

  #[tokio::test]
  async fn test_nearest_orders_by_distance_and_attaches_similarity() -> Result<()> {
    let index = FixedIndex { neighbors: vec![neighbor(3, 0.9), neighbor(1, 0.1), neighbor(2, 0.5)] };
    let resolver = resolver(RecordStore::from_table(common::sample_table()), Some(Arc::new(index)));

    let result = resolver.resolve("tropical fruit", Some(3), Strategy::NearestNeighbor).await?;
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let similarities: Vec<f32> = result.records.iter().filter_map(|r| r.similarity).collect();
    assert_eq!(similarities, vec![0.1, 0.5, 0.9]);
    Ok(())
  }

  #[tokio::test]
  async fn test_nearest_returns_at_most_k() -> Result<()> {
    let neighbors = (1..=10).map(|id| neighbor(id, id as f32)).collect();
    let resolver = resolver(RecordStore::from_table(common::numbered_table(10)), Some(Arc::new(FixedIndex { neighbors })));

    let result = resolver.resolve("herb", Some(4), Strategy::NearestNeighbor).await?;
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    Ok(())
  }

  #[tokio::test]
  async fn test_nearest_with_fewer_entries_than_k() -> Result<()> {
    let index = FixedIndex { neighbors: vec![neighbor(2, 0.3), neighbor(1, 0.4)] };
    let resolver = resolver(RecordStore::from_table(common::sample_table()), Some(Arc::new(index)));

    let result = resolver.resolve("fruit", Some(10), Strategy::NearestNeighbor).await?;
    assert_eq!(result.len(), 2);
    Ok(())
  }

  #[tokio::test]
  async fn test_nearest_skips_ids_missing_from_table() -> Result<()> {
    let index = FixedIndex { neighbors: vec![neighbor(42, 0.05), neighbor(3, 0.2), neighbor(1, 0.3)] };
    let resolver = resolver(RecordStore::from_table(common::sample_table()), Some(Arc::new(index)));

    let result = resolver.resolve("fruit", Some(5), Strategy::NearestNeighbor).await?;
    let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 1]);
    Ok(())
  }

  #[tokio::test]
  async fn test_nearest_uses_default_limit_when_unset() -> Result<()> {
    let mut index = MockIndex::new();
    index
      .expect_nearest_neighbors()
      .withf(|query, k| query == "citrus" && *k == 10)
      .times(1)
      .returning(|_, _| Ok(vec![neighbor(2, 0.2)]));

    let resolver = resolver(RecordStore::from_table(common::sample_table()), Some(Arc::new(index)));
    let result = resolver.resolve("citrus", None, Strategy::NearestNeighbor).await?;
    assert_eq!(result.records[0].id, 2);
    Ok(())
  }

  #[tokio::test]
  async fn test_index_failure_is_index_unavailable() {
    let mut index = MockIndex::new();
    index.expect_nearest_neighbors().returning(|_, _| Err(anyhow!("lance table missing")));

    let resolver = resolver(RecordStore::from_table(common::sample_table()), Some(Arc::new(index)));
    match resolver.resolve("fruit", Some(3), Strategy::NearestNeighbor).await {
      Err(ServiceError::IndexUnavailable(reason)) => assert!(reason.contains("lance table missing")),
      other => panic!("expected IndexUnavailable, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_nearest_without_index_is_index_unavailable() {
    let resolver = resolver(RecordStore::from_table(common::sample_table()), None);

    let result = resolver.resolve("fruit", None, Strategy::NearestNeighbor).await;
    assert!(matches!(result, Err(ServiceError::IndexUnavailable(_))));
  }

  #[tokio::test]
  async fn test_degraded_store_is_dataset_unavailable() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("plants-2025-04-05.csv"), "ID,LATIN NAME\nx,Mangifera indica\n")?;

    let resolver = resolver(RecordStore::open(dir.path()), None);
    let result = resolver.resolve("mango", None, Strategy::Substring).await;
    assert!(matches!(result, Err(ServiceError::DatasetUnavailable(_))));
    Ok(())
  }

  #[test]
  fn test_strategy_parsing() {
    assert_eq!("substring".parse::<Strategy>().ok(), Some(Strategy::Substring));
    assert_eq!("nearest-neighbor".parse::<Strategy>().ok(), Some(Strategy::NearestNeighbor));
    assert_eq!("Semantic".parse::<Strategy>().ok(), Some(Strategy::NearestNeighbor));
    assert!(matches!("fuzzy".parse::<Strategy>(), Err(ServiceError::InvalidRequest(_))));
  }
}
