mod common;

#[cfg(test)]
mod catalog_tests {
  use super::common;
  use anyhow::Result;
  use orchard::catalog::{find_newest_dataset, parse_dataset, DatasetError, RecordStore};
  use std::fs;
  use std::time::{Duration, SystemTime};
  use tempfile::TempDir;

  fn write_with_mtime(dir: &TempDir, name: &str, contents: &str, age_secs: u64) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    let file = fs::File::options().write(true).open(&path)?;
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))?;
    Ok(path)
  }

  #[test]
  fn test_parse_keeps_file_order_and_fields() -> Result<()> {
    let table = parse_dataset(common::sample_csv().as_bytes())?;

    assert_eq!(table.len(), 3);
    let ids: Vec<i64> = table.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let mango = table.get(1).expect("mango present");
    assert_eq!(mango.latin_name(), "Mangifera indica");
    assert_eq!(mango.field("COMMON NAMES"), "Mango, Kensington Pride");
    assert_eq!(mango.field("Family"), "Anacardiaceae");
    assert!(!mango.fields.contains_key("ID"));
    assert_eq!(mango.similarity, None);

    let avocado = table.get(2).expect("avocado present");
    assert_eq!(avocado.field("ADULTTREE"), "");
    Ok(())
  }

  #[test]
  fn test_parse_rejects_missing_id_column() {
    let csv = "LATIN NAME,COMMON NAMES\nMangifera indica,Mango\n";
    assert!(matches!(parse_dataset(csv.as_bytes()), Err(DatasetError::MissingColumn("ID"))));
  }

  #[test]
  fn test_parse_rejects_non_integer_id() {
    let csv = "LATIN NAME,ID\nMangifera indica,one\n";
    match parse_dataset(csv.as_bytes()) {
      Err(DatasetError::InvalidId { row, value }) => {
        assert_eq!(row, 1);
        assert_eq!(value, "one");
      }
      other => panic!("expected InvalidId, got {other:?}"),
    }
  }

  #[test]
  fn test_parse_rejects_duplicate_ids() {
    let csv = "LATIN NAME,ID\nMangifera indica,4\nPersea americana,4\n";
    assert!(matches!(parse_dataset(csv.as_bytes()), Err(DatasetError::DuplicateId(4))));
  }

  #[test]
  fn test_short_rows_are_padded_with_empty_fields() -> Result<()> {
    let csv = "ID,LATIN NAME,FOLIAGE\n9,Ficus carica\n";
    let table = parse_dataset(csv.as_bytes())?;
    let fig = table.get(9).expect("fig present");
    assert_eq!(fig.latin_name(), "Ficus carica");
    assert_eq!(fig.field("FOLIAGE"), "");
    Ok(())
  }

  #[test]
  fn test_newest_dataset_is_most_recently_modified() -> Result<()> {
    let dir = TempDir::new()?;
    write_with_mtime(&dir, "plants-2025-04-05.csv", &common::sample_csv(), 300)?;
    let newest = write_with_mtime(&dir, "plants-2025-01-01.csv", &common::numbered_csv(2), 10)?;
    write_with_mtime(&dir, "notes.txt", "not a dataset", 0)?;

    assert_eq!(find_newest_dataset(dir.path())?, Some(newest));
    Ok(())
  }

  #[test]
  fn test_missing_directory_has_no_dataset() -> Result<()> {
    let dir = TempDir::new()?;
    assert_eq!(find_newest_dataset(&dir.path().join("absent"))?, None);
    Ok(())
  }

  #[test]
  fn test_store_without_dataset_is_empty_not_degraded() -> Result<()> {
    let dir = TempDir::new()?;
    let store = RecordStore::open(dir.path());

    let snapshot = store.all();
    assert!(snapshot.table.is_empty());
    assert!(!snapshot.is_degraded());
    assert!(store.lookup_by_id(1).is_none());
    Ok(())
  }

  #[test]
  fn test_store_with_malformed_dataset_degrades() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("plants-2025-04-05.csv"), "LATIN NAME\nMangifera indica\n")?;

    let store = RecordStore::open(dir.path());
    let snapshot = store.all();
    assert!(snapshot.is_degraded());
    assert!(snapshot.table.is_empty());
    assert!(snapshot.load_error.as_deref().unwrap_or("").contains("ID"));
    Ok(())
  }

  #[test]
  fn test_lookup_returns_record_equal_to_original() -> Result<()> {
    let table = common::sample_table();
    let original = table.get(3).cloned().expect("feijoa present");

    let store = RecordStore::from_table(table);
    assert_eq!(store.lookup_by_id(3), Some(original));
    assert_eq!(store.lookup_by_id(999_999), None);
    Ok(())
  }

  #[test]
  fn test_filter_preserves_table_order() {
    let store = RecordStore::from_table(common::numbered_table(10));
    let even: Vec<i64> = store.filter(|r| r.id % 2 == 0).iter().map(|r| r.id).collect();
    assert_eq!(even, vec![2, 4, 6, 8, 10]);
  }

  #[test]
  fn test_refresh_swaps_snapshot_without_touching_held_one() -> Result<()> {
    let dir = TempDir::new()?;
    write_with_mtime(&dir, "plants-2025-04-05.csv", &common::sample_csv(), 300)?;

    let store = RecordStore::open(dir.path());
    let before = store.all();
    assert_eq!(before.table.len(), 3);

    write_with_mtime(&dir, "plants-2025-04-06.csv", &common::numbered_csv(50), 0)?;
    let after = store.refresh();

    assert_eq!(after.table.len(), 50);
    assert_eq!(store.all().table.len(), 50);
    // a request still holding the old snapshot keeps a complete table
    assert_eq!(before.table.len(), 3);
    assert_eq!(before.table.get(1).map(|r| r.latin_name().to_string()), Some("Mangifera indica".to_string()));
    Ok(())
  }
}
