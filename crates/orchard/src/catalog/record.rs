//! Plant records and the in-memory record table

use std::collections::{BTreeMap, HashMap};

use super::loader::DatasetError;

/// Column holding the integer plant identifier
pub const ID_COLUMN: &str = "ID";
/// Column holding the taxonomic name, used as the display title
pub const LATIN_NAME_COLUMN: &str = "LATIN NAME";
/// Free-text column that embeds image URLs of the adult plant
pub const IMAGE_COLUMN: &str = "ADULTTREE";
/// Columns every dataset must provide
pub const REQUIRED_COLUMNS: &[&str] = &[ID_COLUMN, LATIN_NAME_COLUMN];
/// Picture columns left out of embedding documents
pub const PICTURE_COLUMNS: &[&str] = &[IMAGE_COLUMN, "EDIBLE PARTS PICTURES", "PLANTING PICTURES"];

/// One row of the plant dataset
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRecord {
  pub id: i64,
  /// Column header -> cell text. Empty cells are kept as empty strings.
  pub fields: BTreeMap<String, String>,
  /// Distance to the query, set only by nearest-neighbor resolution
  pub similarity: Option<f32>,
}

impl PlantRecord {
  pub fn new(id: i64, fields: BTreeMap<String, String>) -> Self {
    Self { id, fields, similarity: None }
  }

  /// Cell text for a column, empty when the column is absent
  pub fn field(&self, column: &str) -> &str {
    self.fields.get(column).map(String::as_str).unwrap_or("")
  }

  pub fn latin_name(&self) -> &str {
    self.field(LATIN_NAME_COLUMN)
  }

  pub fn with_similarity(mut self, distance: f32) -> Self {
    self.similarity = Some(distance);
    self
  }

  /// True when the id or any field contains `needle`, ignoring case.
  /// `needle` must already be lowercased.
  pub fn contains_lowercase(&self, needle: &str) -> bool {
    self.id.to_string().contains(needle)
      || self.fields.values().any(|value| value.to_lowercase().contains(needle))
  }

  /// Text embedded for nearest-neighbor search: every non-picture field,
  /// space separated, empty cells skipped.
  pub fn document_text(&self) -> String {
    self
      .fields
      .iter()
      .filter(|(column, value)| !PICTURE_COLUMNS.contains(&column.as_str()) && !value.trim().is_empty())
      .map(|(_, value)| value.trim())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// The full ordered record set of one dataset file
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
  records: Vec<PlantRecord>,
  positions: HashMap<i64, usize>,
}

impl RecordTable {
  /// Build a table, rejecting duplicate ids
  pub fn from_records(records: Vec<PlantRecord>) -> Result<Self, DatasetError> {
    let mut positions = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
      if positions.insert(record.id, position).is_some() {
        return Err(DatasetError::DuplicateId(record.id));
      }
    }
    Ok(Self { records, positions })
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records in load order
  pub fn records(&self) -> &[PlantRecord] {
    &self.records
  }

  pub fn get(&self, id: i64) -> Option<&PlantRecord> {
    self.positions.get(&id).map(|&position| &self.records[position])
  }

  /// Ordered subsequence of records satisfying `predicate`
  pub fn filter<P>(&self, predicate: P) -> Vec<PlantRecord>
  where
    P: Fn(&PlantRecord) -> bool,
  {
    self.records.iter().filter(|record| predicate(record)).cloned().collect()
  }
}
