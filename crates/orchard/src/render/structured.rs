//! Structured (JSON) rendering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::record::ID_COLUMN;
use crate::catalog::PlantRecord;
use crate::error::ServiceError;
use crate::search::QueryResult;

pub const SIMILARITY_KEY: &str = "similarity";

/// Plant list payload of the JSON API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantsPayload {
  /// Query text, absent for id lookups
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub query: Option<String>,

  /// Number of plants returned
  pub count: usize,

  /// One field-name -> text mapping per plant
  pub plants: Vec<BTreeMap<String, String>>,
}

impl PlantsPayload {
  pub fn from_result(result: &QueryResult) -> Self {
    Self {
      query: Some(result.query.clone()),
      count: result.len(),
      plants: result.records.iter().map(plant_to_map).collect(),
    }
  }

  pub fn single(record: &PlantRecord) -> Self {
    Self { query: None, count: 1, plants: vec![plant_to_map(record)] }
  }
}

/// Every field as text, plus `ID` and, when present, `similarity`
pub fn plant_to_map(record: &PlantRecord) -> BTreeMap<String, String> {
  let mut map = record.fields.clone();
  map.insert(ID_COLUMN.to_string(), record.id.to_string());
  if let Some(similarity) = record.similarity {
    map.insert(SIMILARITY_KEY.to_string(), similarity.to_string());
  }
  map
}

/// Rebuild a record from its structured form
pub fn plant_from_map(mut map: BTreeMap<String, String>) -> Result<PlantRecord, ServiceError> {
  let raw_id = map
    .remove(ID_COLUMN)
    .ok_or_else(|| ServiceError::InvalidRequest(format!("missing '{ID_COLUMN}' field")))?;
  let id = raw_id
    .trim()
    .parse::<i64>()
    .map_err(|_| ServiceError::InvalidRequest(format!("invalid plant id '{raw_id}'")))?;

  let similarity = match map.remove(SIMILARITY_KEY) {
    Some(raw) => Some(
      raw
        .parse::<f32>()
        .map_err(|_| ServiceError::InvalidRequest(format!("invalid similarity '{raw}'")))?,
    ),
    None => None,
  };

  Ok(PlantRecord { id, fields: map, similarity })
}
