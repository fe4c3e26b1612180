//! REST API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::render::PlantsPayload;

// Base Response Structure
// ======================

/// Base response object for all JSON endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
  /// API versioning information
  pub versioning: VersionInfo,

  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,

  /// Optional error information
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  /// Response data (generic for different endpoint types)
  #[serde(flatten)]
  pub data: T,
}

/// API versioning information
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
  pub latest: String,
  pub requested: String,
  pub resolved: String,
}

/// API error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,

  #[serde(default)]
  pub stack: Vec<String>,

  #[serde(default)]
  pub context: serde_json::Value,
}

// Query Parameters
// ================

/// Query string of GET /plants. Values stay textual so malformed input
/// is reported through the error envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  pub query: Option<String>,
  pub limit: Option<String>,
  #[serde(alias = "return_type")]
  pub format: Option<String>,
  pub strategy: Option<String>,
}

/// Query string of GET /plants/{id}
#[derive(Debug, Default, Deserialize)]
pub struct FormatParams {
  #[serde(alias = "return_type")]
  pub format: Option<String>,
}

// Responses
// =========

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
  pub version: String,
}

/// Response for /status
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  /// "healthy", or "degraded" when the dataset failed to load
  pub status: String,
  pub version: String,
  /// Dataset file backing the catalog
  pub dataset: Option<String>,
  pub records: usize,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub load_error: Option<String>,
  pub index_configured: bool,
  /// Snapshot files on disk, oldest first
  pub snapshots: Vec<String>,
}

/// Response for POST /datasets
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
  pub snapshot: String,
  pub records: usize,
  pub evicted: Vec<String>,
}

// Helper Functions
// ================

fn current_version() -> VersionInfo {
  let version = env!("CARGO_PKG_VERSION");
  VersionInfo { latest: version.to_string(), requested: version.to_string(), resolved: version.to_string() }
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { versioning: current_version(), transaction_id, errors: Vec::new(), data }
  }

  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> BaseResponse<()> {
    BaseResponse { versioning: current_version(), transaction_id, errors, data: () }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string(), stack: Vec::new(), context: serde_json::Value::Null }
  }
}
