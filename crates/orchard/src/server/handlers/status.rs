//! Status and version endpoint handlers

use axum::{extract::State, response::Json};
use uuid::Uuid;

use crate::server::state::AppState;
use crate::server::types::{BaseResponse, StatusResponse, VersionResponse};

/// GET /status - Health check endpoint
pub async fn status(State(state): State<AppState>) -> Json<BaseResponse<StatusResponse>> {
  let transaction_id = Uuid::new_v4();
  let snapshot = state.store.all();

  let snapshots = match state.snapshots.list() {
    Ok(snapshots) => snapshots
      .iter()
      .filter_map(|(_, path)| path.file_name().map(|name| name.to_string_lossy().to_string()))
      .collect(),
    Err(e) => {
      tracing::warn!("Failed to list dataset snapshots: {e}");
      Vec::new()
    }
  };

  let response = StatusResponse {
    status: if snapshot.is_degraded() { "degraded" } else { "healthy" }.to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    dataset: snapshot.source.as_ref().map(|path| path.display().to_string()),
    records: snapshot.table.len(),
    load_error: snapshot.load_error.clone(),
    index_configured: state.resolver.has_index(),
    snapshots,
  };

  Json(BaseResponse::success(response, transaction_id))
}

/// GET /version - Returns current API version
pub async fn version() -> Json<BaseResponse<VersionResponse>> {
  let transaction_id = Uuid::new_v4();
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };

  Json(BaseResponse::success(response, transaction_id))
}
