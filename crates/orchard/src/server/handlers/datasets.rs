//! Dataset snapshot upload

use axum::{
  extract::{Extension, Multipart, State},
  http::StatusCode,
  response::Json,
};
use anyhow::anyhow;
use chrono::Local;

use crate::error::ServiceError;
use crate::server::error::ApiFailure;
use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, UploadResponse};

const FILE_FIELD: &str = "file";

/// POST /datasets - Store an uploaded CSV as today's snapshot and reload the catalog
pub async fn upload_dataset(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  multipart: Multipart,
) -> Result<(StatusCode, Json<BaseResponse<UploadResponse>>), ApiFailure> {
  let contents = read_file_field(multipart).await.map_err(|e| context.failure(e))?;
  let today = Local::now().date_naive();

  context.log_info(&format!("Received dataset upload of {} bytes", contents.len()), "datasets-api");

  let stored = state
    .snapshots
    .ingest(&contents, today)
    .await
    .map_err(|e| context.failure(e.into()))?;

  let store = state.store.clone();
  let snapshot = tokio::task::spawn_blocking(move || store.refresh())
    .await
    .map_err(|e| context.failure(ServiceError::Internal(anyhow!("Catalog reload failed: {e}"))))?;
  context.log_info(
    &format!("Stored snapshot {}; catalog now serves {} plants", stored.name, snapshot.table.len()),
    "datasets-api",
  );

  let response = UploadResponse {
    snapshot: stored.name,
    records: stored.records,
    evicted: stored
      .evicted
      .iter()
      .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().to_string()))
      .collect(),
  };
  Ok((StatusCode::CREATED, Json(BaseResponse::success(response, context.request_id))))
}

/// Bytes of the `file` field, or of the first field carrying a file name
async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, ServiceError> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ServiceError::InvalidRequest(format!("Malformed multipart body: {e}")))?
  {
    if field.name() == Some(FILE_FIELD) || field.file_name().is_some() {
      let bytes = field
        .bytes()
        .await
        .map_err(|e| ServiceError::InvalidRequest(format!("Failed to read uploaded file: {e}")))?;
      return Ok(bytes.to_vec());
    }
  }

  Err(ServiceError::InvalidRequest(format!("multipart field '{FILE_FIELD}' is required")))
}
