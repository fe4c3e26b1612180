//! Mapping of service errors onto HTTP responses

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::server::types::{ApiError, BaseResponse};

impl ServiceError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      ServiceError::PlantNotFound(_) | ServiceError::NoMatches(_) => StatusCode::NOT_FOUND,
      ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      ServiceError::SnapshotExists(_) => StatusCode::CONFLICT,
      ServiceError::IndexUnavailable(_) | ServiceError::DatasetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Stable error key reported in the response envelope
  pub fn key(&self) -> &'static str {
    match self {
      ServiceError::PlantNotFound(_) => "plant_not_found",
      ServiceError::NoMatches(_) => "no_plants_found",
      ServiceError::InvalidRequest(_) => "invalid_request",
      ServiceError::SnapshotExists(_) => "snapshot_exists",
      ServiceError::IndexUnavailable(_) => "index_unavailable",
      ServiceError::DatasetUnavailable(_) => "dataset_unavailable",
      ServiceError::Internal(_) => "internal_error",
    }
  }
}

/// A failed request: the error plus the transaction id it is reported under
#[derive(Debug)]
pub struct ApiFailure {
  pub error: ServiceError,
  pub transaction_id: Uuid,
}

impl ApiFailure {
  pub fn new(error: ServiceError, transaction_id: Uuid) -> Self {
    Self { error, transaction_id }
  }
}

impl IntoResponse for ApiFailure {
  fn into_response(self) -> Response {
    let message = match &self.error {
      ServiceError::Internal(e) => format!("{e:#}"),
      other => other.to_string(),
    };
    let body = BaseResponse::<()>::error(vec![ApiError::new(self.error.key(), &message)], self.transaction_id);
    (self.error.status_code(), Json(body)).into_response()
  }
}
