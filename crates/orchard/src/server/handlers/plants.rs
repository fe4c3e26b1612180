//! Plant search and lookup handlers

use axum::{
  extract::{rejection::QueryRejection, Extension, Path, Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Json, Response},
};

use crate::config::ServerConfig;
use crate::error::ServiceError;
use crate::render::{self, document, OutputFormat, PlantsPayload, Rendered};
use crate::search::Strategy;
use crate::server::error::ApiFailure;
use crate::server::middleware::RequestContext;
use crate::server::state::AppState;
use crate::server::types::{BaseResponse, FormatParams, SearchParams};

/// Validated GET /plants request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
  pub query: String,
  pub limit: Option<usize>,
  pub format: OutputFormat,
  pub strategy: Strategy,
}

impl SearchRequest {
  pub fn from_params(params: SearchParams, config: &ServerConfig) -> Result<Self, ServiceError> {
    let query = params
      .query
      .filter(|q| !q.trim().is_empty())
      .ok_or_else(|| ServiceError::InvalidRequest("query parameter is required".to_string()))?;

    let limit = params.limit.as_deref().map(|raw| parse_limit(raw, config.max_limit)).transpose()?;
    let format = parse_format(params.format.as_deref())?;
    let strategy = match params.strategy.as_deref() {
      Some(raw) => raw.parse::<Strategy>()?,
      None => config.default_strategy,
    };

    Ok(Self { query, limit, format, strategy })
  }
}

fn parse_limit(raw: &str, max_limit: usize) -> Result<usize, ServiceError> {
  let limit = raw
    .trim()
    .parse::<usize>()
    .map_err(|_| ServiceError::InvalidRequest(format!("Invalid limit '{raw}'. Must be a positive integer.")))?;
  if limit == 0 || limit > max_limit {
    return Err(ServiceError::InvalidRequest(format!("limit must be between 1 and {max_limit}")));
  }
  Ok(limit)
}

fn query_rejection(rejection: QueryRejection) -> ServiceError {
  ServiceError::InvalidRequest(format!("Invalid query string: {}", rejection.body_text()))
}

fn parse_format(raw: Option<&str>) -> Result<OutputFormat, ServiceError> {
  raw.map(|value| value.parse::<OutputFormat>()).transpose().map(Option::unwrap_or_default)
}

/// GET /plants - Search plants by free text
pub async fn search_plants(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiFailure> {
  let Query(params) = params.map_err(|e| context.failure(query_rejection(e)))?;
  let request = SearchRequest::from_params(params, &state.config).map_err(|e| context.failure(e))?;

  context.log_info(
    &format!("Searching plants: query={:?}, strategy={}, limit={:?}", request.query, request.strategy, request.limit),
    "plants-api",
  );

  let result = state
    .resolver
    .resolve(&request.query, request.limit, request.strategy)
    .await
    .map_err(|e| context.failure(e))?;

  context.log_info(&format!("Found {} plant(s) for {:?}", result.len(), request.query), "plants-api");

  if result.is_empty() && request.format == OutputFormat::Structured {
    return Err(context.failure(ServiceError::NoMatches(request.query)));
  }

  Ok(match render::render(&result, request.format) {
    Rendered::Structured(payload) => Json(BaseResponse::success(payload, context.request_id)).into_response(),
    Rendered::Document(html) => Html(html).into_response(),
  })
}

/// GET /plants/{id} - Get a single plant
pub async fn get_plant(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Path(raw_id): Path<String>,
  params: Result<Query<FormatParams>, QueryRejection>,
) -> Result<Response, ApiFailure> {
  let Query(params) = params.map_err(|e| context.failure(query_rejection(e)))?;
  let format = parse_format(params.format.as_deref()).map_err(|e| context.failure(e))?;
  let id = raw_id
    .trim()
    .parse::<i64>()
    .map_err(|_| context.failure(ServiceError::InvalidRequest(format!("Invalid plant id '{raw_id}'"))))?;

  let snapshot = state.store.all();
  if let Some(reason) = &snapshot.load_error {
    return Err(context.failure(ServiceError::DatasetUnavailable(reason.clone())));
  }

  let Some(record) = snapshot.table.get(id) else {
    if format == OutputFormat::Document {
      context.log_warn(&format!("Plant {id} not found"), "plants-api");
      return Ok((StatusCode::NOT_FOUND, Html(document::render_plant_not_found(id))).into_response());
    }
    return Err(context.failure(ServiceError::PlantNotFound(id)));
  };

  Ok(match format {
    OutputFormat::Structured => {
      Json(BaseResponse::success(PlantsPayload::single(record), context.request_id)).into_response()
    }
    OutputFormat::Document => Html(document::render_plant(record)).into_response(),
  })
}
