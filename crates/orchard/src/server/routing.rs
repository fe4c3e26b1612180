//! Axum router configuration for all endpoints

use axum::{
  extract::DefaultBodyLimit,
  middleware,
  routing::{get, post},
  Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::handlers::{datasets, plants, root, status};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Create the application router over shared state
pub fn create_router(state: AppState) -> Router {
  let upload_limit = state.config.max_upload_bytes;

  Router::new()
    // Pages
    .route("/", get(root::welcome))
    .route("/home", get(root::home))
    // Plants endpoints
    .route("/plants", get(plants::search_plants))
    .route("/plants/{id}", get(plants::get_plant))
    // Dataset snapshots
    .route("/datasets", post(datasets::upload_dataset).layer(DefaultBodyLimit::max(upload_limit)))
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .layer(middleware::from_fn(request_context_middleware))
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
    .with_state(state)
}
