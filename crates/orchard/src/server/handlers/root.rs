//! Static pages

use axum::{
  extract::{Request, State},
  response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::render::document;
use crate::server::state::AppState;

/// GET / - Welcome page
pub async fn welcome() -> Html<String> {
  Html(document::render_welcome())
}

/// GET /home - The UI's entry document
pub async fn home(State(state): State<AppState>, request: Request) -> Response {
  match ServeFile::new(&state.config.ui_path).oneshot(request).await {
    Ok(response) => response.into_response(),
    Err(never) => match never {},
  }
}
