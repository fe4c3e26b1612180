//! Request context and middleware for the plant catalog API
//!
//! Every request gets a context carrying a unique id and request metadata,
//! injected by middleware so handlers log with correlation.

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::server::error::ApiFailure;

/// Request context containing request metadata
#[derive(Clone, Debug)]
pub struct RequestContext {
  /// Unique ID for this request, reused as the response transaction id
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub user_agent: String,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, user_agent: String) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, user_agent }
  }

  pub fn log_info(&self, message: &str, component: &str) {
    tracing::info!(request_id = %self.request_id, component, "{} {} - {}", self.method, self.uri.path(), message);
  }

  pub fn log_warn(&self, message: &str, component: &str) {
    tracing::warn!(request_id = %self.request_id, component, "{} {} - {}", self.method, self.uri.path(), message);
  }

  pub fn log_error(&self, message: &str, component: &str) {
    tracing::error!(request_id = %self.request_id, component, "{} {} - {}", self.method, self.uri.path(), message);
  }

  /// Log a failed request and wrap the error for the response
  pub fn failure(&self, error: ServiceError) -> ApiFailure {
    let message = format!("{error:#}");
    if error.status_code().is_server_error() {
      self.log_error(&message, "plants-api");
    } else {
      self.log_warn(&message, "plants-api");
    }
    ApiFailure::new(error, self.request_id)
  }

  fn log_request_start(&self) {
    tracing::debug!(
      request_id = %self.request_id,
      user_agent = %self.user_agent,
      "{} {} - Request started",
      self.method,
      self.uri.path()
    );
  }

  fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    tracing::info!(
      request_id = %self.request_id,
      status = status_code,
      duration_ms,
      "{} {} - Request completed",
      self.method,
      self.uri.path()
    );
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let user_agent = request
    .headers()
    .get("user-agent")
    .and_then(|value| value.to_str().ok())
    .unwrap_or("none")
    .to_string();

  let context = RequestContext::new(request.method().clone(), request.uri().clone(), user_agent);

  let start_time = Instant::now();
  context.log_request_start();

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
