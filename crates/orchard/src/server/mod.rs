//! REST API module for the plant catalog
//!
//! Axum routing, request context middleware, the JSON response envelope and
//! the endpoint handlers.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;

pub use routing::create_router;
pub use state::AppState;
