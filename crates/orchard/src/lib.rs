//! Orchard - Plant Catalog Service
//!
//! Serves a plant catalog loaded from a CSV dataset over HTTP, either as HTML
//! fragments for the browser UI or as JSON for API consumers. Queries resolve
//! through case-insensitive substring matching or, when an embedding index is
//! available, nearest-neighbor lookup against precomputed plant embeddings.

pub mod catalog;
pub mod config;
pub mod error;
#[cfg(feature = "ml-features")]
pub mod ingest;
pub mod render;
pub mod search;
pub mod server;
pub mod snapshots;

pub use error::ServiceError;
