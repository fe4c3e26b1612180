//! REST server startup and configuration

use anyhow::{anyhow, Result};
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::catalog::RecordStore;
use crate::config::ServerConfig;
use crate::search::EmbeddingIndex;
use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Construct every shared component once. Index problems are logged and the
/// service starts without nearest-neighbor search.
pub async fn build_state(config: ServerConfig) -> Result<AppState> {
  let data_dir = config.data_dir.clone();
  let store = Arc::new(tokio::task::spawn_blocking(move || RecordStore::open(data_dir)).await?);

  let index = open_index(&config).await;
  Ok(AppState::new(config, store, index))
}

#[cfg(feature = "ml-features")]
async fn open_index(config: &ServerConfig) -> Option<Arc<dyn EmbeddingIndex>> {
  use crate::search::embedder::{Embedder, FastEmbedder};
  use crate::search::lancedb::LanceDbIndex;

  if !config.index_dir.exists() {
    tracing::warn!(
      "Embedding index {} not found; nearest-neighbor search is disabled (run orchard_ingest to build it)",
      config.index_dir.display()
    );
    return None;
  }

  let cache_dir = config.model_cache.clone();
  let embedder = match tokio::task::spawn_blocking(move || FastEmbedder::load(cache_dir)).await {
    Ok(Ok(embedder)) => Arc::new(embedder) as Arc<dyn Embedder>,
    Ok(Err(e)) => {
      tracing::error!("Failed to load embedding model; nearest-neighbor search is disabled: {e:#}");
      return None;
    }
    Err(e) => {
      tracing::error!("Embedding model loader panicked: {e}");
      return None;
    }
  };

  match LanceDbIndex::open(config.index_dir.clone(), &config.index_table, embedder).await {
    Ok(index) => {
      match index.count().await {
        Ok(count) => tracing::info!("Embedding index ready with {count} plants"),
        Err(e) => tracing::warn!("Embedding index opened but could not be counted: {e:#}"),
      }
      Some(Arc::new(index) as Arc<dyn EmbeddingIndex>)
    }
    Err(e) => {
      tracing::error!("Failed to open embedding index: {e:#}");
      None
    }
  }
}

#[cfg(not(feature = "ml-features"))]
async fn open_index(_config: &ServerConfig) -> Option<Arc<dyn EmbeddingIndex>> {
  tracing::info!("Built without ml-features; nearest-neighbor search is disabled");
  None
}

/// Start the REST server
pub async fn start_server(config: ServerConfig) -> Result<()> {
  let addr = config.bind;
  tracing::info!("Starting orchard REST server on {addr}");

  let state = build_state(config).await?;
  let app = create_router(state);

  let listener = TcpListener::bind(addr).await?;
  tracing::info!("Server listening on {addr}");

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      tracing::info!("Server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      tracing::error!("Server error: {e}");
      Err(anyhow!("Server error: {}", e))
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {e}");
  }
}
