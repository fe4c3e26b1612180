//! Text embedding for index queries and ingestion

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Arc;

/// Model used for both documents and queries (all-MiniLM-L6-v2, 384 dims)
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const EMBEDDING_DIM: usize = 384;

/// Turns texts into embedding vectors
#[async_trait]
pub trait Embedder: Send + Sync {
  async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

/// fastembed-backed local ONNX embedder
pub struct FastEmbedder {
  model: Arc<TextEmbedding>,
}

impl FastEmbedder {
  /// Load the model, downloading it into `cache_dir` on first use.
  /// Blocking: call from `spawn_blocking` inside async code.
  pub fn load(cache_dir: PathBuf) -> Result<Self> {
    tracing::info!("Loading embedding model {MODEL_NAME} (cache: {})", cache_dir.display());

    let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
      .with_cache_dir(cache_dir)
      .with_show_download_progress(false);
    let model = TextEmbedding::try_new(options).context("Failed to load embedding model")?;

    Ok(Self { model: Arc::new(model) })
  }
}

#[async_trait]
impl Embedder for FastEmbedder {
  async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
    let model = self.model.clone();
    tokio::task::spawn_blocking(move || model.embed(texts, None))
      .await
      .map_err(|e| anyhow!("Embedding task failed: {e}"))?
  }
}
