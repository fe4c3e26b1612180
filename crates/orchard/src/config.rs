//! Server configuration from command-line flags and `ORCHARD_*` variables

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::search::Strategy;
use crate::snapshots::DEFAULT_MAX_SNAPSHOTS;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MAX_LIMIT: usize = 100;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Server flags, flattened into the server binary's parser
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
  /// Server bind address
  #[arg(long, env = "ORCHARD_BIND", default_value = "127.0.0.1:8000")]
  pub bind: SocketAddr,

  /// Directory holding dataset snapshots
  #[arg(long, env = "ORCHARD_DATA_DIR", default_value = "data")]
  pub data_dir: PathBuf,

  /// HTML entry document of the UI
  #[arg(long, env = "ORCHARD_UI_PATH", default_value = "index.html")]
  pub ui_path: PathBuf,

  /// LanceDB directory of the embedding index
  #[arg(long, env = "ORCHARD_INDEX_DIR", default_value = "orchard_db")]
  pub index_dir: PathBuf,

  /// Table holding plant embeddings
  #[arg(long, env = "ORCHARD_INDEX_TABLE", default_value = "plants")]
  pub index_table: String,

  /// Where the embedding model is cached
  #[arg(long, env = "ORCHARD_MODEL_CACHE")]
  pub model_cache: Option<PathBuf>,

  /// Strategy used when a search names none (substring, nearest-neighbor)
  #[arg(long, env = "ORCHARD_DEFAULT_STRATEGY", default_value = "substring")]
  pub default_strategy: Strategy,

  /// Nearest-neighbor result count when a search names no limit
  #[arg(long, env = "ORCHARD_DEFAULT_LIMIT", default_value_t = DEFAULT_LIMIT)]
  pub default_limit: usize,

  /// Largest accepted `limit`
  #[arg(long, env = "ORCHARD_MAX_LIMIT", default_value_t = DEFAULT_MAX_LIMIT)]
  pub max_limit: usize,

  /// Dataset snapshots kept on disk
  #[arg(long, env = "ORCHARD_MAX_SNAPSHOTS", default_value_t = DEFAULT_MAX_SNAPSHOTS)]
  pub max_snapshots: usize,

  /// Largest accepted dataset upload in bytes
  #[arg(long, env = "ORCHARD_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
  pub max_upload_bytes: usize,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind: SocketAddr,
  pub data_dir: PathBuf,
  pub ui_path: PathBuf,
  pub index_dir: PathBuf,
  pub index_table: String,
  pub model_cache: PathBuf,
  pub default_strategy: Strategy,
  pub default_limit: usize,
  pub max_limit: usize,
  pub max_snapshots: usize,
  pub max_upload_bytes: usize,
}

impl ServerConfig {
  /// Defaults rooted at `data_dir`, used by tests and embedding callers
  pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
    let data_dir = data_dir.into();
    Self {
      bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
      ui_path: data_dir.join("index.html"),
      index_dir: data_dir.join("orchard_db"),
      data_dir,
      index_table: "plants".to_string(),
      model_cache: default_model_cache(),
      default_strategy: Strategy::Substring,
      default_limit: DEFAULT_LIMIT,
      max_limit: DEFAULT_MAX_LIMIT,
      max_snapshots: DEFAULT_MAX_SNAPSHOTS,
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

impl From<ServerArgs> for ServerConfig {
  fn from(args: ServerArgs) -> Self {
    Self {
      bind: args.bind,
      data_dir: args.data_dir,
      ui_path: args.ui_path,
      index_dir: args.index_dir,
      index_table: args.index_table,
      model_cache: args.model_cache.unwrap_or_else(default_model_cache),
      default_strategy: args.default_strategy,
      default_limit: args.default_limit.max(1),
      max_limit: args.max_limit.max(1),
      max_snapshots: args.max_snapshots.max(1),
      max_upload_bytes: args.max_upload_bytes,
    }
  }
}

/// Model cache under the user cache directory, falling back to /tmp
pub fn default_model_cache() -> PathBuf {
  dirs::cache_dir()
    .unwrap_or_else(|| std::path::Path::new("/tmp").to_path_buf())
    .join("orchard")
    .join("models")
}
