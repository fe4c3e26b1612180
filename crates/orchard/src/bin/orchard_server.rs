//! Orchard REST Server
//!
//! HTTP server for the plant catalog: HTML fragments for the UI, JSON for API
//! consumers, and dataset snapshot uploads.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use orchard::config::{ServerArgs, ServerConfig};
use orchard::server::startup::start_server;

#[derive(Parser)]
#[command(name = "orchard_server")]
#[command(about = "Orchards of Flavour plant catalog server")]
#[command(version)]
struct Args {
  #[command(flatten)]
  server: ServerArgs,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,lance=warn,lancedb=warn,datafusion=warn,ort=warn,hyper=info")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      EnvFilter::new("orchard=info,tower_http=info,lance=error,lancedb=error,datafusion=error,ort=error,warn")
    })
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Orchard server v{}", env!("CARGO_PKG_VERSION"));
  start_server(ServerConfig::from(args.server)).await
}
