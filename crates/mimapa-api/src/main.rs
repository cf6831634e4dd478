//! mimapa-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layered under
//! `MIMAPA_*` environment variables, opens an in-memory store, and serves
//! the JSON API over HTTP.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use mimapa_api::{AppState, MediaBucket};
use mimapa_store_memory::MemoryStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "MiMapa marker backend server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// `MIMAPA_*` environment.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host: String,
  #[serde(default = "default_port")]
  port: u16,
  /// Externally-reachable base URL minted into media URLs. Defaults to
  /// `http://<host>:<port>`.
  #[serde(default)]
  public_url: String,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MIMAPA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let public_url = if server_cfg.public_url.is_empty() {
    format!("http://{address}")
  } else {
    server_cfg.public_url.clone()
  };

  // Build application state around a fresh in-memory store.
  let state = AppState {
    store: Arc::new(MemoryStore::new()),
    media: MediaBucket::new(),
    public_url,
  };

  let app = axum::Router::new()
    .nest("/api", mimapa_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
