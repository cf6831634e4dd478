//! `mimapa` — interactive shell for the MiMapa marker service.
//!
//! # Usage
//!
//! ```
//! mimapa --url http://localhost:8080 --email alice@example.com --token t0k3n
//! mimapa --config ~/.config/mimapa/config.toml
//! ```

mod app;
mod identity;

use std::io::Write as _;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use identity::ShellIdentity;
use mimapa_client::{ApiClient, ApiConfig, NominatimGeocoder};
use mimapa_core::identity::Session;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mimapa", about = "Interactive shell for the MiMapa marker service")]
struct Args {
  /// Path to a TOML config file (url, email, token, geocoder_url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the marker backend (default: http://localhost:8080).
  #[arg(long, env = "MIMAPA_URL")]
  url: Option<String>,

  /// Identity to start signed in as.
  #[arg(long, env = "MIMAPA_EMAIL")]
  email: Option<String>,

  /// Credential token recorded on visits.
  #[arg(long, env = "MIMAPA_TOKEN")]
  token: Option<String>,

  /// Override the geocoding endpoint (default: public Nominatim).
  #[arg(long, env = "MIMAPA_GEOCODER_URL")]
  geocoder_url: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  email:        String,
  #[serde(default)]
  token:        String,
  #[serde(default)]
  geocoder_url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Log to stderr so workflow warnings never garble the prompt.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let email = args
    .email
    .or_else(|| (!file_cfg.email.is_empty()).then(|| file_cfg.email.clone()));
  let token = args
    .token
    .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()));
  let geocoder_url = args
    .geocoder_url
    .or_else(|| (!file_cfg.geocoder_url.is_empty()).then(|| file_cfg.geocoder_url.clone()));

  let client = ApiClient::new(ApiConfig { base_url }).context("building backend client")?;
  let geocoder = match geocoder_url {
    Some(url) => NominatimGeocoder::with_endpoint(url),
    None => NominatimGeocoder::new(),
  }
  .context("building geocoder")?;

  let initial = match (email, token) {
    (Some(email), Some(token)) => Some(Session { email, token }),
    _ => None,
  };
  let identity = ShellIdentity::new(initial.clone());

  match &initial {
    Some(session) => println!("signed in as {} — type `help` for commands", session.email),
    None => println!("signed out — `login <email> <token>` to begin, `help` for commands"),
  }

  let mut app = App::new(client, geocoder, identity);

  // The shell proper: one command per line until EOF or `quit`.
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  loop {
    print!("mimapa> ");
    std::io::stdout().flush().ok();

    let Some(line) = lines.next_line().await.context("reading input")? else {
      break;
    };
    if !app.handle_line(&line).await? {
      break;
    }
  }

  Ok(())
}
