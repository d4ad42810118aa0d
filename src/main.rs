//! Kamery relay server
//!
//! Run with: cargo run --bin kamery
//!
//! # Configuration
//!
//! Read from `--config PATH`, otherwise from the default locations
//! (see [`kamery::config`]). Environment variables override the file:
//! - `KAMERY_HOST`: Host to bind to (default: 0.0.0.0)
//! - `KAMERY_PORT`: Port to listen on (default: 8888)
//! - `KAMERY_UPSTREAM_URL`: Camera data provider base URL
//! - `KAMERY_CAMERAS_PATH`: Camera list file or URL (default: public/webcams.json)
//! - `KAMERY_LOG_LEVEL` / `KAMERY_LOG_FORMAT`: Logging (`RUST_LOG` wins when set)

use std::path::PathBuf;

use clap::Parser;
use kamery::catalog::{CameraLoader, CameraSource};
use kamery::config::Config;
use kamery::relay::{serve, RelayState};

#[derive(Parser)]
#[command(name = "kamery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CORS relay and camera list server for CHMI weather cameras")]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    config.logging.init();

    tracing::info!("Starting Kamery relay v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Upstream: {}", config.upstream.base_url);

    let loader = CameraLoader::new(CameraSource::from_location(&config.catalog.location));
    let catalog = loader.load_or_empty().await;
    if catalog.is_empty() {
        tracing::warn!("Serving an empty camera list");
    }

    let server = config.server.clone();
    let state = RelayState::new(config, catalog)?;

    serve(state, &server).await?;

    Ok(())
}
