//! Kamery CLI
//!
//! Command-line client for a running Kamery relay:
//! - List cameras, optionally nearest first
//! - Show one camera and its history
//! - Scrub and auto-play through a camera's history
//! - Generate a config file

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use kamery::catalog::GeoPoint;
use kamery::config::Config;
use kamery::relay::dto::{CameraDetailResponse, CameraListResponse, RegionResponse};
use kamery::viewer::{FrameSource, HistoryViewer, RelayFrameSource, ViewerPhase};
use serde::de::DeserializeOwned;

/// Give up on playback when no frame arrives for this long
const PLAY_STALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "kamery-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse CHMI weather cameras and their history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Relay server URL
    #[arg(long, default_value = "http://localhost:8888", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List cameras
    Cameras {
        /// Filter by camera or region name
        #[arg(short, long)]
        search: Option<String>,
        /// Your location as "lat,lon"; lists nearest cameras first
        #[arg(short, long)]
        near: Option<String>,
        /// How many nearest cameras to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one camera
    Camera {
        /// Camera id
        id: String,
    },

    /// List a camera's historical frames
    History {
        /// Camera id
        id: String,
    },

    /// Auto-play a camera's history
    Play {
        /// Camera id
        id: String,
        /// Stop after this many frames
        #[arg(short = 'n', long, default_value = "10")]
        frames: usize,
        /// Frame interval in milliseconds (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// List region codes
    Regions,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let json = cli.format == "json";

    match cli.command {
        Commands::Cameras {
            search,
            near,
            limit,
        } => {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(search) = search {
                params.push(("search", search));
            }
            if let Some(near) = near {
                if GeoPoint::parse(&near).is_none() {
                    bail!("Invalid location {:?}, expected \"lat,lon\"", near);
                }
                params.push(("near", near));
            }
            if let Some(limit) = limit {
                params.push(("limit", limit.to_string()));
            }

            let url = format!("{}/api/cameras", cli.api_url);
            let response = client
                .get(&url)
                .query(&params)
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;
            let list: CameraListResponse = read_json(response).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.cameras.is_empty() {
                println!("No cameras found.");
            } else {
                println!(
                    "{:<16} {:<28} {:<20} {:>8}",
                    "ID", "Name", "Region", "Distance"
                );
                println!("{}", "-".repeat(75));

                for item in &list.cameras {
                    let distance = item
                        .distance_km
                        .map(|d| format!("{:.1} km", d))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<16} {:<28} {:<20} {:>8}",
                        item.camera.id, item.camera.name, item.region_name, distance
                    );
                }
                println!();
                println!("{} of {} cameras", list.cameras.len(), list.total);
            }
        }

        Commands::Camera { id } => {
            let camera = fetch_camera(&client, &cli.api_url, &id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&camera)?);
            } else {
                println!("{} ({})", camera.camera.name, camera.camera.id);
                println!();
                println!("  Region:    {}", camera.region_name);
                println!(
                    "  Position:  {:.4}, {:.4}",
                    camera.camera.lat, camera.camera.lon
                );
                if let Some(altitude) = camera.camera.altitude {
                    println!("  Altitude:  {} m", altitude);
                }
                println!("  Image:     {}", camera.image_url);
                println!("  Thumbnail: {}", camera.thumbnail_url);
            }
        }

        Commands::History { id } => {
            let source = RelayFrameSource::new(cli.api_url.clone());
            let frames = source
                .history(&id)
                .await
                .with_context(|| format!("Failed to fetch history for {}", id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&frames)?);
            } else if frames.is_empty() {
                println!("No history for {}; only the current image is available.", id);
            } else {
                println!("{:<6} {:<14} {}", "#", "Time", "Frame");
                println!("{}", "-".repeat(60));
                for (i, frame) in frames.iter().enumerate() {
                    println!("{:<6} {:<14} {}", i, frame.label(), source.frame_url(&id, frame));
                }
            }
        }

        Commands::Play {
            id,
            frames,
            interval,
        } => {
            let detail = fetch_camera(&client, &cli.api_url, &id).await?;
            let config = Config::load_default();
            let mut viewer_config = config.viewer;
            if let Some(interval) = interval {
                viewer_config.play_interval_ms = interval;
            }
            let viewer = HistoryViewer::new(
                Arc::new(RelayFrameSource::new(cli.api_url.clone())),
                viewer_config,
                config.catalog.image_base_url,
            );

            viewer.open(detail.camera).await;
            viewer.settle().await;

            let snapshot = viewer.snapshot();
            if snapshot.frame_count <= 1 {
                println!(
                    "{} has {} frame(s); nothing to play.",
                    id, snapshot.frame_count
                );
                viewer.close();
                return Ok(());
            }

            let mut updates = viewer.subscribe();
            let mut last_index = snapshot.index;
            let mut shown = 0;

            viewer.play();
            while shown < frames {
                match tokio::time::timeout(PLAY_STALL_TIMEOUT, updates.changed()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) => break,
                    Err(_) => bail!("Playback stalled"),
                }

                let snapshot = updates.borrow_and_update().clone();
                if snapshot.phase != ViewerPhase::Ready || snapshot.index == last_index {
                    continue;
                }
                last_index = snapshot.index;
                shown += 1;

                if json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    println!(
                        "[{:>3}/{}] {}{}",
                        snapshot.index + 1,
                        snapshot.frame_count,
                        snapshot.label,
                        if snapshot.has_image { "" } else { " (no image)" }
                    );
                }
            }

            viewer.close();
        }

        Commands::Regions => {
            let response = client
                .get(format!("{}/api/regions", cli.api_url))
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;
            let regions: Vec<RegionResponse> = read_json(response).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&regions)?);
            } else {
                for region in regions {
                    println!("{:<4} {}", region.code, region.name);
                }
            }
        }

        Commands::Config { output } => {
            let config = kamery::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn fetch_camera(
    client: &reqwest::Client,
    api_url: &str,
    id: &str,
) -> anyhow::Result<CameraDetailResponse> {
    let response = client
        .get(format!("{}/api/cameras/{}", api_url, urlencoding::encode(id)))
        .send()
        .await
        .with_context(|| connect_hint(api_url))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        bail!("Unknown camera: {}", id);
    }
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("Request failed ({}): {}", status, text);
    }
    Ok(response.json().await?)
}

fn connect_hint(api_url: &str) -> String {
    format!(
        "Cannot connect to Kamery relay at {} (start it with: cargo run --bin kamery)",
        api_url
    )
}
