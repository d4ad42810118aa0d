//! # Kamery
//!
//! Weather-camera viewer for the Czech hydrometeorological camera network.
//!
//! ## Features
//!
//! - **CORS relay**: history and image passthrough in front of the data provider
//! - **Camera catalog**: tolerant loader for the static camera list
//! - **Nearest first**: haversine ranking from the user's location
//! - **History viewer**: scrubbing, prefetch and auto-play over past snapshots
//!
//! ## Modules
//!
//! - [`catalog`]: Camera list, region table and image URL conventions
//! - [`browse`]: Search filter and nearest-camera ranking
//! - [`map`]: Map focus and markers
//! - [`viewer`]: History viewer state machine and frame cache
//! - [`app`]: Coordinator owning selection and view state
//! - [`relay`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kamery::catalog::{CameraLoader, CameraSource, DIRECT_IMAGE_BASE};
//! use kamery::config::ViewerConfig;
//! use kamery::viewer::{HistoryViewer, RelayFrameSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = CameraLoader::new(CameraSource::from_location("public/webcams.json"));
//!     let catalog = loader.load().await?;
//!
//!     let source = Arc::new(RelayFrameSource::new("http://localhost:8888"));
//!     let viewer = HistoryViewer::new(source, ViewerConfig::default(), DIRECT_IMAGE_BASE);
//!
//!     if let Some(camera) = catalog.cameras.first() {
//!         viewer.open(camera.clone()).await;
//!         viewer.settle().await;
//!         println!("{:?}", viewer.snapshot());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod map;
pub mod relay;
pub mod viewer;

// Re-export top-level types for convenience
pub use app::{App, ViewMode};

pub use browse::{list_cameras, ListEntry, ListMode, ListQuery, NEAREST_LIMIT};

pub use catalog::{Camera, CameraLoader, CameraSource, Catalog, CatalogError, GeoPoint};

pub use config::{Config, ConfigError, LoggingConfig};

pub use map::{MapView, Marker};

pub use relay::{build_router, serve, RelayError, RelayState};

pub use viewer::{
    FrameSource, HistoryFrame, HistoryViewer, ImageHandle, RelayFrameSource, ViewerError,
    ViewerPhase, ViewerSnapshot,
};
