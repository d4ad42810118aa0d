//! History Viewer
//!
//! Scrub and auto-play through a camera's historical snapshots.
//!
//! - [`HistoryViewer`]: the per-camera state machine
//! - [`FrameSource`]: where history lists and frame bodies come from
//! - [`ImageCache`]: resolved frames keyed by request URL
//! - [`Playback`]: the auto-play timer

pub mod cache;
pub mod frames;
pub mod image;
pub mod playback;
pub mod session;
pub mod source;

pub use cache::ImageCache;
pub use frames::{frame_label, parse_history, HistoryFrame, CURRENT_LABEL};
pub use image::{decode_data_url, FramePayload, ImageHandle};
pub use playback::Playback;
pub use session::HistoryViewer;
pub use source::{FrameSource, RelayFrameSource};

use serde::Serialize;
use thiserror::Error;

/// Where the viewer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerPhase {
    /// No camera open
    Closed,
    LoadingHistory,
    /// History is empty; the direct image is shown instead
    NoHistory,
    HasFrames,
    LoadingFrame,
    Ready,
}

/// Observable viewer state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerSnapshot {
    pub camera_id: Option<String>,
    pub phase: ViewerPhase,
    pub index: usize,
    pub frame_count: usize,
    pub playing: bool,
    /// Time label of the current frame
    pub label: String,
    pub has_image: bool,
}

/// Errors raised while fetching or resolving frames
///
/// The viewer logs these and degrades; they never escape [`HistoryViewer`].
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay returned status {0}")]
    Status(u16),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid embedded image: {0}")]
    InvalidImage(String),
}
