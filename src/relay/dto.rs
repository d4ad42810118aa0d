//! Data Transfer Objects
//!
//! Request and response types for the camera endpoints.

use serde::{Deserialize, Serialize};

use crate::browse::ListEntry;
use crate::catalog::Camera;

// ============================================
// CAMERA DTOs
// ============================================

/// Query parameters for `GET /api/cameras`
#[derive(Debug, Default, Deserialize)]
pub struct CameraListParams {
    /// Case-insensitive search on name or region
    #[serde(default)]
    pub search: Option<String>,
    /// User location as "lat,lon"; switches to the nearest view
    #[serde(default)]
    pub near: Option<String>,
    /// Nearest-view cap, defaults to the configured limit
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Camera list response
#[derive(Debug, Serialize, Deserialize)]
pub struct CameraListResponse {
    pub total: usize,
    pub cameras: Vec<CameraListItem>,
}

/// Camera list row as seen by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraListItem {
    #[serde(flatten)]
    pub camera: Camera,
    pub region_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<ListEntry> for CameraListItem {
    fn from(entry: ListEntry) -> Self {
        Self {
            region_name: entry.camera.region_name().to_string(),
            camera: entry.camera,
            distance_km: entry.distance_km,
        }
    }
}

/// Single camera with its image URLs
#[derive(Debug, Serialize, Deserialize)]
pub struct CameraDetailResponse {
    #[serde(flatten)]
    pub camera: Camera,
    pub region_name: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub history_url: String,
}

/// Region table row
#[derive(Debug, Serialize, Deserialize)]
pub struct RegionResponse {
    pub code: String,
    pub name: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub cameras: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
