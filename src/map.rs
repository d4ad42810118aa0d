//! Map View
//!
//! Camera markers and map focus. Tiles and marker clustering are left to
//! the rendering front end; this module only decides what to show where.

use serde::Serialize;

use crate::catalog::{thumbnail_url, Camera, GeoPoint};

/// Centre of Czechia
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 49.75,
    lon: 15.3,
};
/// Whole country visible
pub const DEFAULT_ZOOM: u8 = 8;
/// Flying to a camera never zooms past this
pub const MAX_FLY_ZOOM: u8 = 14;

const MARKER_SIZE: u32 = 50;
const SELECTED_MARKER_SIZE: u32 = 80;

/// Visible map area
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    /// Centre on a camera, zooming in two levels (capped)
    pub fn fly_to(&mut self, camera: &Camera) {
        self.center = camera.position();
        self.zoom = (self.zoom + 2).min(MAX_FLY_ZOOM);
    }
}

/// A camera marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub camera_id: String,
    pub position: GeoPoint,
    pub thumbnail_url: String,
    /// Icon diameter in pixels
    pub size: u32,
    pub selected: bool,
}

impl Marker {
    pub fn for_camera(camera: &Camera, selected: bool, image_base: &str) -> Self {
        Self {
            camera_id: camera.id.clone(),
            position: camera.position(),
            thumbnail_url: thumbnail_url(image_base, &camera.id),
            size: if selected {
                SELECTED_MARKER_SIZE
            } else {
                MARKER_SIZE
            },
            selected,
        }
    }
}

/// Markers for every camera, highlighting the selected one
pub fn markers(cameras: &[Camera], selected_id: Option<&str>, image_base: &str) -> Vec<Marker> {
    cameras
        .iter()
        .map(|c| Marker::for_camera(c, selected_id == Some(c.id.as_str()), image_base))
        .collect()
}
