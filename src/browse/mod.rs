//! Camera List View
//!
//! Search filtering and the "nearest" view.
//!
//! In nearest mode with a known location the list is ranked by
//! great-circle distance. Without a search term the ranking is capped to
//! the closest [`NEAREST_LIMIT`] cameras; with a search term the whole
//! filtered set is returned, still ranked.

pub mod filter;
pub mod nearest;

pub use filter::matches_search;
pub use nearest::{haversine_km, rank_by_distance};

use serde::{Deserialize, Serialize};

use crate::catalog::{Camera, GeoPoint};

/// Default cap for the nearest view
pub const NEAREST_LIMIT: usize = 20;

/// Which list is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    All,
    Nearest,
}

/// List view inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub mode: ListMode,
    /// User location, when geolocation is available
    pub location: Option<GeoPoint>,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            mode: ListMode::All,
            location: None,
            limit: NEAREST_LIMIT,
        }
    }
}

impl ListQuery {
    /// Builder method: set search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Builder method: switch to the nearest view around `location`
    pub fn nearest(mut self, location: GeoPoint) -> Self {
        self.mode = ListMode::Nearest;
        self.location = Some(location);
        self
    }

    /// Builder method: set the nearest-view cap
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

/// One row of the list
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    #[serde(flatten)]
    pub camera: Camera,
    /// Distance from the user in km, when a location is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Apply the list view to a camera set
pub fn list_cameras(cameras: &[Camera], query: &ListQuery) -> Vec<ListEntry> {
    let filtered = cameras.iter().filter(|c| matches_search(c, &query.search));

    match (query.mode, query.location) {
        (ListMode::Nearest, Some(origin)) => {
            let mut ranked = rank_by_distance(filtered, origin);
            if !query.has_search() {
                ranked.truncate(query.limit);
            }
            ranked
                .into_iter()
                .map(|(camera, d)| ListEntry {
                    camera: camera.clone(),
                    distance_km: Some(d),
                })
                .collect()
        }
        (_, location) => filtered
            .map(|camera| ListEntry {
                camera: camera.clone(),
                distance_km: location.map(|o| haversine_km(o, camera.position())),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<Camera> {
        (0..n)
            .map(|i| {
                Camera::new(format!("cam{}", i), format!("Kamera {}", i), 49.0 + i as f64 * 0.05, 15.0)
                    .region("S")
            })
            .collect()
    }

    #[test]
    fn test_all_mode_keeps_order() {
        let cams = grid(30);
        let out = list_cameras(&cams, &ListQuery::default());
        assert_eq!(out.len(), 30);
        assert_eq!(out[0].camera.id, "cam0");
        assert!(out[0].distance_km.is_none());
    }

    #[test]
    fn test_nearest_without_search_is_capped() {
        let cams = grid(30);
        let query = ListQuery::default().nearest(GeoPoint::new(50.5, 15.0));
        let out = list_cameras(&cams, &query);

        assert_eq!(out.len(), NEAREST_LIMIT);
        // highest latitude is closest to 50.5
        assert_eq!(out[0].camera.id, "cam29");
        assert!(out.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_nearest_with_search_is_not_capped() {
        let cams = grid(30);
        let query = ListQuery::default()
            .nearest(GeoPoint::new(50.5, 15.0))
            .search("kamera");
        let out = list_cameras(&cams, &query);

        assert_eq!(out.len(), 30);
        assert_eq!(out[0].camera.id, "cam29");
    }

    #[test]
    fn test_nearest_without_location_falls_back() {
        let cams = grid(30);
        let query = ListQuery {
            mode: ListMode::Nearest,
            ..Default::default()
        };
        assert_eq!(list_cameras(&cams, &query).len(), 30);
    }

    #[test]
    fn test_search_filters() {
        let mut cams = grid(3);
        cams.push(Camera::new("lysa", "Lysá hora", 49.54, 18.45).region("T"));

        let out = list_cameras(&cams, &ListQuery::default().search("lysá"));
        assert_eq!(out.len(), 1);

        let out = list_cameras(&cams, &ListQuery::default().search("středočeský"));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_custom_limit() {
        let cams = grid(30);
        let query = ListQuery::default().nearest(GeoPoint::new(49.0, 15.0)).limit(5);
        assert_eq!(list_cameras(&cams, &query).len(), 5);
    }
}
