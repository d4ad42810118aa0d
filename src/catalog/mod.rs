//! Camera Catalog
//!
//! The static camera list, the region table and the URL conventions used
//! to reach camera imagery.

pub mod loader;
pub mod regions;
pub mod types;
pub mod urls;

pub use loader::{parse_camera_list, CameraLoader, CameraSource, Catalog, CatalogError};
pub use regions::{region_name, REGIONS};
pub use types::{Camera, GeoPoint, RawCamera};
pub use urls::{historical_image_path, history_path, image_url, thumbnail_url, DIRECT_IMAGE_BASE};
