//! Camera list loader
//!
//! Reads the static camera list from a local file or an HTTP URL and
//! normalizes it into [`Camera`] records. The list may be a JSON array or
//! an object keyed by camera id, read in document order.

use std::path::PathBuf;

use axum::body::Bytes;
use thiserror::Error;

use super::types::{Camera, RawCamera};

/// Where the camera list comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CameraSource {
    File(PathBuf),
    Url(String),
}

impl CameraSource {
    /// Interpret a config value: `http(s)://` means URL, anything else a path
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            CameraSource::Url(location.to_string())
        } else {
            CameraSource::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for CameraSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraSource::File(path) => write!(f, "{}", path.display()),
            CameraSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// A loaded camera list with the bytes it was parsed from
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub cameras: Vec<Camera>,
    /// Original document, served verbatim as `/webcams.json`
    pub raw: Bytes,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

/// Loads the camera list
pub struct CameraLoader {
    source: CameraSource,
    client: reqwest::Client,
}

impl CameraLoader {
    pub fn new(source: CameraSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Load and normalize the camera list
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        let raw = self.fetch_bytes().await?;
        let cameras = parse_camera_list(&raw)?;

        tracing::info!(source = %self.source, cameras = cameras.len(), "Loaded camera list");

        Ok(Catalog { cameras, raw })
    }

    /// Load the camera list, degrading to an empty catalog on any failure
    pub async fn load_or_empty(&self) -> Catalog {
        match self.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(source = %self.source, error = %e, "Failed to fetch cameras");
                Catalog::default()
            }
        }
    }

    async fn fetch_bytes(&self) -> Result<Bytes, CatalogError> {
        match &self.source {
            CameraSource::File(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| CatalogError::Io {
                    path: path.clone(),
                    error: e,
                })?;
                Ok(Bytes::from(data))
            }
            CameraSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(CatalogError::Status(response.status().as_u16()));
                }
                Ok(response.bytes().await?)
            }
        }
    }
}

/// Parse a camera list document (array or keyed object)
pub fn parse_camera_list(data: &[u8]) -> Result<Vec<Camera>, CatalogError> {
    let doc: serde_json::Value = serde_json::from_slice(data)?;

    let records = match doc {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => return Err(CatalogError::Shape),
    };

    let mut cameras = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<RawCamera>(record) {
            Ok(raw) => {
                let id = raw.file.clone();
                match raw.normalize() {
                    Some(camera) => cameras.push(camera),
                    None => tracing::warn!(camera_id = %id, "Skipping camera without coordinates"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "Skipping malformed camera record"),
        }
    }

    Ok(cameras)
}

/// Camera list errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path:?}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Network response was not ok: {0}")]
    Status(u16),

    #[error("Invalid camera list JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Camera list must be an array or an object")]
    Shape,
}
