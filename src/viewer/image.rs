//! Displayable image handles and frame payload resolution.

use axum::body::Bytes;
use base64::Engine;
use serde::Deserialize;

use super::ViewerError;

/// Content type assumed for binary frames without one
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// An image ready to be shown
#[derive(Debug, Clone, PartialEq)]
pub enum ImageHandle {
    /// Decoded from an embedded base64 data URL
    Decoded { mime: String, bytes: Bytes },
    /// Raw binary body
    Blob { content_type: String, bytes: Bytes },
    /// Shown straight from a URL
    Remote { url: String },
}

impl ImageHandle {
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            ImageHandle::Decoded { bytes, .. } | ImageHandle::Blob { bytes, .. } => Some(bytes),
            ImageHandle::Remote { .. } => None,
        }
    }

    pub fn mime(&self) -> Option<&str> {
        match self {
            ImageHandle::Decoded { mime, .. } => Some(mime),
            ImageHandle::Blob { content_type, .. } => Some(content_type),
            ImageHandle::Remote { .. } => None,
        }
    }
}

/// A frame response body as received from the image relay
#[derive(Debug, Clone)]
pub struct FramePayload {
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Deserialize)]
struct EmbeddedImage {
    #[serde(default)]
    image: Option<String>,
}

impl FramePayload {
    /// Turn a payload into a handle.
    ///
    /// JSON bodies must carry an `image` data URL; a JSON body without one
    /// resolves to `None`. Everything else is taken as image bytes.
    pub fn resolve(self) -> Result<Option<ImageHandle>, ViewerError> {
        let is_json = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));

        if is_json {
            let embedded: EmbeddedImage = serde_json::from_slice(&self.body)?;
            return embedded.image.as_deref().map(decode_data_url).transpose();
        }

        Ok(Some(ImageHandle::Blob {
            content_type: self
                .content_type
                .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string()),
            bytes: self.body,
        }))
    }
}

/// Decode `image/jpeg;base64,...`, with or without a leading `data:`
pub fn decode_data_url(value: &str) -> Result<ImageHandle, ViewerError> {
    let value = value.strip_prefix("data:").unwrap_or(value);
    let (mime, payload) = value
        .split_once(";base64,")
        .ok_or_else(|| ViewerError::InvalidImage("missing base64 marker".to_string()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ViewerError::InvalidImage(e.to_string()))?;

    Ok(ImageHandle::Decoded {
        mime: mime.to_string(),
        bytes: Bytes::from(bytes),
    })
}
