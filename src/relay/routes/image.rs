//! Image Relay
//!
//! - GET /api/image/{cameraId}/{encodedTimestamp} - One historical frame
//!
//! The provider answers either with image bytes or with JSON carrying an
//! embedded base64 image; both pass through untouched.

use axum::{
    extract::{OriginalUri, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::state::RelayState;
use crate::relay::upstream::ACCEPT_IMAGE;

pub const PREFIX: &str = "/api/image/";

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// GET /api/image/{cameraId}/{encodedTimestamp}
pub async fn relay_image(
    State(state): State<Arc<RelayState>>,
    OriginalUri(uri): OriginalUri,
) -> RelayResult<Response> {
    let image_path = uri.path().strip_prefix(PREFIX).unwrap_or_default();
    if image_path.is_empty() {
        return Err(RelayError::InvalidRequest);
    }

    let url = state.upstream.image_url(image_path);
    let upstream = state.upstream.fetch(&url, ACCEPT_IMAGE).await?;

    let content_type = upstream
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    tracing::debug!(
        path = %image_path,
        content_type = %content_type,
        bytes = upstream.body.len(),
        "Relayed image"
    );

    let max_age = state.upstream.config().image_max_age_secs;
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::CACHE_CONTROL, format!("public, max-age={}", max_age)),
        ],
        upstream.body,
    )
        .into_response())
}
