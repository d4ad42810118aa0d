//! History Relay
//!
//! - GET /api/history/{cameraId} - Historical frame list for a camera
//!
//! Forwards to the provider's playable-images endpoint and returns the JSON
//! body unchanged.

use axum::{
    extract::{OriginalUri, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::relay::error::{RelayError, RelayResult};
use crate::relay::state::RelayState;
use crate::relay::upstream::ACCEPT_JSON;

pub const PREFIX: &str = "/api/history/";

/// GET /api/history/{cameraId}
pub async fn relay_history(
    State(state): State<Arc<RelayState>>,
    OriginalUri(uri): OriginalUri,
) -> RelayResult<Response> {
    let camera_id = uri.path().strip_prefix(PREFIX).unwrap_or_default();
    if camera_id.is_empty() {
        return Err(RelayError::InvalidRequest);
    }

    let url = state.upstream.history_url(camera_id);
    let upstream = state.upstream.fetch(&url, ACCEPT_JSON).await?;

    serde_json::from_slice::<serde_json::Value>(&upstream.body)
        .map_err(|e| RelayError::InvalidBody(e.to_string()))?;

    tracing::debug!(camera_id = %camera_id, bytes = upstream.body.len(), "Relayed history");

    let max_age = state.upstream.config().history_max_age_secs;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::CACHE_CONTROL, format!("public, max-age={}", max_age)),
        ],
        upstream.body,
    )
        .into_response())
}
