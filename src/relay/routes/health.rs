//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Status with camera count and uptime

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::relay::dto::HealthResponse;
use crate::relay::state::RelayState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// "degraded" when the camera list failed to load; the relays still work.
pub async fn full_health(State(state): State<Arc<RelayState>>) -> Json<HealthResponse> {
    let cameras = state.catalog.len();

    Json(HealthResponse {
        status: if cameras > 0 { "healthy" } else { "degraded" }.to_string(),
        cameras,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
