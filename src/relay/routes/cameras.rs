//! Camera Routes
//!
//! - GET /webcams.json - The camera list document, verbatim
//! - GET /api/cameras - Filtered / nearest-first camera list
//! - GET /api/cameras/:id - One camera with its image URLs
//! - GET /api/regions - Region code table

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::browse::{list_cameras, ListQuery};
use crate::catalog::{history_path, image_url, thumbnail_url, GeoPoint, REGIONS};
use crate::relay::dto::{
    CameraDetailResponse, CameraListItem, CameraListParams, CameraListResponse, RegionResponse,
};
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::state::RelayState;

/// GET /webcams.json
pub async fn camera_document(State(state): State<Arc<RelayState>>) -> RelayResult<Response> {
    if state.catalog.raw.is_empty() {
        return Err(RelayError::NotFound("camera list not loaded".to_string()));
    }

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        state.catalog.raw.clone(),
    )
        .into_response())
}

/// GET /api/cameras
///
/// `near=lat,lon` selects the nearest view; without `search` it is capped
/// to `limit` (default from config).
pub async fn list(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<CameraListParams>,
) -> RelayResult<Json<CameraListResponse>> {
    let mut query = ListQuery::default()
        .search(params.search.unwrap_or_default())
        .limit(params.limit.unwrap_or(state.config.catalog.nearest_limit));

    if let Some(near) = params.near.as_deref() {
        let origin = GeoPoint::parse(near)
            .ok_or_else(|| RelayError::Validation(format!("invalid location '{}'", near)))?;
        query = query.nearest(origin);
    }

    let cameras: Vec<CameraListItem> = list_cameras(&state.catalog.cameras, &query)
        .into_iter()
        .map(CameraListItem::from)
        .collect();

    Ok(Json(CameraListResponse {
        total: cameras.len(),
        cameras,
    }))
}

/// GET /api/cameras/:id
pub async fn get_camera(
    State(state): State<Arc<RelayState>>,
    Path(id): Path<String>,
) -> RelayResult<Json<CameraDetailResponse>> {
    let camera = state
        .catalog
        .get(&id)
        .ok_or_else(|| RelayError::NotFound(format!("Camera '{}' not found", id)))?;

    Ok(Json(CameraDetailResponse {
        region_name: camera.region_name().to_string(),
        image_url: image_url(&state.config.catalog.image_base_url, &camera.id),
        thumbnail_url: thumbnail_url(&state.config.catalog.image_base_url, &camera.id),
        history_url: history_path(&camera.id),
        camera: camera.clone(),
    }))
}

/// GET /api/regions
pub async fn regions() -> Json<Vec<RegionResponse>> {
    Json(
        REGIONS
            .iter()
            .map(|(code, name)| RegionResponse {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect(),
    )
}
