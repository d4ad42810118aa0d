//! Kamery Relay Server
//!
//! HTTP layer built with Axum. Hosts the two CORS relays in front of the
//! camera data provider plus the camera list endpoints.
//!
//! # Endpoints
//!
//! ## Relays
//! - `GET /api/history/{cameraId}` - Historical frame list (JSON passthrough)
//! - `GET /api/image/{cameraId}/{encodedTimestamp}` - One frame (binary or JSON passthrough)
//!
//! Each relay makes exactly one upstream attempt. Upstream error statuses are
//! returned unchanged; network failures become a 500 with a JSON body.
//!
//! ## Cameras
//! - `GET /webcams.json` - Camera list document
//! - `GET /api/cameras` - Filtered / nearest-first list
//! - `GET /api/cameras/:id` - One camera
//! - `GET /api/regions` - Region table
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status
//!
//! # Example
//!
//! ```rust,ignore
//! use kamery::catalog::{CameraLoader, CameraSource};
//! use kamery::config::Config;
//! use kamery::relay::{serve, RelayState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let loader = CameraLoader::new(CameraSource::from_location(&config.catalog.location));
//!     let catalog = loader.load_or_empty().await;
//!
//!     let server = config.server.clone();
//!     serve(RelayState::new(config, catalog)?, &server).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::{RelayError, RelayResult};
pub use state::RelayState;
pub use upstream::{UpstreamClient, UpstreamResponse};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: RelayState) -> Router {
    let api_routes = Router::new()
        // Relays
        .route("/history/*camera_id", get(routes::history::relay_history))
        .route("/image/*image_path", get(routes::image::relay_image))
        // Camera list
        .route("/cameras", get(routes::cameras::list))
        .route("/cameras/:id", get(routes::cameras::get_camera))
        .route("/regions", get(routes::cameras::regions));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .route("/webcams.json", get(routes::cameras::camera_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the relay server
pub async fn serve(state: RelayState, config: &ServerConfig) -> Result<(), RelayError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Kamery relay listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Kamery relay shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_camera_list, Catalog};
    use crate::config::{Config, UpstreamConfig};
    use axum::{
        body::{Body, Bytes},
        extract::{OriginalUri, Path},
        http::{header, Request, StatusCode},
        response::{IntoResponse, Response},
    };
    use tower::util::ServiceExt;

    const CAMERAS: &str = r#"[
        {"file": "lysa", "name": "Lysá hora", "lat": "49.546", "lon": "18.447", "kraj": "T", "vyska": "1323"},
        {"file": "snezka", "name": "Sněžka", "lat": "50.736", "lon": "15.740", "kraj": "H", "vyska": "1603"},
        {"file": "praha", "name": "Praha-Libuš", "lat": "50.008", "lon": "14.447", "kraj": "A", "vyska": "302"}
    ]"#;

    async fn fake_history(Path(id): Path<String>) -> Response {
        match id.as_str() {
            "missing" => StatusCode::NOT_FOUND.into_response(),
            "broken" => "<html>maintenance</html>".into_response(),
            _ => (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"data":[{"dateTime":"2025-01-02T10:00:00Z","imageUrl":"a"},{"dateTime":"2025-01-02T10:10:00Z","imageUrl":"b"}],"extra":1}"#,
            )
                .into_response(),
        }
    }

    async fn fake_image(OriginalUri(uri): OriginalUri) -> Response {
        let path = uri.path().to_string();
        if path.ends_with("/nocontenttype") {
            return Response::new(Body::from(path));
        }
        if path.contains("/gone/") {
            return StatusCode::GONE.into_response();
        }
        ([(header::CONTENT_TYPE, "image/png")], path).into_response()
    }

    /// Fake provider on an ephemeral port
    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route(
                "/api/playableImages/init/web-kamery/:id",
                axum::routing::get(fake_history),
            )
            .route("/api/kamery/data/obrazok/*rest", axum::routing::get(fake_image));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// Base URL where nothing listens
    async fn dead_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn test_config(base_url: String) -> Config {
        Config {
            upstream: UpstreamConfig {
                base_url,
                timeout_secs: 5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn create_test_app(base_url: String) -> Router {
        app_with_config(test_config(base_url))
    }

    fn app_with_config(config: Config) -> Router {
        let catalog = Catalog {
            cameras: parse_camera_list(CAMERAS.as_bytes()).unwrap(),
            raw: Bytes::from_static(CAMERAS.as_bytes()),
        };

        build_router(RelayState::new(config, catalog).unwrap())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_history_passthrough() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/history/lysa").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=60"
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["extra"], 1);
    }

    #[tokio::test]
    async fn test_history_upstream_404() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/history/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(&body_bytes(response).await[..], b"Upstream error: 404");
    }

    #[tokio::test]
    async fn test_history_non_json_body() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/history/broken").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_history_network_error() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/api/history/lysa").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(json["error"].is_string());
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_image_passthrough_keeps_encoding() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/image/lysa/2025-01-02T10%3A00%3A00Z").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );

        let body = body_bytes(response).await;
        assert_eq!(
            &body[..],
            b"/api/kamery/data/obrazok/lysa/2025-01-02T10%3A00%3A00Z"
        );
    }

    #[tokio::test]
    async fn test_image_default_content_type() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/image/lysa/nocontenttype").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }

    #[tokio::test]
    async fn test_image_upstream_status() {
        let app = create_test_app(spawn_upstream().await);

        let response = get(app, "/api/image/gone/2025").await;
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_image_network_error() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/api/image/lysa/2025").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_camera_list_nearest() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/api/cameras?near=50.0,14.4&limit=2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["cameras"][0]["id"], "praha");
        assert!(json["cameras"][0]["distance_km"].is_number());
    }

    #[tokio::test]
    async fn test_camera_list_search() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/api/cameras?search=moravskoslezsk%C3%BD").await;
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["cameras"][0]["id"], "lysa");
    }

    #[tokio::test]
    async fn test_camera_list_bad_location() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/api/cameras?near=somewhere").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_camera_detail() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app.clone(), "/api/cameras/snezka").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["region_name"], "Královéhradecký kraj");
        assert_eq!(json["history_url"], "/api/history/snezka");

        let response = get(app, "/api/cameras/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_camera_detail_uses_image_base() {
        let mut config = test_config(dead_upstream().await);
        config.catalog.image_base_url = "http://mirror.local/kam".to_string();
        let app = app_with_config(config);

        let response = get(app, "/api/cameras/lysa").await;
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["image_url"], "http://mirror.local/kam/lysa.jpg");
        assert_eq!(json["thumbnail_url"], "http://mirror.local/kam/thumbs/lysa.gif");
    }

    #[tokio::test]
    async fn test_camera_document() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app, "/webcams.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body_bytes(response).await[..], CAMERAS.as_bytes());
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app(dead_upstream().await);

        let response = get(app.clone(), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(app, "/health").await;
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cameras"], 3);
    }
}
