//! Upstream HTTP client
//!
//! Builds upstream URLs and performs the single GET each relay call makes,
//! replaying the browser headers the provider expects.

use axum::body::Bytes;
use reqwest::Client;

use super::error::RelayError;
use crate::config::UpstreamConfig;

/// `Accept` sent for history metadata
pub const ACCEPT_JSON: &str = "application/json";
/// `Accept` sent for frame images
pub const ACCEPT_IMAGE: &str = "image/jpeg,image/*";

const HISTORY_PATH: &str = "/api/playableImages/init/web-kamery";
const IMAGE_PATH: &str = "/api/kamery/data/obrazok";

/// A successful upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Client for the camera data provider
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Upstream URL for a camera's history metadata
    pub fn history_url(&self, camera_id: &str) -> String {
        format!(
            "{}{}/{}",
            self.config.base_url.trim_end_matches('/'),
            HISTORY_PATH,
            camera_id
        )
    }

    /// Upstream URL for a frame. `image_path` is `{cameraId}/{encodedTimestamp}`
    /// and is forwarded still encoded.
    pub fn image_url(&self, image_path: &str) -> String {
        format!(
            "{}{}/{}",
            self.config.base_url.trim_end_matches('/'),
            IMAGE_PATH,
            image_path
        )
    }

    /// One GET, no retry
    pub async fn fetch(&self, url: &str, accept: &str) -> Result<UpstreamResponse, RelayError> {
        tracing::debug!(url = %url, "Forwarding request upstream");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::ORIGIN, &self.config.origin)
            .header(reqwest::header::REFERER, &self.config.referer)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Upstream(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?;

        Ok(UpstreamResponse { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(UpstreamConfig {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_history_url() {
        assert_eq!(
            client("https://data-provider.chmi.cz").history_url("lysa"),
            "https://data-provider.chmi.cz/api/playableImages/init/web-kamery/lysa"
        );
    }

    #[test]
    fn test_image_url_keeps_encoding() {
        assert_eq!(
            client("http://localhost:9000/").image_url("lysa/2025-01-02T10%3A20%3A00"),
            "http://localhost:9000/api/kamery/data/obrazok/lysa/2025-01-02T10%3A20%3A00"
        );
    }
}
