//! Frame Sources
//!
//! Where the viewer gets history lists and frame bodies from. The default
//! implementation talks to the relay over HTTP.

use async_trait::async_trait;
use reqwest::Client;

use super::frames::{parse_history, HistoryFrame};
use super::image::FramePayload;
use super::ViewerError;
use crate::catalog::{historical_image_path, history_path};

/// Supplies history metadata and frame bodies
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Historical frames for a camera, oldest first
    async fn history(&self, camera_id: &str) -> Result<Vec<HistoryFrame>, ViewerError>;

    /// Request URL for a frame; also the cache key
    fn frame_url(&self, camera_id: &str, frame: &HistoryFrame) -> String;

    /// Fetch a frame body
    async fn fetch_frame(&self, url: &str) -> Result<FramePayload, ViewerError>;
}

/// Frame source backed by a running relay
pub struct RelayFrameSource {
    base_url: String,
    client: Client,
}

impl RelayFrameSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl FrameSource for RelayFrameSource {
    async fn history(&self, camera_id: &str) -> Result<Vec<HistoryFrame>, ViewerError> {
        let url = format!("{}{}", self.base_url, history_path(camera_id));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ViewerError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        Ok(parse_history(&body)?)
    }

    fn frame_url(&self, camera_id: &str, frame: &HistoryFrame) -> String {
        format!(
            "{}{}",
            self.base_url,
            historical_image_path(camera_id, &frame.date_time)
        )
    }

    async fn fetch_frame(&self, url: &str) -> Result<FramePayload, ViewerError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ViewerError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(FramePayload { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_url() {
        let source = RelayFrameSource::new("http://localhost:8888/");
        let url = source.frame_url("lysa", &HistoryFrame::new("2025-01-02T10:00:00Z"));
        assert_eq!(
            url,
            "http://localhost:8888/api/image/lysa/2025-01-02T10%3A00%3A00Z"
        );
    }
}
