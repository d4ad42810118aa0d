//! Relay State
//!
//! Shared state accessible by all relay handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use super::error::RelayError;
use super::upstream::UpstreamClient;
use crate::catalog::Catalog;
use crate::config::Config;

/// Shared state for all handlers
#[derive(Clone)]
pub struct RelayState {
    /// Client for the camera data provider
    pub upstream: Arc<UpstreamClient>,
    /// Camera list loaded at startup
    pub catalog: Arc<Catalog>,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl RelayState {
    pub fn new(config: Config, catalog: Catalog) -> Result<Self, RelayError> {
        let upstream = UpstreamClient::new(config.upstream.clone())?;

        Ok(Self {
            upstream: Arc::new(upstream),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
