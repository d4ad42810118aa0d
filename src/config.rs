//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream data provider that the relays forward to
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    /// Spoofed `Origin` header
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Spoofed `Referer` header
    #[serde(default = "default_referer")]
    pub referer: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `max-age` for relayed history metadata
    #[serde(default = "default_history_max_age")]
    pub history_max_age_secs: u32,

    /// `max-age` for relayed images
    #[serde(default = "default_image_max_age")]
    pub image_max_age_secs: u32,

    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    "https://data-provider.chmi.cz".to_string()
}

fn default_origin() -> String {
    "https://portal.chmi.cz".to_string()
}

fn default_referer() -> String {
    "https://portal.chmi.cz/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_history_max_age() -> u32 {
    60
}

fn default_image_max_age() -> u32 {
    3600
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            origin: default_origin(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            history_max_age_secs: default_history_max_age(),
            image_max_age_secs: default_image_max_age(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// Camera list location and direct imagery
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// File path or http(s) URL of `webcams.json`
    #[serde(default = "default_cameras_location")]
    pub location: String,

    /// Where current images and marker thumbnails are served from
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    #[serde(default = "default_nearest_limit")]
    pub nearest_limit: usize,
}

fn default_image_base_url() -> String {
    crate::catalog::DIRECT_IMAGE_BASE.to_string()
}

fn default_cameras_location() -> String {
    "public/webcams.json".to_string()
}

fn default_nearest_limit() -> usize {
    crate::browse::NEAREST_LIMIT
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            location: default_cameras_location(),
            image_base_url: default_image_base_url(),
            nearest_limit: default_nearest_limit(),
        }
    }
}

/// History viewer behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Frames fetched ahead of the current one
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: usize,

    /// Auto-play frame interval
    #[serde(default = "default_play_interval")]
    pub play_interval_ms: u64,
}

fn default_prefetch_count() -> usize {
    5
}

fn default_play_interval() -> u64 {
    300
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            prefetch_count: default_prefetch_count(),
            play_interval_ms: default_play_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level when set.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("kamery={},tower_http=debug", self.level))
        });

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from file with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("kamery").join("config.toml")),
            Some(PathBuf::from("/etc/kamery/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("KAMERY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("KAMERY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(url) = std::env::var("KAMERY_UPSTREAM_URL") {
            self.upstream.base_url = url;
        }

        if let Ok(location) = std::env::var("KAMERY_CAMERAS_PATH") {
            self.catalog.location = location;
        }
        if let Ok(url) = std::env::var("KAMERY_IMAGE_BASE_URL") {
            self.catalog.image_base_url = url;
        }

        if let Ok(level) = std::env::var("KAMERY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("KAMERY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Kamery Configuration
#
# Environment variables override these settings:
# - KAMERY_HOST
# - KAMERY_PORT
# - KAMERY_UPSTREAM_URL
# - KAMERY_CAMERAS_PATH
# - KAMERY_IMAGE_BASE_URL
# - KAMERY_LOG_LEVEL
# - KAMERY_LOG_FORMAT

[server]
# Relay server host
host = "0.0.0.0"

# Relay server port
port = 8888

[upstream]
# Camera data provider the relays forward to
base_url = "https://data-provider.chmi.cz"

# Headers replayed on every upstream request
origin = "https://portal.chmi.cz"
referer = "https://portal.chmi.cz/"
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"

# Cache lifetime of relayed responses (seconds)
history_max_age_secs = 60
image_max_age_secs = 3600

# Upstream request timeout (seconds)
timeout_secs = 30

[catalog]
# Camera list: a file path or an http(s) URL
location = "public/webcams.json"

# Current images and marker thumbnails
image_base_url = "https://intranet.chmi.cz/files/portal/docs/meteo/kam"

# How many cameras the nearest view shows without a search term
nearest_limit = 20

[viewer]
# Frames fetched ahead of the one on screen
prefetch_count = 5

# Auto-play frame interval (ms)
play_interval_ms = 300

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8888");
        assert_eq!(config.upstream.history_max_age_secs, 60);
        assert_eq!(config.upstream.image_max_age_secs, 3600);
        assert_eq!(config.viewer.prefetch_count, 5);
        assert_eq!(config.viewer.play_interval_ms, 300);
        assert_eq!(config.catalog.nearest_limit, 20);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.upstream.origin, "https://portal.chmi.cz");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(
            config.catalog.image_base_url,
            crate::catalog::DIRECT_IMAGE_BASE
        );
    }

    #[test]
    fn test_image_base_url_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\nimage_base_url = \"http://mirror.local/kam\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.catalog.image_base_url, "http://mirror.local/kam");
        assert_eq!(config.catalog.location, "public/webcams.json");
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000\n\n[viewer]\nplay_interval_ms = 500").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.viewer.play_interval_ms, 500);
        assert_eq!(config.viewer.prefetch_count, 5);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::load(Path::new("/nonexistent/kamery.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
