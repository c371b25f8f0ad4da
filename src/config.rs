//! Server configuration.
//!
//! The configuration is built exactly once at startup, from stock defaults,
//! an optional `config.toml`, and command-line overrides (in that order), and
//! is immutable afterwards. Request handlers receive it through the router
//! state; there is no process-wide mutable configuration.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! images_path = "images"        # Root directory of the source images
//! cache_path = "cache"          # Root directory of the rendition cache
//! cache = true                  # false = resize inline on every request
//! host = "0.0.0.0"              # Listen address
//! port = 9999                   # Listen port
//! extensions = ["jpg", "jpeg"]  # Served file extensions
//! quality = 75                  # JPEG quality of renditions (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, supported_extensions};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Immutable server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Root directory that request paths are resolved against.
    pub images_path: PathBuf,
    /// Root directory of the on-disk rendition cache.
    pub cache_path: PathBuf,
    /// Whether renditions are cached. When false, every resize runs inline
    /// and `cache_path` is ignored.
    pub cache: bool,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Accepted file extensions (case-sensitive, without the dot).
    pub extensions: Vec<String>,
    /// JPEG encoding quality for renditions.
    pub quality: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            images_path: PathBuf::from("images"),
            cache_path: PathBuf::from("cache"),
            cache: true,
            host: "0.0.0.0".to_string(),
            port: 9999,
            extensions: supported_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
            quality: Quality::default().value(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        let supported = supported_extensions();
        for ext in &self.extensions {
            if !supported.contains(&ext.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::Validation(format!(
                    "extension '{ext}' is not supported (expected one of: {})",
                    supported.join(", ")
                )));
            }
        }
        if self.cache && self.cache_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache_path must be set when cache is enabled".into(),
            ));
        }
        Ok(())
    }

    /// The cache root, or `None` when caching is disabled.
    pub fn cache_root(&self) -> Option<&Path> {
        self.cache.then_some(self.cache_path.as_path())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("invalid listen address: {e}")))
    }
}

/// A documented `config.toml` with every option at its default value.
pub fn stock_config_toml() -> &'static str {
    r#"# imageserver configuration
#
# Every key is optional. Command-line flags override values set here.

# Root directory of the source images. Request paths resolve against it:
# GET /albums/photo.jpg -> {images_path}/albums/photo.jpg
images_path = "images"

# Root directory of the rendition cache. Renditions are stored at
# {cache_path}/{request path}/{sha256 of source identity}/{width}x{height}
# and are never evicted; editing a source simply starts a new directory.
cache_path = "cache"

# Set to false to resize inline on every request without touching disk.
cache = true

# Listen address and port.
host = "0.0.0.0"
port = 9999

# Served file extensions. Only JPEG is supported.
extensions = ["jpg", "jpeg"]

# JPEG quality of generated renditions (1-100).
quality = 75
"#
}
