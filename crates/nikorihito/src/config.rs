//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_HEALTH_ADDR: &str = "0.0.0.0:8080";

/// Process-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    /// Keep-alive endpoint address; `None` disables it.
    pub health_addr: Option<SocketAddr>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `NIKORI_DATA_DIR` | Data directory | `.` |
    /// | `NIKORI_HEALTH_ADDR` | Health endpoint bind address, or `off` | `0.0.0.0:8080` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("NIKORI_DATA_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let health_addr = parse_health_addr(
            &env::var("NIKORI_HEALTH_ADDR").unwrap_or_else(|_| DEFAULT_HEALTH_ADDR.to_string()),
        )?;

        Ok(Self {
            data_dir,
            health_addr,
        })
    }
}

fn parse_health_addr(raw: &str) -> Result<Option<SocketAddr>, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidHealthAddr(raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid NIKORI_HEALTH_ADDR: {0}")]
    InvalidHealthAddr(String),
}
