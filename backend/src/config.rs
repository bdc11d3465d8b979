use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const STATIC_PREFIX: &str = "/static";

/// Name of the variable holding the shared API key. Looked up verbatim.
pub const API_KEY_VAR: &str = "api-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Empty when unset, which rejects every non-empty key.
    pub api_key: String,
    pub allowed_origin: String,
    pub allowed_referer_prefix: String,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: String::new(),
            allowed_origin: "http://localhost:8080".to_string(),
            allowed_referer_prefix: "http://localhost:8080/static".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(key) = lookup(API_KEY_VAR) {
            config.api_key = key;
        }
        if let Some(origin) = lookup("ALLOWED_ORIGIN") {
            config.allowed_origin = origin;
        }
        if let Some(prefix) = lookup("ALLOWED_REFERER_PREFIX") {
            config.allowed_referer_prefix = prefix;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}
