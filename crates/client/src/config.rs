//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SWEET_SHOP_API_BASE_URL` - Base URL of the Sweet Shop API
//!   (default: `http://localhost:8000/api`)
//! - `SWEET_SHOP_API_TIMEOUT_MS` - Request timeout in milliseconds
//!   (default: 15000)
//! - `SWEET_SHOP_DATA_DIR` - Directory for persisted client state
//!   (default: `<platform data dir>/sweet-shop`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_API_TIMEOUT_MS: u64 = 15_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sweet Shop client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API, with a trailing path like `/api`.
    pub api_base_url: Url,
    /// Timeout applied to every API request.
    pub api_timeout: Duration,
    /// Directory holding the persisted state files.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    /// Every variable has a default, so a bare environment works.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("SWEET_SHOP_API_BASE_URL", DEFAULT_API_BASE_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SWEET_SHOP_API_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout_ms = match get_optional_env("SWEET_SHOP_API_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SWEET_SHOP_API_TIMEOUT_MS".to_string(), e.to_string())
            })?,
            None => DEFAULT_API_TIMEOUT_MS,
        };

        let data_dir = get_optional_env("SWEET_SHOP_DATA_DIR").map_or_else(
            || {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("sweet-shop")
            },
            PathBuf::from,
        );

        Ok(Self {
            api_base_url,
            api_timeout: Duration::from_millis(timeout_ms),
            data_dir,
        })
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_parses() {
        let url = DEFAULT_API_BASE_URL.parse::<Url>().unwrap();
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        let value = get_env_or_default("SWEET_SHOP_NO_SUCH_VAR", "fallback");
        assert_eq!(value, "fallback");
    }
}
