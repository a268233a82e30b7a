//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPERLIAN_API_URL` - Base URL of the commerce backend
//!
//! ## Optional
//! - `SUPERLIAN_TIMEOUT_MS` - HTTP request timeout in milliseconds (default: 10000)
//! - `SUPERLIAN_DEBOUNCE_MS` - Search debounce delay in milliseconds (default: 300)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default HTTP request timeout.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default debounce delay for search input.
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the commerce backend (no trailing path expectations;
    /// endpoint paths are appended verbatim).
    pub api_base_url: Url,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Debounce delay applied to search input.
    pub debounce: Duration,
}

impl StoreConfig {
    /// Create a configuration with default timeouts.
    #[must_use]
    pub const fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("SUPERLIAN_API_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SUPERLIAN_API_URL".to_string(), e.to_string())
            })?;

        let timeout = get_millis("SUPERLIAN_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let debounce = get_millis("SUPERLIAN_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;

        Ok(Self {
            api_base_url,
            timeout,
            debounce,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a millisecond duration from the environment with a default.
fn get_millis(key: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        let config = StoreConfig::new("http://localhost:8000".parse().unwrap());
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.debounce, Duration::from_millis(300));
    }

    #[test]
    fn test_get_millis_default_when_unset() {
        let duration = get_millis("SUPERLIAN_TEST_UNSET_MS", 42).unwrap();
        assert_eq!(duration, Duration::from_millis(42));
    }
}
