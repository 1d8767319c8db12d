//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LOTMARKET_API_URL` - Base address of the marketplace API. Ignored in
//!   debug builds, which always talk to the local development server.
//! - `LOTMARKET_STATE_DIR` - Directory for durable session state (token,
//!   session snapshot). Defaults to the platform data dir.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Base address used in development and as the production fallback.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
///
/// The API base address is resolved once, here; the request pipeline never
/// re-reads the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the marketplace API, without a trailing slash.
    pub api_url: String,
    /// Directory holding durable session state.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LOTMARKET_API_URL` is set but is not a
    /// valid absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = resolve_api_url(get_optional_env("LOTMARKET_API_URL"))?;
        let state_dir = get_optional_env("LOTMARKET_STATE_DIR")
            .map_or_else(default_state_dir, PathBuf::from);

        Ok(Self { api_url, state_dir })
    }

    /// Build a configuration with an explicit base address and state dir.
    ///
    /// Used by tests and by callers that manage their own configuration.
    #[must_use]
    pub fn new(api_url: impl Into<String>, state_dir: PathBuf) -> Self {
        Self {
            api_url: trim_trailing_slash(api_url.into()),
            state_dir,
        }
    }
}

/// Resolve the API base address.
///
/// Development builds always target the local development server; otherwise
/// the configured address wins, falling back to the same local default.
fn resolve_api_url(configured: Option<String>) -> Result<String, ConfigError> {
    if cfg!(debug_assertions) {
        return Ok(DEFAULT_API_URL.to_string());
    }

    match configured {
        Some(value) => {
            Url::parse(&value).map_err(|e| {
                ConfigError::InvalidEnvVar("LOTMARKET_API_URL".to_string(), e.to_string())
            })?;
            Ok(trim_trailing_slash(value))
        }
        None => Ok(DEFAULT_API_URL.to_string()),
    }
}

/// Default directory for durable session state.
///
/// Falls back to the temp dir when the platform has no data dir.
fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lotmarket")
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
