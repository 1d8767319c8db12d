//! CLI command implementations.

pub mod auth;
pub mod catalog;
pub mod orders;

use std::sync::Arc;

use thiserror::Error;

use lotmarket_client::config::{ClientConfig, ConfigError};
use lotmarket_client::http::LogNavigator;
use lotmarket_client::{ApiClient, ApiError, SessionStore, SessionStorage};

/// Errors that can occur running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Shared per-command context: one pipeline, one session store.
pub struct Context {
    pub client: ApiClient,
    pub session: SessionStore,
}

impl Context {
    /// Build the client stack from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let storage = SessionStorage::new(config.state_dir.clone());
        let client = ApiClient::new(&config, storage, Arc::new(LogNavigator));
        let session = SessionStore::new(client.clone());
        Ok(Self { client, session })
    }
}
