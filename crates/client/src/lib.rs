//! LotMarket client - API client and session layer.
//!
//! This crate is the single place where authentication state lives and where
//! server communication happens. It has two core components:
//!
//! - [`session::SessionStore`] - holds the current authenticated identity,
//!   persists it across restarts, and owns the `login` / `register` /
//!   `logout` / `reload_identity` operations.
//! - [`http::ApiClient`] - the request pipeline every domain call flows
//!   through. It attaches the stored bearer token to outgoing requests and
//!   tears the session down when the server reports the token is no longer
//!   valid.
//!
//! Domain services ([`api::GamesApi`], [`api::LotsApi`], [`api::OrdersApi`],
//! [`api::AuthApi`]) are thin typed wrappers over the pipeline - they shape
//! paths and payloads, nothing else.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lotmarket_client::config::ClientConfig;
//! use lotmarket_client::http::{ApiClient, LogNavigator};
//! use lotmarket_client::session::SessionStore;
//! use lotmarket_client::storage::SessionStorage;
//!
//! let config = ClientConfig::from_env()?;
//! let storage = SessionStorage::new(config.state_dir.clone());
//! let client = ApiClient::new(&config, storage, Arc::new(LogNavigator));
//! let session = SessionStore::new(client.clone());
//!
//! session.login("a@b.com", &password).await?;
//! let lots = lotmarket_client::api::LotsApi::new(client).list(&filters).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod storage;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{ApiClient, Navigate};
pub use session::SessionStore;
pub use storage::SessionStorage;
