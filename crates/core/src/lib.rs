//! LotMarket Core - Shared types library.
//!
//! This crate provides common types used across all LotMarket components:
//! - `client` - API client and session layer
//! - `cli` - Command-line tools built on the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, tokens, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
