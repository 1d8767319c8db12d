//! Durable session storage.
//!
//! A small key-value slot store backed by one file per slot, surviving
//! process restarts. Two slots are in use: the bearer token and the
//! serialized session snapshot.
//!
//! The token slot has two writers for deletion (the session store on logout
//! and the request pipeline on an authorization failure); removal of a
//! missing slot succeeds, so concurrent deletions never error.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lotmarket_core::AccessToken;

use crate::models::User;

/// Slot holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";

/// Slot holding the serialized [`SessionSnapshot`].
pub const SESSION_KEY: &str = "auth_storage";

/// Errors that can occur reading or writing durable state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored snapshot could not be decoded.
    #[error("storage decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The durable projection of the session store.
///
/// `is_loading` is an in-flight flag and is deliberately not part of the
/// snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether the persisted identity was authenticated.
    pub is_authenticated: bool,
    /// The persisted identity, if any.
    #[serde(default)]
    pub identity: Option<User>,
}

/// File-backed key-value slots for session state.
///
/// Each slot is a single file under the state directory; writes replace the
/// whole slot. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Create a storage handle rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read a slot's value, or `None` if the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    pub fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory or slot cannot be written.
    pub fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    /// Remove a slot. Removing an absent slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing slot cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Typed helpers for the two well-known slots
    // ─────────────────────────────────────────────────────────────────────

    /// Read the stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the token slot exists but cannot be read.
    pub fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        Ok(self.read(TOKEN_KEY)?.map(AccessToken::new))
    }

    /// Persist the bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token slot cannot be written.
    pub fn store_token(&self, token: &AccessToken) -> Result<(), StorageError> {
        self.write(TOKEN_KEY, token.as_str())
    }

    /// Read the persisted session snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or decoded.
    pub fn read_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        self.read(SESSION_KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    /// Persist the session snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    pub fn write_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)?;
        self.write(SESSION_KEY, &raw)
    }

    /// Remove both session slots (token and snapshot).
    ///
    /// Idempotent: clearing an already-clear session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing slot cannot be removed.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.remove(TOKEN_KEY)?;
        self.remove(SESSION_KEY)?;
        Ok(())
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
