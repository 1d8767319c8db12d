//! The session store.
//!
//! Single source of truth for "who is the current user". The store owns the
//! in-memory [`SessionState`] and writes the durable [`SessionSnapshot`]
//! after every mutation; the bearer token itself is persisted by the auth
//! service, so the pipeline and the store stay independently
//! reconstructible.
//!
//! Concurrency: operations acquire the state lock only for synchronous
//! writes, never across a network await. Two overlapping operations (a
//! double-clicked login, a login racing a logout) therefore interleave
//! arbitrarily and the last write wins - deliberately the same behavior as
//! not locking at all, kept rather than "fixed".

use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::User;
use crate::storage::{SessionSnapshot, SessionStorage};

/// In-memory session state.
///
/// `identity` is present exactly when `is_authenticated` is true; every
/// mutation in this module preserves that invariant. `is_loading` overlays
/// either state while an operation is in flight and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The authenticated identity, if any.
    pub identity: Option<User>,
    /// Whether the session is authenticated.
    pub is_authenticated: bool,
    /// Whether a session operation is in flight.
    pub is_loading: bool,
}

/// Holds and persists the current authenticated identity.
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: SessionStorage,
    auth: AuthApi,
}

impl SessionStore {
    /// Create a session store over the shared pipeline, rehydrating any
    /// persisted session.
    ///
    /// A persisted snapshot that claims authentication without a stored
    /// token hydrates as anonymous: absence of the credential always wins.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let storage = client.storage().clone();
        let state = hydrate(&storage);
        Self {
            state: RwLock::new(state),
            storage,
            auth: AuthApi::new(client),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// The current identity, if authenticated.
    pub async fn identity(&self) -> Option<User> {
        self.state.read().await.identity.clone()
    }

    /// Whether the session is currently authenticated.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    /// Whether a session operation is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Log in and establish an authenticated session.
    ///
    /// On success the token is already persisted (by the auth service) and
    /// the identity is held and persisted here. On failure the state is
    /// left unauthenticated and the failure propagates unchanged.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged; no retry, no translation.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, ApiError> {
        self.mutate(|state| state.is_loading = true).await;

        match self.auth.login(email, password).await {
            Ok(response) => {
                let user = response.user;
                self.mutate(|state| {
                    state.identity = Some(user.clone());
                    state.is_authenticated = true;
                    state.is_loading = false;
                })
                .await;
                Ok(user)
            }
            Err(e) => {
                self.mutate(|state| state.is_loading = false).await;
                Err(e)
            }
        }
    }

    /// Register a new account; a successful registration is an implicit
    /// login.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged; no retry, no translation.
    #[instrument(skip(self, password), fields(username = %username, email = %email))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        display_name: Option<String>,
    ) -> Result<User, ApiError> {
        self.mutate(|state| state.is_loading = true).await;

        match self
            .auth
            .register(username, email, password, display_name)
            .await
        {
            Ok(response) => {
                let user = response.user;
                self.mutate(|state| {
                    state.identity = Some(user.clone());
                    state.is_authenticated = true;
                    state.is_loading = false;
                })
                .await;
                Ok(user)
            }
            Err(e) => {
                self.mutate(|state| state.is_loading = false).await;
                Err(e)
            }
        }
    }

    /// End the session.
    ///
    /// The server-side logout is best-effort; whatever it does, the local
    /// teardown happens: the token slot is cleared and the state resets to
    /// anonymous. Never raises, and calling it twice is the same as once.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        self.auth.logout().await;

        if let Err(e) = self.storage.clear_session() {
            tracing::warn!(error = %e, "failed to clear durable session state");
        }

        self.mutate(|state| *state = SessionState::default()).await;
    }

    /// Refresh the held identity from the server.
    ///
    /// A no-op when no identity is held - there is nothing to refresh
    /// without an existing session hint, and no network call is made. Any
    /// failure (including an expired token) is treated as a sign-out and
    /// performs the same teardown as [`Self::logout`].
    #[instrument(skip(self))]
    pub async fn reload_identity(&self) {
        if self.state.read().await.identity.is_none() {
            return;
        }

        self.mutate(|state| state.is_loading = true).await;

        match self.auth.get_profile().await {
            Ok(user) => {
                self.mutate(|state| {
                    state.identity = Some(user);
                    state.is_authenticated = true;
                    state.is_loading = false;
                })
                .await;
            }
            Err(e) => {
                tracing::info!(error = %e, "identity reload failed, signing out");
                self.logout().await;
            }
        }
    }

    /// Apply a state mutation, then persist the snapshot.
    ///
    /// The lock is released before the disk write; the snapshot excludes
    /// `is_loading`.
    async fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.state.write().await;
            f(&mut state);
            SessionSnapshot {
                is_authenticated: state.is_authenticated,
                identity: state.identity.clone(),
            }
        };

        if let Err(e) = self.storage.write_snapshot(&snapshot) {
            tracing::warn!(error = %e, "failed to persist session snapshot");
        }
    }
}

/// Rebuild the in-memory state from durable storage.
///
/// Anything inconsistent (snapshot without a token, authenticated flag
/// without an identity, unreadable snapshot) degrades to anonymous.
fn hydrate(storage: &SessionStorage) -> SessionState {
    let snapshot = match storage.read_snapshot() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return SessionState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted session, starting anonymous");
            return SessionState::default();
        }
    };

    let has_token = match storage.access_token() {
        Ok(token) => token.is_some(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stored token, starting anonymous");
            false
        }
    };

    if snapshot.is_authenticated && snapshot.identity.is_some() && has_token {
        SessionState {
            identity: snapshot.identity,
            is_authenticated: true,
            is_loading: false,
        }
    } else {
        SessionState::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lotmarket_core::AccessToken;

    use super::*;
    use crate::storage::SESSION_KEY;

    fn sample_user_json() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "username": "alice",
            "email": "a@b.com",
            "is_active": true,
            "is_verified": true,
            "role": "user",
            "rating": 4.5,
            "total_reviews": 3,
            "total_sales": 1,
            "total_purchases": 4,
            "created_at": "2025-01-15T10:00:00Z"
        })
    }

    fn authenticated_snapshot() -> String {
        serde_json::json!({
            "is_authenticated": true,
            "identity": sample_user_json(),
        })
        .to_string()
    }

    #[test]
    fn test_hydrate_empty_storage_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().to_path_buf());

        let state = hydrate(&storage);
        assert!(!state.is_authenticated);
        assert!(state.identity.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_hydrate_with_snapshot_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().to_path_buf());
        storage.write(SESSION_KEY, &authenticated_snapshot()).unwrap();
        storage
            .store_token(&AccessToken::new("tok123".to_string()))
            .unwrap();

        let state = hydrate(&storage);
        assert!(state.is_authenticated);
        assert_eq!(state.identity.unwrap().username, "alice");
    }

    #[test]
    fn test_hydrate_without_token_forces_anonymous() {
        // A snapshot claiming authentication is overruled by the absence of
        // the credential.
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().to_path_buf());
        storage.write(SESSION_KEY, &authenticated_snapshot()).unwrap();

        let state = hydrate(&storage);
        assert!(!state.is_authenticated);
        assert!(state.identity.is_none());
    }

    #[test]
    fn test_hydrate_corrupt_snapshot_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().to_path_buf());
        storage.write(SESSION_KEY, "not json").unwrap();
        storage
            .store_token(&AccessToken::new("tok123".to_string()))
            .unwrap();

        let state = hydrate(&storage);
        assert!(!state.is_authenticated);
        assert!(state.identity.is_none());
    }

    #[test]
    fn test_hydrate_anonymous_snapshot_stays_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(dir.path().to_path_buf());
        storage
            .write_snapshot(&SessionSnapshot::default())
            .unwrap();

        let state = hydrate(&storage);
        assert!(!state.is_authenticated);
        assert!(state.identity.is_none());
    }
}
