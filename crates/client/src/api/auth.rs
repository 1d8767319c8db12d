//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Client for the `/auth` endpoints.
///
/// Login and registration persist the returned bearer token to durable
/// storage before returning, so the pipeline can authenticate follow-up
/// requests even before the session store has seen the response.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Create a new auth service over the shared pipeline.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in with an email (or username) and password.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged (invalid credentials,
    /// validation problems, transport errors), or a storage error if the
    /// token cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };

        let response: AuthResponse = self.client.post("/auth/login", &request).await?;
        self.client.storage().store_token(&response.access_token)?;
        Ok(response)
    }

    /// Register a new account. A successful registration is an implicit
    /// login: the response carries a token and the new identity.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::login`].
    #[instrument(skip(self, password), fields(username = %username, email = %email))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        display_name: Option<String>,
    ) -> Result<AuthResponse, ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.expose_secret().to_string(),
            display_name,
        };

        let response: AuthResponse = self.client.post("/auth/register", &request).await?;
        self.client.storage().store_token(&response.access_token)?;
        Ok(response)
    }

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns the server's failure unchanged; an expired token surfaces as
    /// an authorization failure after the pipeline has torn the session
    /// down.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.client.get("/auth/me").await
    }

    /// Best-effort server-side logout. Failures are swallowed: the user is
    /// logging out either way, and the local teardown must always succeed.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_empty("/auth/logout").await {
            tracing::debug!(error = %e, "server logout failed, ignoring");
        }
    }
}
