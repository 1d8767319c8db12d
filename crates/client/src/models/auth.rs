//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};

use lotmarket_core::AccessToken;

use super::User;

/// Payload for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    /// Email or username, as typed by the user.
    pub email: String,
    /// Plain-text password. Only ever serialized into the request body.
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Response shared by login and registration.
///
/// Registration returns the same shape as login - a successful registration
/// is an implicit login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub access_token: AccessToken,
    /// Token scheme, always `bearer`.
    pub token_type: String,
    /// The authenticated identity.
    pub user: User,
}
