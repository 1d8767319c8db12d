//! Bearer token type.

use serde::{Deserialize, Serialize};

/// An opaque bearer token proving an authenticated session to the server.
///
/// The token contents are never interpreted client-side. `Debug` is
/// implemented manually to keep the token out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new token from a raw string.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and return its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("tok123".to_string());
        let debug_output = format!("{token:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok123"));
    }

    #[test]
    fn test_serde_transparent() {
        let token = AccessToken::new("tok123".to_string());
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"tok123\"");

        let parsed: AccessToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }
}
