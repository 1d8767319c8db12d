//! Error types for the API client.
//!
//! The pipeline never translates server failures into a different
//! representation: a non-success response becomes an [`ApiError::Api`] that
//! carries the original status and the server's own failure payload. Callers
//! that need retries or backoff build them above this layer.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failed (connection refused, DNS, malformed response body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server responded with a non-success status.
    #[error("API error {status}: {detail}")]
    Api {
        /// Original response status.
        status: StatusCode,
        /// The server's failure payload, verbatim where possible.
        detail: String,
    },

    /// A success response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Durable session state could not be written.
    #[error("storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl ApiError {
    /// Whether this error is the server rejecting the session credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// The response status, when the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) | Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        let err = ApiError::Api {
            status: StatusCode::UNAUTHORIZED,
            detail: "Could not validate credentials".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            detail: "Email already registered".to_string(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            detail: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400 Bad Request: Email already registered");
    }
}
