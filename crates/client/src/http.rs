//! The request pipeline.
//!
//! Every server call in the application flows through [`ApiClient`]. The
//! pipeline has exactly two interception stages composed around the
//! transport:
//!
//! - **Outbound**: read the bearer token from durable storage and attach it
//!   as an `Authorization` header. A missing token is not an error - the
//!   request simply goes out unauthenticated.
//! - **Inbound**: successes pass through untouched. Any non-success status
//!   becomes an [`ApiError::Api`] carrying the server's own failure payload.
//!   A 401 additionally tears the session down: both durable slots are
//!   cleared and the [`Navigate`] capability forces a reload of the login
//!   surface, so no stale in-memory state survives anywhere in the
//!   application. The original failure is still surfaced to the caller.
//!
//! The pipeline does no retries, timeouts, or backoff; resilience belongs
//! to callers.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use lotmarket_core::AccessToken;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::storage::SessionStorage;

/// Path of the login surface targeted on session expiry.
pub const LOGIN_PATH: &str = "/login";

/// Capability to force a full reload to a given path.
///
/// Invoked only by the pipeline's authorization-failure handler. The
/// contract is "discard everything": after `force_reload` all in-memory
/// session state must be considered gone. The pipeline clears durable state
/// itself before calling this, so implementations only decide what a reload
/// means for their surface (a browser would replace the location, the CLI
/// logs it and lets the process exit).
pub trait Navigate: Send + Sync {
    /// Force a full reload to `path`.
    fn force_reload(&self, path: &str);
}

/// Navigator that records the forced redirect in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigate for LogNavigator {
    fn force_reload(&self, path: &str) {
        tracing::warn!(path, "session expired, forcing navigation to login");
    }
}

// ─────────────────────────────────────────────────────────────────────────
// ApiClient
// ─────────────────────────────────────────────────────────────────────────

/// Client for the marketplace API.
///
/// The single egress/ingress point for server communication. Domain
/// services hold a clone of this client; cloning is cheap.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    storage: SessionStorage,
    navigator: Arc<dyn Navigate>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The base address comes from the configuration and is fixed for the
    /// lifetime of the client.
    #[must_use]
    pub fn new(config: &ClientConfig, storage: SessionStorage, navigator: Arc<dyn Navigate>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                storage,
                navigator,
            }),
        }
    }

    /// The durable storage this client reads its token from.
    #[must_use]
    pub fn storage(&self) -> &SessionStorage {
        &self.inner.storage
    }

    // ─────────────────────────────────────────────────────────────────────
    // Typed verbs used by the domain services
    // ─────────────────────────────────────────────────────────────────────

    /// `GET` a path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the server responds with a
    /// non-success status, or the body cannot be decoded.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    /// `GET` a path with query parameters and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get`].
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get`].
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// `POST` with no body, discarding the response payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server responds with
    /// a non-success status.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, path)).await?;
        Ok(())
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get`].
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// `DELETE` a path, discarding the response payload.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::post_empty`].
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pipeline stages
    // ─────────────────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, format!("{}{path}", self.inner.base_url))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;
        self.intercept(response).await
    }

    /// Outbound stage: attach the stored bearer token, if any.
    ///
    /// Never fails the request - a storage read error is logged and treated
    /// as an absent token.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.inner.storage.access_token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read stored token, sending unauthenticated");
            None
        });
        attach_bearer(request, token.as_ref())
    }

    /// Inbound stage: pass successes through, convert failures, and tear
    /// the session down on an authorization failure.
    async fn intercept(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(status, &body);

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("authorization failure, tearing down session");
            self.expire_session();
        }

        Err(ApiError::Api { status, detail })
    }

    /// Clear both durable slots and force navigation to the login surface.
    ///
    /// Deletion is idempotent, so racing the session store's own teardown
    /// is harmless.
    fn expire_session(&self) {
        if let Err(e) = self.inner.storage.clear_session() {
            tracing::warn!(error = %e, "failed to clear durable session state");
        }
        self.inner.navigator.force_reload(LOGIN_PATH);
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Attach `Authorization: Bearer <token>` when a token is present.
fn attach_bearer(request: RequestBuilder, token: Option<&AccessToken>) -> RequestBuilder {
    match token {
        Some(token) => match HeaderValue::from_str(&format!("Bearer {}", token.as_str())) {
            Ok(value) => request.header(AUTHORIZATION, value),
            Err(_) => {
                tracing::warn!("stored token is not a valid header value, sending unauthenticated");
                request
            }
        },
        None => request,
    }
}

/// Pull the human-meaningful failure payload out of an error body.
///
/// The server reports failures as `{"detail": ...}` where `detail` is a
/// string or a list of validation problems. Anything else is passed through
/// raw so the caller still sees the original payload.
fn extract_detail(status: StatusCode, body: &str) -> String {
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::storage::{SESSION_KEY, TOKEN_KEY};

    /// Navigator that records every forced redirect.
    #[derive(Debug, Default)]
    struct RecordingNavigator {
        calls: Mutex<Vec<String>>,
    }

    impl Navigate for RecordingNavigator {
        fn force_reload(&self, path: &str) {
            self.calls.lock().unwrap().push(path.to_string());
        }
    }

    fn test_client(dir: &tempfile::TempDir) -> (ApiClient, Arc<RecordingNavigator>) {
        let config = ClientConfig::new("http://localhost:8000/api", PathBuf::from(dir.path()));
        let storage = SessionStorage::new(dir.path().to_path_buf());
        let navigator = Arc::new(RecordingNavigator::default());
        let client = ApiClient::new(&config, storage, navigator.clone());
        (client, navigator)
    }

    #[test]
    fn test_attach_bearer_with_token() {
        let builder = reqwest::Client::new().get("http://localhost/api/lots/");
        let token = AccessToken::new("tok123".to_string());

        let request = attach_bearer(builder, Some(&token)).build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
    }

    #[test]
    fn test_attach_bearer_without_token() {
        let builder = reqwest::Client::new().get("http://localhost/api/lots/");

        let request = attach_bearer(builder, None).build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_outbound_stage_reads_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let (client, _navigator) = test_client(&dir);

        client
            .storage()
            .store_token(&AccessToken::new("tok123".to_string()))
            .unwrap();

        let request = client
            .authorize(client.request(Method::GET, "/lots/"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/lots/");
    }

    #[test]
    fn test_outbound_stage_without_token_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let (client, _navigator) = test_client(&dir);

        let request = client
            .authorize(client.request(Method::GET, "/games/"))
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_expire_session_clears_slots_and_redirects_once() {
        let dir = tempfile::tempdir().unwrap();
        let (client, navigator) = test_client(&dir);

        client.storage().write(TOKEN_KEY, "tok123").unwrap();
        client.storage().write(SESSION_KEY, "{}").unwrap();

        client.expire_session();

        assert!(client.storage().read(TOKEN_KEY).unwrap().is_none());
        assert!(client.storage().read(SESSION_KEY).unwrap().is_none());
        assert_eq!(*navigator.calls.lock().unwrap(), vec![LOGIN_PATH]);
    }

    #[test]
    fn test_expire_session_with_empty_storage_never_errors() {
        let dir = tempfile::tempdir().unwrap();
        let (client, navigator) = test_client(&dir);

        client.expire_session();
        client.expire_session();

        assert_eq!(navigator.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_detail_string() {
        let status = StatusCode::UNAUTHORIZED;
        let body = r#"{"detail": "Could not validate credentials"}"#;
        assert_eq!(
            extract_detail(status, body),
            "Could not validate credentials"
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        let body = r#"{"detail": [{"msg": "field required", "type": "missing"}]}"#;
        let detail = extract_detail(status, body);
        assert!(detail.contains("field required"));
    }

    #[test]
    fn test_extract_detail_non_json_body_passes_through() {
        let status = StatusCode::BAD_GATEWAY;
        assert_eq!(extract_detail(status, "upstream down"), "upstream down");
    }

    #[test]
    fn test_extract_detail_empty_body_uses_status_reason() {
        let status = StatusCode::NOT_FOUND;
        assert_eq!(extract_detail(status, ""), "Not Found");
    }
}
