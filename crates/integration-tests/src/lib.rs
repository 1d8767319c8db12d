//! Integration-test support for LotMarket.
//!
//! Runs an in-process double of the marketplace API (axum on an ephemeral
//! port) and wires the real client stack against it. The double implements
//! just enough of the `/auth`, `/games`, `/lots`, and `/orders` surface to
//! exercise the session layer end to end:
//!
//! - `POST /auth/login` - password `secret` succeeds, anything else is 401
//! - `POST /auth/register` - username `taken` is 400, anything else succeeds
//! - `GET /auth/me` - requires the currently valid token
//! - `POST /auth/logout` - can be made to fail via [`ServerState::fail_logout`]
//! - `GET /games/` - public listing
//! - `GET /lots/`, `GET /orders/` - require the currently valid token
//!
//! Every request is recorded with its `Authorization` header so tests can
//! assert credential injection without touching the wire.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use lotmarket_client::config::ClientConfig;
use lotmarket_client::http::Navigate;
use lotmarket_client::{ApiClient, SessionStorage};

/// Token issued by the double on a successful login.
pub const LOGIN_TOKEN: &str = "tok123";

/// Token issued by the double on a successful registration.
pub const REGISTER_TOKEN: &str = "tok-reg";

/// A request observed by the server double.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
}

/// Mutable state shared between the double and the test body.
#[derive(Default)]
pub struct ServerState {
    valid_token: Mutex<Option<String>>,
    fail_logout: AtomicBool,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ServerState {
    /// Make `token` the one the protected endpoints accept.
    pub fn set_valid_token(&self, token: &str) {
        *self.valid_token.lock().expect("state lock poisoned") = Some(token.to_string());
    }

    /// Invalidate the current token, simulating server-side expiry.
    pub fn revoke_token(&self) {
        *self.valid_token.lock().expect("state lock poisoned") = None;
    }

    /// Make `POST /auth/logout` fail with a 500.
    pub fn fail_logout(&self) {
        self.fail_logout.store(true, Ordering::SeqCst);
    }

    /// All requests observed so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("state lock poisoned").clone()
    }

    /// Requests observed for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn record(&self, path: &str, headers: &HeaderMap) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests
            .lock()
            .expect("state lock poisoned")
            .push(RecordedRequest {
                path: path.to_string(),
                authorization,
            });
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let expected = self.valid_token.lock().expect("state lock poisoned");
        let Some(expected) = expected.as_deref() else {
            return false;
        };
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {expected}"))
    }
}

/// The in-process API double.
pub struct TestServer {
    /// Base address including the `/api` prefix.
    pub base_url: String,
    /// Shared state for steering and observing the double.
    pub state: Arc<ServerState>,
}

impl TestServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(ServerState::default());

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/auth/logout", post(logout))
            .route("/games/", get(list_games))
            .route("/lots/", get(list_lots).post(create_lot))
            .route("/orders/", get(list_orders).post(create_order))
            .route("/orders/{id}/confirm", post(confirm_order))
            .route("/orders/{id}/cancel", post(cancel_order))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server failed");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Client-side helpers
// ─────────────────────────────────────────────────────────────────────────

/// Navigator that records every forced redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Paths the pipeline forced navigation to, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().expect("navigator lock poisoned").clone()
    }
}

impl Navigate for RecordingNavigator {
    fn force_reload(&self, path: &str) {
        self.redirects
            .lock()
            .expect("navigator lock poisoned")
            .push(path.to_string());
    }
}

/// Build the real client stack against the double, with storage rooted in
/// `state_dir`.
#[must_use]
pub fn client_stack(base_url: &str, state_dir: &std::path::Path) -> (ApiClient, Arc<RecordingNavigator>) {
    let config = ClientConfig::new(base_url, state_dir.to_path_buf());
    let storage = SessionStorage::new(state_dir.to_path_buf());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(&config, storage, navigator.clone());
    (client, navigator)
}

// ─────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────

/// A full user payload as the server would return it.
#[must_use]
pub fn sample_user(username: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": format!("{username}@example.com"),
        "display_name": null,
        "avatar_url": null,
        "bio": null,
        "is_active": true,
        "is_verified": true,
        "role": "user",
        "rating": 4.5,
        "total_reviews": 3,
        "total_sales": 1,
        "total_purchases": 4,
        "created_at": "2025-01-15T10:00:00Z",
        "updated_at": null,
        "last_online": null
    })
}

fn sample_game() -> Value {
    json!({
        "id": 1,
        "name": "Stellar Siege",
        "slug": "stellar-siege",
        "total_lots": 12,
        "is_popular": true,
        "is_active": true,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

fn sample_lot() -> Value {
    json!({
        "id": 5,
        "title": "Gold, 100k",
        "description": "Fast delivery",
        "price": 19.99,
        "seller_id": 2,
        "game_id": 1,
        "category_id": 3,
        "status": "active",
        "is_auto_delivery": true,
        "views": 10,
        "favorites": 1,
        "created_at": "2025-03-01T12:00:00Z"
    })
}

fn sample_order() -> Value {
    json!({
        "id": 9,
        "order_number": "LM-2025-0009",
        "buyer_id": 1,
        "seller_id": 2,
        "lot_id": 5,
        "price": 19.99,
        "status": "pending",
        "created_at": "2025-03-02T08:30:00Z"
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────

async fn login(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/auth/login", &headers);

    if body.get("password").and_then(Value::as_str) == Some("secret") {
        state.set_valid_token(LOGIN_TOKEN);
        let username = body
            .get("email")
            .and_then(Value::as_str)
            .and_then(|e| e.split('@').next())
            .unwrap_or("user");
        (
            StatusCode::OK,
            Json(json!({
                "access_token": LOGIN_TOKEN,
                "token_type": "bearer",
                "user": sample_user(username),
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect username or password"})),
        )
            .into_response()
    }
}

async fn register(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/auth/register", &headers);

    let username = body
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or("user");
    if username == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Username already registered"})),
        )
            .into_response();
    }

    state.set_valid_token(REGISTER_TOKEN);
    (
        StatusCode::CREATED,
        Json(json!({
            "access_token": REGISTER_TOKEN,
            "token_type": "bearer",
            "user": sample_user(username),
        })),
    )
        .into_response()
}

async fn me(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.record("/auth/me", &headers);

    if state.is_authorized(&headers) {
        (StatusCode::OK, Json(sample_user("alice"))).into_response()
    } else {
        unauthorized()
    }
}

async fn logout(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.record("/auth/logout", &headers);

    if state.fail_logout.load(Ordering::SeqCst) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "logout backend unavailable"})),
        )
            .into_response()
    } else {
        (StatusCode::OK, Json(json!({"message": "Logged out"}))).into_response()
    }
}

async fn list_games(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.record("/games/", &headers);
    (StatusCode::OK, Json(json!([sample_game()]))).into_response()
}

async fn list_lots(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.record("/lots/", &headers);

    if state.is_authorized(&headers) {
        (StatusCode::OK, Json(json!([sample_lot()]))).into_response()
    } else {
        unauthorized()
    }
}

async fn create_lot(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/lots/", &headers);

    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let mut lot = sample_lot();
    for field in ["title", "description", "price", "game_id", "category_id"] {
        if let Some(value) = body.get(field) {
            lot[field] = value.clone();
        }
    }
    lot["id"] = json!(100);
    (StatusCode::CREATED, Json(lot)).into_response()
}

async fn create_order(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/orders/", &headers);

    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let mut order = sample_order();
    if let Some(lot_id) = body.get("lot_id") {
        order["lot_id"] = lot_id.clone();
    }
    order["id"] = json!(10);
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn confirm_order(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/orders/{id}/confirm"), &headers);

    if state.is_authorized(&headers) {
        (StatusCode::OK, Json(json!({"message": "Order confirmed"}))).into_response()
    } else {
        unauthorized()
    }
}

async fn cancel_order(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/orders/{id}/cancel"), &headers);

    if state.is_authorized(&headers) {
        (StatusCode::OK, Json(json!({"message": "Order cancelled"}))).into_response()
    } else {
        unauthorized()
    }
}

async fn list_orders(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    state.record("/orders/", &headers);

    if state.is_authorized(&headers) {
        (
            StatusCode::OK,
            Json(json!({
                "items": [sample_order()],
                "total": 1,
                "skip": 0,
                "limit": 20
            })),
        )
            .into_response()
    } else {
        unauthorized()
    }
}
