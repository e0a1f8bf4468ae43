//! Integration tests for the Sweet Shop client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Login/logout against the mock API, token slot ordering
//! - `checkout` - Sequential purchases with partial failure
//! - `store_persistence` - On-disk persistence and rehydration
//!
//! The mock API is an in-process `axum` server on an ephemeral port that
//! speaks the same JSON the real Sweet Shop server does, and records the
//! `Authorization` headers it sees so tests can assert on them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use sweet_shop_client::{ApiClient, ClientConfig, MemoryStorage, StorageAdapter, Store, TokenSlot};

/// ID of a sweet the mock always sells successfully.
pub const OK_SWEET: &str = "s-ok";
/// ID of a sweet the mock always rejects with 409.
pub const CONFLICT_SWEET: &str = "s-conflict";
/// The bearer token the mock's login endpoint issues.
pub const ISSUED_TOKEN: &str = "mock-token-123";
/// A password the mock's auth endpoints reject with 401.
pub const BAD_PASSWORD: &str = "wrong-password";

/// What the mock server has observed so far.
#[derive(Debug, Default)]
pub struct Observed {
    /// `Authorization` header values per request, in arrival order.
    pub auth_headers: Vec<Option<String>>,
    /// Purchase requests as `(sweet_id, quantity)`.
    pub purchases: Vec<(String, u32)>,
}

#[derive(Clone)]
struct MockState {
    observed: Arc<Mutex<Observed>>,
}

/// A running in-process mock of the Sweet Shop API.
pub struct MockApi {
    /// Address the server is bound to.
    pub addr: SocketAddr,
    /// Shared record of what the server has seen.
    pub observed: Arc<Mutex<Observed>>,
}

impl MockApi {
    /// Spawn the mock server on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound (test-only code).
    pub async fn spawn() -> Self {
        let observed = Arc::new(Mutex::new(Observed::default()));
        let state = MockState {
            observed: Arc::clone(&observed),
        };

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(login))
            .route("/api/sweets", get(list_sweets))
            .route("/api/sweets/{id}", get(get_sweet))
            .route("/api/sweets/{id}/purchase", post(purchase))
            .route("/api/users/profile", get(profile))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, observed }
    }

    /// A client config pointing at this mock.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: format!("http://{}/api", self.addr)
                .parse()
                .expect("mock base url"),
            api_timeout: Duration::from_secs(5),
            data_dir: std::env::temp_dir().join("sweet-shop-tests-unused"),
        }
    }
}

/// Store + API client wired to in-memory storage and the given mock.
pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub token_slot: TokenSlot,
    pub store: Store,
    pub client: ApiClient,
}

impl TestContext {
    /// Build the full client stack against `api`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed (test-only code).
    pub fn new(api: &MockApi) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let token_slot = TokenSlot::new(Arc::clone(&storage) as Arc<dyn StorageAdapter>);
        let store = Store::new(
            Arc::clone(&storage) as Arc<dyn StorageAdapter>,
            token_slot.clone(),
        );
        let client = ApiClient::new(&api.config(), token_slot.clone()).expect("build api client");
        Self {
            storage,
            token_slot,
            store,
            client,
        }
    }
}

// =============================================================================
// Mock handlers
// =============================================================================

fn record_auth(state: &MockState, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.observed.lock().auth_headers.push(auth);
}

fn sweet_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Sweet {id}"),
        "category": "gummy",
        "price": "2.50",
        "quantity": 10
    })
}

async fn login(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_auth(&state, &headers);

    let password = body.get("password").and_then(Value::as_str).unwrap_or("");
    if password == BAD_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        )
            .into_response();
    }

    Json(json!({
        "user": {"id": "u-1", "email": "customer@example.com", "is_admin": false},
        "access_token": ISSUED_TOKEN
    }))
    .into_response()
}

async fn list_sweets(State(state): State<MockState>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers);
    Json(json!([sweet_json(OK_SWEET), sweet_json(CONFLICT_SWEET)]))
}

async fn get_sweet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Json<Value> {
    record_auth(&state, &headers);
    Json(sweet_json(&id))
}

async fn purchase(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    record_auth(&state, &headers);
    let quantity = body
        .get("quantity")
        .and_then(Value::as_u64)
        .unwrap_or(1);
    state
        .observed
        .lock()
        .purchases
        .push((id.clone(), u32::try_from(quantity).unwrap_or(0)));

    if id == CONFLICT_SWEET {
        return (
            StatusCode::CONFLICT,
            Json(json!({"detail": "Purchase conflict, please retry"})),
        )
            .into_response();
    }

    let mut sweet = sweet_json(&id);
    if let Some(obj) = sweet.as_object_mut() {
        obj.insert("quantity".to_string(), json!(10 - quantity));
    }
    Json(json!({
        "success": true,
        "message": "Purchase successful",
        "sweet": sweet,
        "quantity_purchased": quantity
    }))
    .into_response()
}

async fn profile(State(state): State<MockState>, headers: HeaderMap) -> Response {
    record_auth(&state, &headers);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ISSUED_TOKEN}"));

    if authorized {
        Json(json!({
            "id": "u-1",
            "email": "customer@example.com",
            "is_admin": false,
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        )
            .into_response()
    }
}
