//! Integration tests for Dukkan.
//!
//! # Running Tests
//!
//! ```bash
//! # Engine and in-process HTTP tests
//! cargo test -p dukkan-integration-tests
//!
//! # Live-server tests (needs a migrated database and a running dashboard)
//! cargo run -p dukkan-cli -- migrate
//! cargo run -p dukkan-dashboard &
//! cargo test -p dukkan-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `delivery_engine` - Properties of the zone engine across modules
//! - `dashboard_delivery` - HTTP flows against the dashboard router

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dukkan_core::StoreId;
use dukkan_dashboard::config::DashboardConfig;
use dukkan_dashboard::db::MemoryDeliveryStore;
use dukkan_dashboard::routes;
use dukkan_dashboard::state::AppState;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Base URL for a running dashboard (configurable via environment).
#[must_use]
pub fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}

/// The dashboard router over an in-memory store, with in-memory sessions.
#[must_use]
pub fn in_process_app(store: &MemoryDeliveryStore) -> Router {
    let state = AppState::with_store(
        DashboardConfig::local("postgres://localhost/unused"),
        Arc::new(store.clone()),
    );
    routes::routes()
        .with_state(state)
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

/// A store with one seeded record.
pub async fn seeded_store(store_id: StoreId, slug: &str, raw: Option<Value>) -> MemoryDeliveryStore {
    let store = MemoryDeliveryStore::new();
    store.insert(store_id, slug, raw).await;
    store
}

/// Minimal cookie-carrying client for in-process requests.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

/// Status and parsed JSON body (`Value::Null` when the body is not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestClient {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Forget the session, as a different browser would.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    /// Send a request, keeping any session cookie the server sets.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&mut self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.app.clone().oneshot(request).await.expect("router is infallible");
        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_owned());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}
