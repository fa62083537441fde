//! End-to-end tests for the Craft Bazaar API.
//!
//! Each test builds the full router over a freshly seeded store in a
//! temporary directory and drives it in-process with
//! `tower::ServiceExt::oneshot`; no server or network is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p craft-bazaar-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let ctx = TestContext::new().await;
//!     let resp = ctx.get("/health", None).await;
//!     assert_eq!(resp.status, StatusCode::OK);
//! }
//! ```

#![allow(clippy::missing_panics_doc)]

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use craft_bazaar_core::UserRole;
use craft_bazaar_storefront::config::StorefrontConfig;
use craft_bazaar_storefront::db::Database;
use craft_bazaar_storefront::routes;
use craft_bazaar_storefront::services::auth::AuthService;
use craft_bazaar_storefront::state::AppState;

/// Password used for every account the helpers create.
pub const TEST_PASSWORD: &str = "handmade-with-care";

/// A status code and parsed JSON body (`Value::Null` for empty or non-JSON
/// bodies).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub raw: Vec<u8>,
}

/// A seeded store and the router serving it.
pub struct TestContext {
    dir: TempDir,
    state: AppState,
    router: Router,
}

impl TestContext {
    /// Fresh seeded store in a new temporary directory.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let (state, router) = Self::serve(dir.path()).await;
        Self { dir, state, router }
    }

    /// Simulate a server restart: reload the store from disk with empty
    /// session state.
    pub async fn restart(self) -> Self {
        let Self { dir, state, router } = self;
        drop(router);
        drop(state);
        let (state, router) = Self::serve(dir.path()).await;
        Self { dir, state, router }
    }

    async fn serve(data_dir: &Path) -> (AppState, Router) {
        let config = StorefrontConfig {
            data_dir: data_dir.to_path_buf(),
            auth_rate_limit_per_minute: 10_000,
            ..StorefrontConfig::default()
        };
        let db = Database::open(data_dir).await.expect("open store");
        let state = AppState::new(config, db);
        let router = routes::router(state.clone());
        (state, router)
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);
        TestResponse { status, body, raw }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register a customer through the API and return their token.
    pub async fn customer_token(&self, email: &str) -> String {
        let resp = self
            .post(
                "/api/auth/register",
                None,
                json!({ "name": "Asha Verma", "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "register: {:?}", resp.body);
        session_id(&resp)
    }

    /// Create an admin account directly and log it in through the API.
    pub async fn admin_token(&self) -> String {
        AuthService::new(self.state.db(), self.state.sessions())
            .create_account("Store Admin", "admin@example.com", TEST_PASSWORD, UserRole::Admin)
            .await
            .expect("create admin");

        self.login("admin@example.com").await
    }

    /// Log an existing account in through the API and return its token.
    pub async fn login(&self, email: &str) -> String {
        let resp = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login: {:?}", resp.body);
        session_id(&resp)
    }
}

/// The `sessionId` of an auth response.
#[must_use]
pub fn session_id(resp: &TestResponse) -> String {
    resp.body["sessionId"]
        .as_str()
        .expect("sessionId in response")
        .to_owned()
}

/// A checkout payload for one unit of the seeded vase.
#[must_use]
pub fn order_payload(customer_name: &str) -> Value {
    json!({
        "customerName": customer_name,
        "customerEmail": "buyer@example.com",
        "customerPhone": "",
        "shippingAddress": "12 Craft Lane, Jaipur",
        "total": "2999",
        "items": [
            { "productId": 1, "name": "Traditional Ceramic Vase", "price": "2999", "quantity": 1, "sku": "POT001" }
        ]
    })
}
