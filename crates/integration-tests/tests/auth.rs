//! Registration, login and bearer-token sessions.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use craft_bazaar_integration_tests::{TEST_PASSWORD, TestContext, session_id};

#[tokio::test]
async fn test_register_returns_profile_and_token() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Kavya Rao", "email": "Kavya@Example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["user"]["name"], "Kavya Rao");
    assert_eq!(resp.body["user"]["role"], "customer");
    assert!(resp.body["user"].get("passwordHash").is_none());
    assert!(!session_id(&resp).is_empty());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_case_insensitively() {
    let ctx = TestContext::new().await;
    ctx.customer_token("kavya@example.com").await;

    let resp = ctx
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Kavya", "email": "KAVYA@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "", "email": "nope", "password": "short" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Validation error");
    assert!(resp.body["errors"]["password"].is_array());
    assert!(resp.body["errors"]["name"].is_array());
}

#[tokio::test]
async fn test_login_with_wrong_password_or_unknown_email() {
    let ctx = TestContext::new().await;
    ctx.customer_token("kavya@example.com").await;

    for body in [
        json!({ "email": "kavya@example.com", "password": "wrong-password" }),
        json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
    ] {
        let resp = ctx.post("/api/auth/login", None, body).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_me_and_logout() {
    let ctx = TestContext::new().await;
    let token = ctx.customer_token("kavya@example.com").await;

    let resp = ctx.get("/api/auth/me", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["email"], "kavya@example.com");
    assert_eq!(resp.body["sessionId"], token.as_str());

    let resp = ctx.post("/api/auth/logout", Some(&token), json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Logged out successfully");

    let resp = ctx.get("/api/auth/me", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_without_or_with_bogus_token() {
    let ctx = TestContext::new().await;

    assert_eq!(
        ctx.get("/api/auth/me", None).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        ctx.get("/api/auth/me", Some("not-a-session")).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_login_issues_independent_sessions() {
    let ctx = TestContext::new().await;
    let first = ctx.customer_token("kavya@example.com").await;

    let resp = ctx
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "kavya@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    let second = session_id(&resp);
    assert_ne!(first, second);

    ctx.post("/api/auth/logout", Some(&first), json!({})).await;
    assert_eq!(
        ctx.get("/api/auth/me", Some(&second)).await.status,
        StatusCode::OK
    );
}
