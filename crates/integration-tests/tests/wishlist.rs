//! Per-user wishlists.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use craft_bazaar_integration_tests::TestContext;

#[tokio::test]
async fn test_wishlist_requires_login() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.get("/api/wishlist", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        ctx.post("/api/wishlist", None, json!({ "productId": 1 }))
            .await
            .status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_add_is_idempotent_and_lists_products() {
    let ctx = TestContext::new().await;
    let token = ctx.customer_token("kavya@example.com").await;

    let first = ctx
        .post("/api/wishlist", Some(&token), json!({ "productId": 2 }))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let again = ctx
        .post("/api/wishlist", Some(&token), json!({ "productId": 2 }))
        .await;
    assert_eq!(again.body["id"], first.body["id"]);

    let resp = ctx.get("/api/wishlist", Some(&token)).await;
    let lines = resp.body.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["product"]["id"], 2);
}

#[tokio::test]
async fn test_wishlists_are_private() {
    let ctx = TestContext::new().await;
    let mine = ctx.customer_token("kavya@example.com").await;
    let theirs = ctx.customer_token("arjun@example.com").await;

    ctx.post("/api/wishlist", Some(&mine), json!({ "productId": 1 }))
        .await;

    let resp = ctx.get("/api/wishlist", Some(&theirs)).await;
    assert!(resp.body.as_array().unwrap().is_empty());

    let resp = ctx.delete("/api/wishlist/1", Some(&theirs)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let ctx = TestContext::new().await;
    let token = ctx.customer_token("kavya@example.com").await;

    let resp = ctx
        .post("/api/wishlist", Some(&token), json!({ "productId": 404 }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    let token = ctx.customer_token("kavya@example.com").await;
    for id in [1, 2, 3] {
        ctx.post("/api/wishlist", Some(&token), json!({ "productId": id }))
            .await;
    }

    let resp = ctx.delete("/api/wishlist/1", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = ctx.delete("/api/wishlist/1", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["message"], "Wishlist item not found");

    let resp = ctx.delete("/api/wishlist", Some(&token)).await;
    assert_eq!(resp.body["message"], "Wishlist cleared");
    let resp = ctx.get("/api/wishlist", Some(&token)).await;
    assert!(resp.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_product_drops_saved_rows() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let token = ctx.customer_token("kavya@example.com").await;

    ctx.post("/api/wishlist", Some(&token), json!({ "productId": 4 }))
        .await;
    ctx.post("/api/cart", None, json!({ "sessionId": "s1", "productId": 4 }))
        .await;

    let resp = ctx.delete("/api/products/4", Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx.get("/api/wishlist", Some(&token)).await;
    assert!(resp.body.as_array().unwrap().is_empty());
    let resp = ctx.get("/api/cart/s1", None).await;
    assert!(resp.body.as_array().unwrap().is_empty());
}
