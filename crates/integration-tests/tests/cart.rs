//! Cart API keyed by client session id.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use craft_bazaar_integration_tests::TestContext;

#[tokio::test]
async fn test_repeated_add_merges_quantity() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post("/api/cart", None, json!({ "sessionId": "s1", "productId": 1, "quantity": 2 }))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let first_id = resp.body["id"].clone();

    let resp = ctx
        .post("/api/cart", None, json!({ "sessionId": "s1", "productId": 1, "quantity": 3 }))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["id"], first_id);
    assert_eq!(resp.body["quantity"], 5);

    let resp = ctx.get("/api/cart/s1", None).await;
    let lines = resp.body.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(lines[0]["product"]["sku"], "POT001");
}

#[tokio::test]
async fn test_quantity_defaults_to_one_and_sessions_are_separate() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post("/api/cart", None, json!({ "sessionId": "a", "productId": 2 }))
        .await;
    assert_eq!(resp.body["quantity"], 1);

    let resp = ctx.get("/api/cart/b", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_unknown_product_fails() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post("/api/cart", None, json!({ "sessionId": "s1", "productId": 99 }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["message"].is_string());
}

#[tokio::test]
async fn test_update_quantity() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart", None, json!({ "sessionId": "s1", "productId": 3 }))
        .await;

    let resp = ctx.put("/api/cart/s1/3", None, json!({ "quantity": 4 })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["quantity"], 4);

    let resp = ctx.put("/api/cart/s1/3", None, json!({ "quantity": -1 })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = ctx.put("/api/cart/s1/3", None, json!({ "quantity": 1.5 })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = ctx.put("/api/cart/s1/3", None, json!({ "quantity": 0 })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Item removed from cart");

    let resp = ctx.get("/api/cart/s1", None).await;
    assert!(resp.body.as_array().unwrap().is_empty());

    let resp = ctx.put("/api/cart/s1/3", None, json!({ "quantity": 2 })).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    ctx.post("/api/cart", None, json!({ "sessionId": "s1", "productId": 1 }))
        .await;
    ctx.post("/api/cart", None, json!({ "sessionId": "s1", "productId": 2 }))
        .await;

    let resp = ctx.delete("/api/cart/s1/1", None).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx.delete("/api/cart/s1/1", None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["message"], "Cart item not found");

    let resp = ctx.delete("/api/cart/s1", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Cart cleared");

    let resp = ctx.get("/api/cart/s1", None).await;
    assert!(resp.body.as_array().unwrap().is_empty());

    // Clearing an empty cart is fine
    let resp = ctx.delete("/api/cart/s1", None).await;
    assert_eq!(resp.status, StatusCode::OK);
}
