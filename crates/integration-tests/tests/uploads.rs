//! Admin image uploads and static serving.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;

use craft_bazaar_integration_tests::{TestContext, TestResponse};

const BOUNDARY: &str = "craft-bazaar-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

async fn upload(
    ctx: &TestContext,
    uri: &str,
    token: Option<&str>,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> TestResponse {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method(Method::POST).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    ctx.send(builder.body(Body::from(body)).unwrap()).await
}

#[tokio::test]
async fn test_upload_serve_and_delete() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let resp = upload(
        &ctx,
        "/api/upload-image",
        Some(&admin),
        "image",
        "terracotta vase.png",
        "image/png",
        PNG_BYTES,
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let url = resp.body["imageUrl"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/images/products/"));
    assert!(url.ends_with(".png"));
    assert_eq!(resp.body["originalName"], "terracotta vase.png");
    assert_eq!(resp.body["size"], PNG_BYTES.len());
    assert_eq!(resp.body["mimetype"], "image/png");

    let served = ctx.get(&url, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.raw, PNG_BYTES);

    let resp = ctx
        .request(
            Method::DELETE,
            "/api/delete-image",
            Some(&admin),
            Some(json!({ "imageUrl": url })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Image deleted successfully");

    assert_eq!(ctx.get(&url, None).await.status, StatusCode::NOT_FOUND);

    let resp = ctx
        .request(
            Method::DELETE,
            "/api/delete-image",
            Some(&admin),
            Some(json!({ "imageUrl": url })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_and_homepage_buckets() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let resp = upload(
        &ctx,
        "/api/upload-category-image",
        Some(&admin),
        "image",
        "thumb.webp",
        "image/webp",
        PNG_BYTES,
    )
    .await;
    assert!(resp.body["imageUrl"].as_str().unwrap().starts_with("/images/categories/"));

    let resp = upload(
        &ctx,
        "/api/upload-homepage-image",
        Some(&admin),
        "image",
        "hero.jpg",
        "image/jpeg",
        PNG_BYTES,
    )
    .await;
    assert!(
        resp.body["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("/images/homepage/hero/")
    );
    assert!(resp.body["filename"].as_str().unwrap().starts_with("hero_banner_"));
}

#[tokio::test]
async fn test_upload_rejections() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;
    let customer = ctx.customer_token("kavya@example.com").await;

    let resp = upload(
        &ctx,
        "/api/upload-image",
        Some(&admin),
        "image",
        "notes.txt",
        "text/plain",
        b"hello",
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = upload(
        &ctx,
        "/api/upload-image",
        Some(&admin),
        "photo",
        "vase.png",
        "image/png",
        PNG_BYTES,
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "No image file uploaded");

    let resp = upload(
        &ctx,
        "/api/upload-image",
        Some(&customer),
        "image",
        "vase.png",
        "image/png",
        PNG_BYTES,
    )
    .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = upload(&ctx, "/api/upload-image", None, "image", "vase.png", "image/png", PNG_BYTES).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_refuses_paths_outside_images() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    for url in ["/images/../database.json", "/etc/passwd", ""] {
        let resp = ctx
            .request(
                Method::DELETE,
                "/api/delete-image",
                Some(&admin),
                Some(json!({ "imageUrl": url })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{url}");
    }
    assert!(ctx.state().db().path().is_file());
}
