//! Integration tests for image upload forwarding.
//!
//! These tests require:
//! - The storefront running (cargo run -p luxora-storefront)
//! - Media host credentials in environment (MEDIA_HOST_UPLOAD_URL / MEDIA_HOST_API_KEY)
//!
//! Run with: cargo test -p luxora-integration-tests -- --ignored

use reqwest::{Client, StatusCode, multipart};
use serde_json::Value;

/// Base URL for the storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A tiny valid PNG (1x1 transparent pixel).
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

#[tokio::test]
#[ignore = "Requires running storefront and media host credentials"]
async fn upload_returns_hosted_url() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let part = multipart::Part::bytes(PIXEL_PNG.to_vec())
        .file_name("pixel.png")
        .mime_str("image/png")
        .expect("Invalid mime type");
    let form = multipart::Form::new().part("image", part);

    let resp = client
        .post(format!("{base_url}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post upload");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Upload response was not JSON");
    let url = body["imageUrl"].as_str().expect("imageUrl missing");
    assert!(url.starts_with("https://"));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn upload_without_image_field_is_rejected() {
    let client = Client::new();
    let base_url = storefront_base_url();

    // A multipart body with no `image` field
    let form = multipart::Form::new().text("caption", "no file here");

    let resp = client
        .post(format!("{base_url}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post upload");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Error response was not JSON");
    assert_eq!(body["message"], "No file uploaded");
}
