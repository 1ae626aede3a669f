//! HTTP integration tests
//!
//! Drives the router with `tower::ServiceExt::oneshot`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{multipart_body, png_bytes, TestHarness};
use http_body_util::BodyExt;
use mintari::config::Config;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to get response body as string
async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_upload(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let (content_type, body) = multipart_body(field, file_name, data);
    Request::builder()
        .method("POST")
        .uri("/create")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let harness = TestHarness::new();
    let response = harness.router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_pages_render() {
    let harness = TestHarness::new();

    for (uri, needle) in [
        ("/", "Get started"),
        ("/create", r#"name="image""#),
        ("/mint", "Mint your NFT"),
    ] {
        let response = harness.router().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains(needle), "GET {} should contain {}", uri, needle);
    }
}

#[tokio::test]
async fn test_create_stylizes_and_records_upload() {
    let harness = TestHarness::new();

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;

    let records = harness.ctx.records.list_recent(10).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];

    assert_eq!(record.original_reference, "uploads/originals/A.png");
    assert_eq!(
        record.transformed_reference.as_deref(),
        Some("uploads/stylized/ghibli_A.png")
    );
    assert!(harness.media_root().join("uploads/originals/A.png").exists());
    assert!(harness.media_root().join("uploads/stylized/ghibli_A.png").exists());

    assert!(body.contains("/media/uploads/stylized/ghibli_A.png"));
    assert!(body.contains(&record.id.to_string()));
    // Publishing is disabled in the default harness.
    assert!(!body.contains("Storage locator"));
}

#[tokio::test]
async fn test_create_publishes_stylized_image() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_eq("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "url": "ipfs://bafyexample"
        })))
        .expect(1)
        .mount(&gateway)
        .await;

    let mut config = Config::default();
    config.publish.endpoint = format!("{}/upload", gateway.uri());
    config.publish.api_key = Some("test-key".into());
    let harness = TestHarness::with_config(config);

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("ipfs://bafyexample"));
    assert!(!body.contains("Upload failed"));
}

#[tokio::test]
async fn test_create_shows_upload_failed_when_gateway_errors() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway down"))
        .mount(&gateway)
        .await;

    let mut config = Config::default();
    config.publish.endpoint = format!("{}/upload", gateway.uri());
    config.publish.api_key = Some("test-key".into());
    let harness = TestHarness::with_config(config);

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();

    // The submission itself still succeeds.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("Upload failed"));
    assert!(body.contains("/media/uploads/stylized/ghibli_A.png"));

    let records = harness.ctx.records.list_recent(10).unwrap();
    assert!(records[0].is_transformed());
}

#[tokio::test]
async fn test_create_without_credential_shows_upload_failed() {
    let mut config = Config::default();
    config.publish.api_key = None;
    let harness = TestHarness::with_config(config);

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("Upload failed"));
}

#[tokio::test]
async fn test_create_without_image_field_rerenders_form() {
    let harness = TestHarness::new();

    let response = harness
        .router()
        .oneshot(post_upload("other", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains(r#"name="image""#));
    assert!(body.contains("Please choose an image"));

    assert!(harness.ctx.records.list_recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_empty_file_rerenders_form() {
    let harness = TestHarness::new();

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains(r#"name="image""#));
    assert!(harness.ctx.records.list_recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_undecodable_image_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", b"definitely not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_to_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "validation_error");

    // The record exists even though stylization failed.
    let records = harness.ctx.records.list_recent(10).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].transformed_reference.is_none());
}

#[tokio::test]
async fn test_repeated_file_names_do_not_collide() {
    let harness = TestHarness::new();

    for _ in 0..2 {
        let response = harness
            .router()
            .oneshot(post_upload("image", "A.png", &png_bytes(2, 2)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let records = harness.ctx.records.list_recent(10).unwrap();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].original_reference, records[1].original_reference);
    assert_ne!(records[0].transformed_reference, records[1].transformed_reference);
}

#[tokio::test]
async fn test_media_serves_stylized_file() {
    let harness = TestHarness::new();
    harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();

    let response = harness
        .router()
        .oneshot(get("/media/uploads/stylized/ghibli_A.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(image::load_from_memory(&bytes).is_ok());
}

#[tokio::test]
async fn test_api_lists_and_fetches_records() {
    let harness = TestHarness::new();
    harness
        .router()
        .oneshot(post_upload("image", "A.png", &png_bytes(4, 4)))
        .await
        .unwrap();

    let response = harness.router().oneshot(get("/api/records")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["original_url"], "/media/uploads/originals/A.png");
    assert_eq!(
        list[0]["transformed_url"],
        "/media/uploads/stylized/ghibli_A.png"
    );

    let id = list[0]["id"].as_str().unwrap();
    let response = harness
        .router()
        .oneshot(get(&format!("/api/records/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(record["id"], id);
}

#[tokio::test]
async fn test_api_record_errors() {
    let harness = TestHarness::new();

    let response = harness
        .router()
        .oneshot(get("/api/records/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = harness
        .router()
        .oneshot(get(&format!("/api/records/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(json["code"], "not_found");
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let mut config = Config::default();
    config.publish.enabled = false;
    config.server.max_upload_bytes = 64;
    let harness = TestHarness::with_config(config);

    let response = harness
        .router()
        .oneshot(post_upload("image", "A.png", &[7u8; 1024]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
