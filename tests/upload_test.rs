//! End-to-end router tests: multipart upload, error surface, health, and
//! the static landing page.

mod common;

use std::fs;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use lopdf::Document;
use tempfile::TempDir;
use tower::ServiceExt;

use pagecrop_server::config::Config;
use pagecrop_server::routes::build_router;
use pagecrop_server::state::AppState;

const BOUNDARY: &str = "----pagecrop-test-boundary";

struct TestContext {
    app: axum::Router,
    _root: TempDir,
    upload_dir: std::path::PathBuf,
    output_dir: std::path::PathBuf,
}

async fn test_context() -> TestContext {
    let root = TempDir::new().unwrap();
    let upload_dir = root.path().join("uploads");
    let output_dir = root.path().join("cropped_pdfs");
    let public_dir = root.path().join("public");
    fs::create_dir_all(&public_dir).unwrap();
    fs::write(public_dir.join("index.html"), "<h1>PDF Cropper</h1>").unwrap();

    let mut config = Config::default();
    config.storage.upload_dir = upload_dir.clone();
    config.storage.output_dir = output_dir.clone();
    config.server.public_dir = public_dir;

    let state = AppState::new(config).await.unwrap();
    TestContext {
        app: build_router(state),
        _root: root,
        upload_dir,
        output_dir,
    }
}

fn multipart_request(field_name: &str, file_name: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn upload_returns_cropped_document() {
    let ctx = test_context().await;
    let mut doc = common::build_pdf(&[(1000.0, 1400.0), (1000.0, 1400.0), (1000.0, 1400.0)]);
    let pdf = common::pdf_bytes(&mut doc);

    let response = ctx
        .app
        .clone()
        .oneshot(multipart_request("pdfFile", "report.pdf", &pdf))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("cropped_"));

    let bytes = body_bytes(response).await;
    let cropped = Document::load_mem(&bytes).unwrap();
    assert_eq!(cropped.get_pages().len(), 3);
    for rect in common::crop_boxes(&cropped) {
        assert!((rect[0] - 67.0).abs() < 0.01);
        assert!((rect[1] - 555.0).abs() < 0.01);
        assert!((rect[2] - 668.0).abs() < 0.01);
        assert!((rect[3] - 770.0).abs() < 0.01);
    }

    // The staged source and the cropped output both land in their
    // directories, named for the sweeper to manage.
    assert_eq!(fs::read_dir(&ctx.upload_dir).unwrap().count(), 1);
    assert_eq!(fs::read_dir(&ctx.output_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn unparsable_upload_is_a_plain_text_500_with_no_output() {
    let ctx = test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(multipart_request("pdfFile", "garbage.pdf", b"not a pdf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = body_bytes(response).await;
    assert_eq!(bytes, b"Error cropping PDF");
    assert_eq!(fs::read_dir(&ctx.output_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_field_is_a_400() {
    let ctx = test_context().await;
    let mut doc = common::build_pdf(&[(1000.0, 1400.0)]);
    let pdf = common::pdf_bytes(&mut doc);

    let response = ctx
        .app
        .clone()
        .oneshot(multipart_request("file", "report.pdf", &pdf))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let ctx = test_context().await;
    let server = axum_test::TestServer::new(ctx.app.clone()).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("service").is_none());
}

#[tokio::test]
async fn root_serves_the_landing_page() {
    let ctx = test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;
    assert!(String::from_utf8_lossy(&bytes).contains("PDF Cropper"));
}
