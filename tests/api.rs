//! Integration tests for the pagebin HTTP API, driven straight through
//! the router with a temp-dir sqlite database and blob directory.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pagebin::commands::serve::router;
use pagebin::{App, Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "pagebin-test-boundary";

fn test_config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.database.url = format!(
        "sqlite://{}?mode=rwc",
        temp.path().join("test.db").display()
    );
    config.storage.file.dir = temp.path().join("blobs");
    config
}

async fn setup() -> (Router, TempDir) {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let app = App::new(config).await.unwrap();
    (router(app), temp)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn multipart_upload(file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn create_then_read_roundtrip() {
    let (app, _temp) = setup().await;

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/create",
        json!({ "content": "hello world", "files": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    assert_eq!(id.len(), 6);
    assert!(created["url"].as_str().unwrap().ends_with(id));

    let (status, page) = send_get(&app, &format!("/api/page/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["content"], "hello world");
    assert_eq!(page["files"], json!([]));

    // the share link serves the same data
    let (status, aliased) = send_get(&app, &format!("/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(aliased, page);
}

#[tokio::test]
async fn create_with_files_only_is_accepted() {
    let (app, _temp) = setup().await;

    let files = json!([
        { "name": "a.txt", "url": "http://localhost:3000/files/0-a.txt", "size": 1 }
    ]);
    let (status, created) = send_json(
        &app,
        "POST",
        "/api/create",
        json!({ "content": "", "files": files }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (_, page) = send_get(&app, &format!("/api/page/{id}")).await;
    assert_eq!(page["files"], files);
}

#[tokio::test]
async fn empty_create_is_rejected() {
    let (app, _temp) = setup().await;

    let (status, body) = send_json(&app, "POST", "/api/create", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let (app, _temp) = setup().await;

    let (status, body) = send_get(&app, "/api/page/zzzzzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn expired_page_is_not_found() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    // zero-day TTL: pages expire the moment they are created
    config.limits.expiration_days = 0;
    let app = router(App::new(config).await.unwrap());

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/create",
        json!({ "content": "ephemeral" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send_get(&app, &format!("/api/page/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the update path enforces the same predicate
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/page/{id}"),
        json!({ "content": "too late" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_content_and_files() {
    let (app, _temp) = setup().await;

    let (_, created) = send_json(
        &app,
        "POST",
        "/api/create",
        json!({ "content": "version one" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let files = json!([
        { "name": "b.txt", "url": "http://localhost:3000/files/0-b.txt", "size": 2 }
    ]);
    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/api/page/{id}"),
        json!({ "content": "version two", "files": files }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["success"], json!(true));

    let (_, page) = send_get(&app, &format!("/api/page/{id}")).await;
    assert_eq!(page["content"], "version two");
    assert_eq!(page["files"], files);
}

#[tokio::test]
async fn update_of_unknown_page_is_not_found() {
    let (app, _temp) = setup().await;

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/page/zzzzzz",
        json!({ "content": "anything" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_roundtrip() {
    let (app, _temp) = setup().await;

    let (status, uploaded) = send(&app, multipart_upload("hello.txt", b"hello upload")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["name"], "hello.txt");
    assert_eq!(uploaded["size"], json!(12));

    let url = uploaded["url"].as_str().unwrap();
    let path = url.strip_prefix("http://localhost:3000").unwrap();
    assert!(path.starts_with("/files/"));

    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&bytes[..], b"hello upload");
}

#[tokio::test]
async fn upload_without_a_file_is_rejected() {
    let (app, _temp) = setup().await;

    // multipart body with no fields at all
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(format!("--{BOUNDARY}--\r\n")))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_a_file_name_is_rejected() {
    let (app, _temp) = setup().await;

    let mut body = Vec::new();
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(b"data");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let (app, _temp) = setup().await;

    let (_, first) = send_json(&app, "POST", "/api/create", json!({ "content": "one" })).await;
    let (_, second) = send_json(&app, "POST", "/api/create", json!({ "content": "two" })).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn purge_deletes_expired_pages_and_their_blobs() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.limits.expiration_days = 0;

    let mut app = App::new(config).await.unwrap();
    let routes = router(app.clone());

    let (_, uploaded) = send(&routes, multipart_upload("doomed.txt", b"doomed")).await;
    let (_, created) = send_json(
        &routes,
        "POST",
        "/api/create",
        json!({ "content": "", "files": [uploaded.clone()] }),
    )
    .await;
    assert!(created["id"].as_str().is_some());

    let purged = pagebin::controllers::page::purge_expired(&mut app)
        .await
        .unwrap();
    assert_eq!(purged, 1);

    // the blob is gone along with the page
    let url = uploaded["url"].as_str().unwrap();
    let path = url.strip_prefix("http://localhost:3000").unwrap();
    let (status, _) = send_get(&routes, path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
