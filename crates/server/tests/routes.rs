//! HTTP route integration tests
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use httpmock::prelude::*;
use plainpage_server::{AppState, ServerConfig, router};
use serde_json::Value;
use tower::ServiceExt;

const HELLO: &str = r#"<html><head><title>Hi</title></head><body><nav><a>Home</a></nav><article><p>Hello world.</p><p>Second paragraph.</p></article></body></html>"#;

fn test_config() -> ServerConfig {
    ServerConfig { api_keys: vec!["demo-key-123".to_string()], ..Default::default() }
}

fn app_with(config: &ServerConfig) -> Router {
    router(config, AppState::from_config(config))
}

fn app() -> Router {
    app_with(&test_config())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_key(uri: &str, key: &str) -> Request<Body> {
    Request::builder().uri(uri).header("X-API-Key", key).body(Body::empty()).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn serve_page(server: &MockServer, path: &str, status: u16, body: &[u8]) {
    let body = body.to_vec();
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(status).header("content-type", "text/html").body(&body);
    });
}

fn extract_uri(server: &MockServer, path: &str) -> String {
    format!("/extract?url={}", server.url(path))
}

#[tokio::test]
async fn test_index_banner() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Clean Article Extractor — ready");
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_extract_article() {
    let server = MockServer::start();
    serve_page(&server, "/hello", 200, HELLO.as_bytes());

    let response = app().oneshot(get_with_key(&extract_uri(&server, "/hello"), "demo-key-123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.headers()["x-ratelimit-limit"], "100");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "99");

    let body = body_string(response).await;
    assert_eq!(
        body,
        "{\n  \"title\": \"Hi\",\n  \"content\": \"Hello world.\\n\\nSecond paragraph.\"\n}\n"
    );
}

#[tokio::test]
async fn test_extract_with_query_key() {
    let server = MockServer::start();
    serve_page(&server, "/hello", 200, HELLO.as_bytes());

    let uri = format!("{}&key=demo-key-123", extract_uri(&server, "/hello"));
    let response = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_header_key_wins_over_query() {
    let server = MockServer::start();
    serve_page(&server, "/hello", 200, HELLO.as_bytes());

    let uri = format!("{}&key=wrong", extract_uri(&server, "/hello"));
    let response = app().oneshot(get_with_key(&uri, "demo-key-123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app().oneshot(get_with_key(&uri, "also-wrong")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_extract_includes_author() {
    let server = MockServer::start();
    let page = r#"<head><meta name="author" content="Ann"></head><body><main><p>Body.</p></main></body>"#;
    serve_page(&server, "/post", 200, page.as_bytes());

    let response = app().oneshot(get(&extract_uri(&server, "/post"))).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["author"], "Ann");
    assert_eq!(json["title"], "");
    assert_eq!(json["content"], "Body.");
}

#[tokio::test]
async fn test_invalid_api_key() {
    let response = app().oneshot(get_with_key("/extract?url=example.com", "nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"]["kind"], "invalid_api_key");
    assert_eq!(json["error"]["message"], "invalid api key");
}

#[tokio::test]
async fn test_anonymous_disabled() {
    let config = ServerConfig { allow_anonymous: false, ..test_config() };
    let response = app_with(&config).oneshot(get("/extract?url=example.com")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["kind"], "missing_api_key");
}

#[tokio::test]
async fn test_missing_url() {
    for uri in ["/extract", "/extract?url=", "/extract?url=%20%20"] {
        let response = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let json = body_json(response).await;
        assert_eq!(json["error"]["kind"], "missing_url");
        assert_eq!(json["error"]["message"], "missing url param");
    }
}

#[tokio::test]
async fn test_rate_limit() {
    let server = MockServer::start();
    serve_page(&server, "/hello", 200, HELLO.as_bytes());

    let config = ServerConfig { rate_limit: 2, ..test_config() };
    let app = app_with(&config);
    let uri = extract_uri(&server, "/hello");

    for remaining in ["1", "0"] {
        let response = app.clone().oneshot(get_with_key(&uri, "demo-key-123")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let response = app.clone().oneshot(get_with_key(&uri, "demo-key-123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!((1..=3600).contains(&retry_after));
    assert_eq!(body_json(response).await["error"]["kind"], "rate_limited");

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "anonymous callers have their own quota");
}

#[tokio::test]
async fn test_rate_limit_checked_before_url() {
    let config = ServerConfig { rate_limit: 0, ..test_config() };
    let response = app_with(&config).oneshot(get("/extract")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_upstream_error_status() {
    let server = MockServer::start();
    serve_page(&server, "/gone", 404, b"not found");

    let response = app().oneshot(get(&extract_uri(&server, "/gone"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"]["kind"], "upstream_status");
}

#[tokio::test]
async fn test_no_content_detected() {
    let server = MockServer::start();
    let page = std::fs::read("../../tests/fixtures/nav_only.html").unwrap();
    serve_page(&server, "/nav", 200, &page);

    let response = app().oneshot(get(&extract_uri(&server, "/nav"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"]["kind"], "no_content_detected");
}

#[tokio::test]
async fn test_binary_payload() {
    let server = MockServer::start();
    serve_page(&server, "/image.png", 200, &[0x89, b'P', b'N', b'G', 0x00, 0x00, 0xff, 0xfe]);

    let response = app().oneshot(get(&extract_uri(&server, "/image.png"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"]["kind"], "parse_failed");
}

#[tokio::test]
async fn test_invalid_url() {
    let response = app().oneshot(get("/extract?url=http%3A%2F%2F")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["kind"], "invalid_url");
}

#[tokio::test]
async fn test_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "static hello").unwrap();

    let config = ServerConfig { static_dir: Some(dir.path().to_path_buf()), ..test_config() };
    let response = app_with(&config).oneshot(get("/static/readme.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "static hello");

    let response = app().oneshot(get("/static/readme.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_ids_are_unique() {
    let first = app().oneshot(get("/")).await.unwrap();
    let second = app().oneshot(get("/")).await.unwrap();
    assert_ne!(first.headers()["x-request-id"], second.headers()["x-request-id"]);
}
