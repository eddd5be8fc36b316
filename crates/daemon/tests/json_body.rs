//! JSON body parsing in front of every posts route.

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use posts_daemon::http_server::body::JsonParser;
use posts_daemon::http_server::RouterSettings;

use support::{json_request, Call, TestApp};

#[tokio::test]
async fn test_empty_body_is_empty_object() {
    let app = TestApp::new();

    let response = app.send(json_request("POST", "/posts", "")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.controllers.calls(), vec![Call::Create(json!({}))]);
}

#[tokio::test]
async fn test_arrays_are_accepted() {
    let app = TestApp::new();

    app.send(json_request("POST", "/posts", "[1, 2]")).await;
    assert_eq!(app.controllers.calls(), vec![Call::Create(json!([1, 2]))]);
}

#[tokio::test]
async fn test_suffix_json_content_type() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("PUT")
        .uri("/upload/some-id")
        .header("content-type", "application/merge-patch+json; charset=utf-8")
        .body(Body::from(r#"{"alt":"x"}"#))
        .unwrap();
    app.send(request).await;

    assert_eq!(
        app.controllers.calls(),
        vec![Call::UpdateUpload("some-id".to_string(), json!({"alt": "x"}))]
    );
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = TestApp::new();

    let response = app
        .send(json_request("POST", "/posts", r#"{"description": "#))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.controllers.calls().is_empty());
}

#[tokio::test]
async fn test_scalars_are_rejected() {
    let app = TestApp::new();

    for body in [r#""text""#, "42", "null", "true"] {
        let response = app.send(json_request("POST", "/posts", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
    }
    assert!(app.controllers.calls().is_empty());
}

#[tokio::test]
async fn test_body_over_limit_is_413() {
    let settings = RouterSettings {
        json: JsonParser::new(16),
        ..Default::default()
    };
    let app = TestApp::with_settings(settings, tempfile::TempDir::new().unwrap());

    let response = app
        .send(json_request(
            "POST",
            "/posts",
            r#"{"description":"well past sixteen bytes"}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.controllers.calls().is_empty());
}

#[tokio::test]
async fn test_default_limit_is_100_kib() {
    let app = TestApp::new();

    let within = format!(r#"{{"description":"{}"}}"#, "a".repeat(100 * 1024 - 32));
    let response = app.send(json_request("POST", "/posts", &within)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let beyond = format!(r#"{{"description":"{}"}}"#, "a".repeat(100 * 1024));
    let response = app.send(json_request("POST", "/posts", &beyond)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_non_json_body_is_not_parsed() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/posts")
        .header("content-type", "text/plain")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.controllers.calls(), vec![Call::Create(json!({}))]);
}
