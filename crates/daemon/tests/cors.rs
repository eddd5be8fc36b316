//! CORS policy applied to the posts routes.

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use posts_daemon::http_server::cors::CorsPolicy;

use support::{Call, TestApp};

const ALLOWED: &str = "http://localhost:8000";

fn from_origin(method: &str, uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

fn preflight(uri: &str, origin: &str, method: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, method)
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allowed_origin_is_echoed() {
    let app = TestApp::new();

    let response = app.send(from_origin("GET", "/posts", ALLOWED)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOWED
    );
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_allow_header() {
    let app = TestApp::new();

    let response = app
        .send(from_origin("GET", "/posts", "http://evil.example"))
        .await;
    // The request still reaches the controller; the browser enforces
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
    assert_eq!(app.controllers.calls(), vec![Call::List]);
}

#[tokio::test]
async fn test_preflight_answers_200_without_controller() {
    let app = TestApp::new();

    let response = app.send(preflight("/posts", ALLOWED, "POST")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOWED
    );

    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    for method in ["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "content-type"
    );
    assert!(app.controllers.calls().is_empty());
}

#[tokio::test]
async fn test_preflight_status_is_configurable() {
    let policy = CorsPolicy::new(ALLOWED)
        .unwrap()
        .with_preflight_status(StatusCode::NO_CONTENT);
    let app = TestApp::with_cors(policy);

    let response = app.send(preflight("/upload", ALLOWED, "POST")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_custom_origin() {
    let app = TestApp::with_cors(CorsPolicy::new("https://blog.example").unwrap());

    let response = app
        .send(from_origin("GET", "/posts", "https://blog.example"))
        .await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://blog.example"
    );

    let response = app.send(from_origin("GET", "/posts", ALLOWED)).await;
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_upload_route_sits_under_the_same_policy() {
    let app = TestApp::new();

    let response = app
        .send(from_origin("POST", "/upload", "http://evil.example"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());

    let response = app.send(from_origin("POST", "/upload", ALLOWED)).await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOWED
    );
    assert_eq!(app.controllers.calls().len(), 2);

    let response = app.send(preflight("/upload", ALLOWED, "POST")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.controllers.calls().len(), 2);
}
