//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use posts_daemon::http_server::body::{JsonBody, JsonParser};
use posts_daemon::http_server::cors::CorsPolicy;
use posts_daemon::http_server::upload::{DiskStorage, SingleUpload, Upload};
use posts_daemon::http_server::{configure, Controllers, RouterSettings, UPLOAD_FIELD};

pub const BOUNDARY: &str = "posts-test-boundary";

/// A controller call as seen by [`RecordingControllers`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(Value),
    HandleUpload(Upload),
    UpdateUpload(String, Value),
}

/// Controllers that record each call and answer with a fixed body naming
///  the controller that ran.
#[derive(Debug, Clone, Default)]
pub struct RecordingControllers {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingControllers {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Controllers for RecordingControllers {
    async fn list(&self) -> Response {
        self.record(Call::List);
        Json(json!({"controller": "list"})).into_response()
    }

    async fn create(&self, body: JsonBody) -> Response {
        self.record(Call::Create(body.0));
        (StatusCode::CREATED, Json(json!({"controller": "create"}))).into_response()
    }

    async fn handle_upload(&self, upload: Upload) -> Response {
        self.record(Call::HandleUpload(upload));
        (StatusCode::CREATED, Json(json!({"controller": "handle_upload"}))).into_response()
    }

    async fn update_upload(&self, id: String, body: JsonBody) -> Response {
        self.record(Call::UpdateUpload(id, body.0));
        Json(json!({"controller": "update_upload"})).into_response()
    }
}

/// A router over recording controllers that stores uploads in a fresh
///  temporary directory.
pub struct TestApp {
    pub router: Router,
    pub controllers: RecordingControllers,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cors(CorsPolicy::default())
    }

    pub fn with_cors(cors: CorsPolicy) -> Self {
        let upload_dir = TempDir::new().unwrap();
        let settings = RouterSettings {
            json: JsonParser::default(),
            cors,
            upload: SingleUpload::new(UPLOAD_FIELD, DiskStorage::new(upload_dir.path())),
        };
        Self::with_settings(settings, upload_dir)
    }

    pub fn with_settings(settings: RouterSettings, upload_dir: TempDir) -> Self {
        let controllers = RecordingControllers::default();
        let router = configure(Router::new(), Arc::new(controllers.clone()), &settings);
        Self {
            router,
            controllers,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// One part of a multipart body.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                field,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
