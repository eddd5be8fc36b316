use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Extension, Router};

use super::body::{self, JsonBody, JsonParser};
use super::cors::{self, CorsPolicy};
use super::upload::{self, DiskStorage, SingleUpload, Upload};

/// Multipart field the upload route takes its file from
pub const UPLOAD_FIELD: &str = "imagem";

/// The behaviour behind the posts routes, supplied by the caller of
///  [`configure`].
#[async_trait]
pub trait Controllers: Send + Sync + 'static {
    /// `GET /posts`
    async fn list(&self) -> Response;

    /// `POST /posts`
    async fn create(&self, body: JsonBody) -> Response;

    /// `POST /upload`, after the upload middleware ran. `upload.file` is
    ///  `None` when the request was not multipart or carried no file.
    async fn handle_upload(&self, upload: Upload) -> Response;

    /// `PUT /upload/:id`
    async fn update_upload(&self, id: String, body: JsonBody) -> Response;
}

pub type SharedControllers = Arc<dyn Controllers>;

/// Immutable middleware configuration for [`configure`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub json: JsonParser,
    pub cors: CorsPolicy,
    pub upload: SingleUpload,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            json: JsonParser::default(),
            cors: CorsPolicy::default(),
            upload: SingleUpload::new(UPLOAD_FIELD, DiskStorage::default()),
        }
    }
}

/// Register the posts routes on `app`.
///
/// The JSON body parser runs first on every request, then the CORS policy,
///  then the matched route. Only `POST /upload` carries the upload step.
pub fn configure(app: Router, controllers: SharedControllers, settings: &RouterSettings) -> Router {
    let routes = Router::new()
        .route("/posts", get(list).post(create))
        .route(
            "/upload",
            post(handle_upload).route_layer(middleware::from_fn_with_state(
                settings.upload.clone(),
                upload::single_file,
            )),
        )
        // TODO: decide whether updates should accept a replacement image
        //  through the upload step as well
        .route("/upload/:id", put(update_upload))
        .with_state(controllers);

    app.merge(routes)
        .layer(settings.cors.layer())
        .layer(middleware::from_fn_with_state(
            settings.cors.clone(),
            cors::preflight_status,
        ))
        .layer(middleware::from_fn_with_state(
            settings.json,
            body::parse_json,
        ))
}

async fn list(State(controllers): State<SharedControllers>) -> Response {
    controllers.list().await
}

async fn create(State(controllers): State<SharedControllers>, body: JsonBody) -> Response {
    controllers.create(body).await
}

async fn handle_upload(
    State(controllers): State<SharedControllers>,
    upload: Option<Extension<Upload>>,
) -> Response {
    let upload = upload.map(|Extension(upload)| upload).unwrap_or_default();
    controllers.handle_upload(upload).await
}

async fn update_upload(
    State(controllers): State<SharedControllers>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Response {
    controllers.update_upload(id, body).await
}
