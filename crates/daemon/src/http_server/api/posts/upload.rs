use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{NewPost, Post, PostStore, PostStoreError};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::routes::UPLOAD_FIELD;
use crate::http_server::upload::Upload;

/// Client-side upload: the file is read by the caller, not streamed.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub data: Vec<u8>,
    pub description: Option<String>,
    pub alt: Option<String>,
}

pub async fn handler<S: PostStore>(
    store: &S,
    mut upload: Upload,
) -> Result<impl IntoResponse, HandleUploadError> {
    let file = upload.file.take().ok_or(HandleUploadError::MissingFile)?;

    let new = NewPost {
        description: upload.fields.remove("description").unwrap_or_default(),
        image_url: format!("/{}", file.file_name),
        alt: upload.fields.remove("alt").unwrap_or_default(),
    };

    let post = store.insert(new).await?;
    tracing::info!(
        "UPLOAD: created post {} for {} ({} bytes)",
        post.id,
        file.path.display(),
        file.size
    );

    Ok((http::StatusCode::CREATED, Json(post)))
}

#[derive(Debug, thiserror::Error)]
pub enum HandleUploadError {
    #[error("No file was uploaded")]
    MissingFile,
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<PostStoreError<T>> for HandleUploadError {
    fn from(e: PostStoreError<T>) -> Self {
        HandleUploadError::Store(e.to_string())
    }
}

impl IntoResponse for HandleUploadError {
    fn into_response(self) -> Response {
        match self {
            HandleUploadError::MissingFile => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: expected a file in field '{}'", UPLOAD_FIELD),
            )
                .into_response(),
            HandleUploadError::Store(msg) => {
                tracing::error!("UPLOAD ERROR: {}", msg);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

impl ApiRequest for UploadRequest {
    type Response = Post;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/upload")?;

        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        let part = Part::bytes(self.data)
            .file_name(self.file_name)
            .mime_str(mime.as_ref())?;

        let mut form = Form::new().part(UPLOAD_FIELD, part);
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        if let Some(alt) = self.alt {
            form = form.text("alt", alt);
        }

        Ok(client.post(full_url).multipart(form))
    }
}
