use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

mod storage;

pub use storage::{DiskStorage, FileInfo, StorageStrategy, DEFAULT_UPLOAD_DIR};

/// A file written to disk by [`single_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub field_name: String,
    pub original_name: String,
    pub content_type: String,
    pub destination: PathBuf,
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of the upload step, attached to the request for the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    pub file: Option<UploadedFile>,
    /// Text parts of the multipart form
    pub fields: HashMap<String, String>,
}

/// Accepts exactly one file, under one field name, and hands it to a
///  storage strategy.
#[derive(Clone)]
pub struct SingleUpload {
    field: String,
    storage: Arc<dyn StorageStrategy>,
}

impl std::fmt::Debug for SingleUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleUpload")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl SingleUpload {
    pub fn new(field: impl Into<String>, storage: impl StorageStrategy) -> Self {
        Self {
            field: field.into(),
            storage: Arc::new(storage),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    async fn collect(&self, mut multipart: Multipart) -> Result<Upload, UploadError> {
        let mut upload = Upload::default();

        if let Err(e) = self.read_parts(&mut multipart, &mut upload).await {
            if let Some(file) = &upload.file {
                discard(&file.path).await;
            }
            return Err(e);
        }

        Ok(upload)
    }

    async fn read_parts(
        &self,
        multipart: &mut Multipart,
        upload: &mut Upload,
    ) -> Result<(), UploadError> {
        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();

            let Some(original_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await?;
                upload.fields.insert(field_name, value);
                continue;
            };

            if field_name != self.field || upload.file.is_some() {
                tracing::warn!(field = %field_name, "rejecting unexpected file field");
                return Err(UploadError::UnexpectedField(field_name));
            }

            let original_name = base_name(&original_name).to_string();
            if original_name.is_empty() {
                return Err(UploadError::MissingFileName(field_name));
            }

            upload.file = Some(self.store(field, field_name, original_name).await?);
        }

        Ok(())
    }

    async fn store(
        &self,
        mut field: Field<'_>,
        field_name: String,
        original_name: String,
    ) -> Result<UploadedFile, UploadError> {
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&original_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let info = FileInfo {
            field_name,
            original_name,
            content_type,
        };

        let destination = self.storage.destination(&info);
        let file_name = self.storage.filename(&info);
        let path = destination.join(&file_name);

        let mut file = File::create(&path).await.map_err(|source| UploadError::Write {
            path: path.clone(),
            source,
        })?;

        let size = match write_field(&mut field, &mut file, &path).await {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                discard(&path).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Stored upload {} ({} bytes, {})",
            path.display(),
            size,
            info.content_type
        );

        Ok(UploadedFile {
            field_name: info.field_name,
            original_name: info.original_name,
            content_type: info.content_type,
            destination,
            file_name,
            path,
            size,
        })
    }
}

async fn write_field(
    field: &mut Field<'_>,
    file: &mut File,
    path: &Path,
) -> Result<u64, UploadError> {
    let write_error = |source| UploadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(write_error)?;
        size += chunk.len() as u64;
    }
    file.flush().await.map_err(write_error)?;

    Ok(size)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
    }
}

/// Last path component of a client-supplied file name, splitting on both
///  separators. `.` and `..` reduce to the empty string.
fn base_name(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    match base {
        "." | ".." => "",
        base => base,
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Middleware writing the configured file field to disk before the route's
///  handler runs.
///
/// Requests that are not `multipart/form-data` pass through untouched and
///  the handler sees no file. On success the consumed body is replaced by an
///  empty one and an [`Upload`] extension is attached.
pub async fn single_file(
    State(upload): State<SingleUpload>,
    req: Request,
    next: Next,
) -> Response {
    if !is_multipart(req.headers()) {
        return next.run(req).await;
    }

    let (parts, body) = req.into_parts();

    // The extractor only needs the headers and the body limit extension
    let mut multipart_req = Request::new(body);
    *multipart_req.headers_mut() = parts.headers.clone();
    *multipart_req.extensions_mut() = parts.extensions.clone();

    let multipart = match Multipart::from_request(multipart_req, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => return rejection.into_response(),
    };

    match upload.collect(multipart).await {
        Ok(result) => {
            let mut req = Request::from_parts(parts, Body::empty());
            req.extensions_mut().insert(result);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Missing file name in field: {0}")]
    MissingFileName(String),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::Multipart(_)
            | UploadError::UnexpectedField(_)
            | UploadError::MissingFileName(_) => (
                StatusCode::BAD_REQUEST,
                format!("Bad request: {}", self),
            )
                .into_response(),
            UploadError::Write { .. } => {
                tracing::error!("UPLOAD ERROR: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store upload".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_multipart() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_multipart(&headers));

        headers.insert(
            CONTENT_TYPE,
            "Multipart/Form-Data; boundary=abc".parse().unwrap(),
        );
        assert!(is_multipart(&headers));
    }

    #[test]
    fn test_base_name_drops_directories() {
        assert_eq!(base_name("cat.png"), "cat.png");
        assert_eq!(base_name("../cat.png"), "cat.png");
        assert_eq!(base_name("/abs/cat.png"), "cat.png");
        assert_eq!(base_name("dir\\cat.png"), "cat.png");
        assert_eq!(base_name("C:\\Users\\me/cat.png"), "cat.png");
        assert_eq!(base_name("dir/"), "");
        assert_eq!(base_name(".."), "");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_default_upload_has_no_file() {
        let upload = Upload::default();
        assert!(upload.file.is_none());
        assert!(upload.fields.is_empty());
    }
}
