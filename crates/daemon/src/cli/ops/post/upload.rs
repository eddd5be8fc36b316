use std::path::PathBuf;

use clap::Args;

use posts_daemon::http_server::api::client::ApiError;
use posts_daemon::http_server::api::posts::UploadRequest;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Image file to upload
    #[arg(long)]
    pub file: PathBuf,

    /// Text of the post
    #[arg(long)]
    pub description: Option<String>,

    /// Alternative text for the image
    #[arg(long)]
    pub alt: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostUploadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a file path: {0}")]
    InvalidPath(PathBuf),
}

impl Upload {
    async fn request(&self) -> Result<UploadRequest, PostUploadError> {
        let file_name = self
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PostUploadError::InvalidPath(self.file.clone()))?
            .to_string();

        let data = tokio::fs::read(&self.file)
            .await
            .map_err(|source| PostUploadError::Read {
                path: self.file.clone(),
                source,
            })?;

        Ok(UploadRequest {
            file_name,
            data,
            description: self.description.clone(),
            alt: self.alt.clone(),
        })
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = PostUploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = self.request().await?;
        let size = request.data.len();

        let post = ctx.client.call(request).await?;
        Ok(format!(
            "Uploaded {} bytes as post {}",
            size,
            super::summary(&post)
        ))
    }
}
