use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{NewPost, Post, PostStore, PostStoreError};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::body::JsonBody;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Text of the post
    #[arg(long, default_value = "")]
    pub description: String,

    /// URL of the post's image
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Alternative text for the image
    #[arg(long, default_value = "")]
    pub alt: String,
}

pub async fn handler<S: PostStore>(
    store: &S,
    body: JsonBody,
) -> Result<impl IntoResponse, CreateError> {
    let new: NewPost = body.deserialize()?;

    let post = store.insert(new).await?;
    tracing::info!("CREATE POST: created post {}", post.id);

    Ok((http::StatusCode::CREATED, Json(post)))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("Invalid post: {0}")]
    InvalidPost(#[from] serde_json::Error),
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<PostStoreError<T>> for CreateError {
    fn from(e: PostStoreError<T>) -> Self {
        CreateError::Store(e.to_string())
    }
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::InvalidPost(e) => (
                http::StatusCode::BAD_REQUEST,
                format!("Invalid post: {}", e),
            )
                .into_response(),
            CreateError::Store(msg) => {
                tracing::error!("CREATE POST ERROR: {}", msg);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

impl ApiRequest for CreateRequest {
    type Response = Post;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/posts")?;
        let new = NewPost {
            description: self.description,
            image_url: self.image_url,
            alt: self.alt,
        };
        Ok(client.post(full_url).json(&new))
    }
}
