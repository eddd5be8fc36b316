use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{Post, PostStore, PostStoreError, PostUpdate};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::body::JsonBody;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct UpdateRequest {
    /// Post ID to update
    #[arg(long)]
    pub id: Uuid,

    /// New text of the post
    #[arg(long)]
    pub description: Option<String>,

    /// New alternative text for the image
    #[arg(long)]
    pub alt: Option<String>,
}

pub async fn handler<S: PostStore>(
    store: &S,
    id: &str,
    body: JsonBody,
) -> Result<impl IntoResponse, UpdateError> {
    let id = Uuid::parse_str(id).map_err(|_| UpdateError::InvalidId(id.to_string()))?;
    let update: PostUpdate = body.deserialize()?;

    let post = store.update(id, update).await.map_err(|e| match e {
        PostStoreError::NotFound(id) => UpdateError::NotFound(id),
        e => UpdateError::Store(e.to_string()),
    })?;
    tracing::info!("UPDATE POST: updated post {}", post.id);

    Ok((http::StatusCode::OK, Json(post)))
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Invalid post id: {0}")]
    InvalidId(String),
    #[error("Invalid update: {0}")]
    InvalidUpdate(#[from] serde_json::Error),
    #[error("Post not found: {0}")]
    NotFound(Uuid),
    #[error("Store error: {0}")]
    Store(String),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        match self {
            UpdateError::InvalidId(_) | UpdateError::InvalidUpdate(_) => {
                (http::StatusCode::BAD_REQUEST, format!("Bad request: {}", self)).into_response()
            }
            UpdateError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            UpdateError::Store(msg) => {
                tracing::error!("UPDATE POST ERROR: {}", msg);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

impl ApiRequest for UpdateRequest {
    type Response = Post;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/upload/{}", self.id))?;
        let update = PostUpdate {
            description: self.description,
            alt: self.alt,
        };
        Ok(client.put(full_url).json(&update))
    }
}
