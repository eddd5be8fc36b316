use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Post, PostStore, PostStoreError};

use crate::http_server::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {}

pub async fn handler<S: PostStore>(store: &S) -> Result<impl IntoResponse, ListError> {
    let posts = store.list().await?;
    tracing::debug!("Listing {} post(s)", posts.len());
    Ok((http::StatusCode::OK, Json(posts)))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Store error: {0}")]
    Store(String),
}

impl<T: std::fmt::Display> From<PostStoreError<T>> for ListError {
    fn from(e: PostStoreError<T>) -> Self {
        ListError::Store(e.to_string())
    }
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        tracing::error!("LIST POSTS ERROR: {:?}", self);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error".to_string(),
        )
            .into_response()
    }
}

impl ApiRequest for ListRequest {
    type Response = Vec<Post>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/posts")?;
        Ok(client.get(full_url))
    }
}
