use async_trait::async_trait;
use axum::response::{IntoResponse, Response};

use common::prelude::PostStore;

use crate::http_server::body::JsonBody;
use crate::http_server::routes::Controllers;
use crate::http_server::upload::Upload;

pub mod create;
pub mod list;
pub mod update;
pub mod upload;

// Re-export for convenience
pub use create::CreateRequest;
pub use list::ListRequest;
pub use update::UpdateRequest;
pub use upload::UploadRequest;

/// Posts controllers backed by a [`PostStore`].
#[derive(Debug, Clone)]
pub struct StoreControllers<S> {
    store: S,
}

impl<S: PostStore> StoreControllers<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: PostStore> Controllers for StoreControllers<S> {
    async fn list(&self) -> Response {
        list::handler(&self.store).await.into_response()
    }

    async fn create(&self, body: JsonBody) -> Response {
        create::handler(&self.store, body).await.into_response()
    }

    async fn handle_upload(&self, upload: Upload) -> Response {
        upload::handler(&self.store, upload).await.into_response()
    }

    async fn update_upload(&self, id: String, body: JsonBody) -> Response {
        update::handler(&self.store, &id, body).await.into_response()
    }
}
