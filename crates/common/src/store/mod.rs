use std::fmt::{Debug, Display};

use async_trait::async_trait;
use uuid::Uuid;

use crate::post::{NewPost, Post, PostUpdate};

mod memory;

pub use memory::{MemoryPostStore, MemoryPostStoreError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostStoreError<T> {
    #[error("unhandled post store provider error: {0}")]
    Provider(#[from] T),
    #[error("post not found: {0}")]
    NotFound(Uuid),
}

#[async_trait]
pub trait PostStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send;

    /// List every post in insertion order
    async fn list(&self) -> Result<Vec<Post>, PostStoreError<Self::Error>>;

    /// Persist a new post and return it with its assigned id
    async fn insert(&self, new: NewPost) -> Result<Post, PostStoreError<Self::Error>>;

    /// Fetch a single post
    ///
    /// Should fail with `Err(PostStoreError::NotFound)` when no
    ///  post with `id` exists
    async fn get(&self, id: Uuid) -> Result<Post, PostStoreError<Self::Error>>;

    /// Apply a partial update to an existing post and return
    ///  the post as stored afterwards
    ///
    /// Should fail with `Err(PostStoreError::NotFound)` when no
    ///  post with `id` exists
    async fn update(
        &self,
        id: Uuid,
        update: PostUpdate,
    ) -> Result<Post, PostStoreError<Self::Error>>;
}
