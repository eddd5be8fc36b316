use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{PostStore, PostStoreError};
use crate::post::{NewPost, Post, PostUpdate};

/// In-memory post store
#[derive(Debug, Clone, Default)]
pub struct MemoryPostStore {
    inner: Arc<RwLock<MemoryPostStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryPostStoreInner {
    posts: HashMap<Uuid, Post>,
    /// Insertion order of post ids
    order: Vec<Uuid>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryPostStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> PostStoreError<MemoryPostStoreError> {
    PostStoreError::Provider(MemoryPostStoreError::Internal(format!(
        "failed to acquire lock: {}",
        e
    )))
}

#[async_trait]
impl PostStore for MemoryPostStore {
    type Error = MemoryPostStoreError;

    async fn list(&self) -> Result<Vec<Post>, PostStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;

        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.posts.get(id))
            .cloned()
            .collect())
    }

    async fn insert(&self, new: NewPost) -> Result<Post, PostStoreError<Self::Error>> {
        let post = Post::new(new);
        let mut inner = self.inner.write().map_err(poisoned)?;

        inner.order.push(post.id);
        inner.posts.insert(post.id, post.clone());
        tracing::debug!(post_id = %post.id, "inserted post");

        Ok(post)
    }

    async fn get(&self, id: Uuid) -> Result<Post, PostStoreError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;

        inner
            .posts
            .get(&id)
            .cloned()
            .ok_or(PostStoreError::NotFound(id))
    }

    async fn update(
        &self,
        id: Uuid,
        update: PostUpdate,
    ) -> Result<Post, PostStoreError<Self::Error>> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        let post = inner
            .posts
            .get_mut(&id)
            .ok_or(PostStoreError::NotFound(id))?;
        post.apply(update);

        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(description: &str) -> NewPost {
        NewPost {
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryPostStore::new();
        let first = store.insert(new_post("first")).await.unwrap();
        let second = store.insert(new_post("second")).await.unwrap();
        let third = store.insert(new_post("third")).await.unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn test_get_unknown_post() {
        let store = MemoryPostStore::new();
        let id = Uuid::new_v4();

        let result = store.get(id).await;
        assert_eq!(result, Err(PostStoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_update_changes_stored_post() {
        let store = MemoryPostStore::new();
        let post = store.insert(new_post("draft")).await.unwrap();

        let updated = store
            .update(
                post.id,
                PostUpdate {
                    description: Some("published".into()),
                    alt: Some("a photo".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "published");

        let fetched = store.get(post.id).await.unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_post() {
        let store = MemoryPostStore::new();
        let id = Uuid::new_v4();

        let result = store.update(id, PostUpdate::default()).await;
        assert_eq!(result, Err(PostStoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = MemoryPostStore::new();
        let clone = store.clone();
        clone.insert(new_post("shared")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
