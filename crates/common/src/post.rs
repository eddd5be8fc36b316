use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub description: String,
    /// Where the post's image can be fetched from, relative to the
    ///  server root when it was uploaded through `/upload`
    pub image_url: String,
    /// Alternative text for the image
    pub alt: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Payload for creating a post. Missing fields default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub description: String,
    pub image_url: String,
    pub alt: String,
}

/// Partial update of a post. Only the fields present are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Post {
    pub fn new(new: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: new.description,
            image_url: new.image_url,
            alt: new.alt,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn apply(&mut self, update: PostUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(alt) = update.alt {
            self.alt = alt;
        }
    }
}
