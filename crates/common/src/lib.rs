/**
 * The post model: what a client creates, what
 *  an update may touch, and what the store hands back.
 */
pub mod post;
/**
 * Storage provider abstraction for posts,
 *  plus an in-memory implementation.
 */
pub mod store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::post::{NewPost, Post, PostUpdate};
    pub use crate::store::{MemoryPostStore, PostStore, PostStoreError};
    pub use crate::version::build_info;
}
