use clap::{Args, Subcommand};

pub mod create;
pub mod list;
pub mod update;
pub mod upload;

use common::prelude::Post as StoredPost;
use posts_daemon::http_server::api::posts::{CreateRequest, ListRequest, UpdateRequest};

use crate::cli::op::Op;

crate::command_enum! {
    (List, ListRequest),
    (Create, CreateRequest),
    (Upload, upload::Upload),
    (Update, UpdateRequest),
}

// Rename the generated Command to PostCommand for clarity
pub type PostCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Post {
    #[command(subcommand)]
    pub command: PostCommand,
}

#[async_trait::async_trait]
impl Op for Post {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// One line per post: id, image and description.
pub(crate) fn summary(post: &StoredPost) -> String {
    let image = if post.image_url.is_empty() {
        "-"
    } else {
        post.image_url.as_str()
    };
    format!("{} {} {}", post.id, image, post.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::prelude::NewPost;

    #[test]
    fn test_summary_marks_missing_image() {
        let post = StoredPost::new(NewPost {
            description: "no picture".to_string(),
            ..Default::default()
        });
        assert_eq!(summary(&post), format!("{} - no picture", post.id));
    }
}
