use posts_daemon::http_server::api::client::ApiError;
use posts_daemon::http_server::api::posts::ListRequest;

#[derive(Debug, thiserror::Error)]
pub enum PostListError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for ListRequest {
    type Error = PostListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let posts = ctx.client.call(self.clone()).await?;

        if posts.is_empty() {
            Ok("No posts found".to_string())
        } else {
            Ok(posts
                .iter()
                .map(super::summary)
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
