use posts_daemon::http_server::api::client::ApiError;
use posts_daemon::http_server::api::posts::CreateRequest;

#[derive(Debug, thiserror::Error)]
pub enum PostCreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for CreateRequest {
    type Error = PostCreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let post = ctx.client.call(self.clone()).await?;
        Ok(format!("Created post {}", super::summary(&post)))
    }
}
