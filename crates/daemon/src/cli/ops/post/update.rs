use posts_daemon::http_server::api::client::ApiError;
use posts_daemon::http_server::api::posts::UpdateRequest;

#[derive(Debug, thiserror::Error)]
pub enum PostUpdateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Nothing to update: pass --description and/or --alt")]
    NothingToUpdate,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for UpdateRequest {
    type Error = PostUpdateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.description.is_none() && self.alt.is_none() {
            return Err(PostUpdateError::NothingToUpdate);
        }

        let post = ctx.client.call(self.clone()).await?;
        Ok(format!("Updated post {}", super::summary(&post)))
    }
}
