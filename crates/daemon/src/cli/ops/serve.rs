use clap::Args;

use posts_daemon::state::AppState;
use posts_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override API server port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (default from config, stdout only if unset)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] posts_daemon::state::StateError),

    #[error("service failed: {0}")]
    Service(#[from] posts_daemon::ServiceError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.posts)
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            port: self.port.unwrap_or(state.config.port),
            allowed_origin: state.config.allowed_origin.clone(),
            upload_dir: state.config.upload_dir.clone(),
            json_limit_bytes: state.config.json_limit_bytes,
            log_level: self.log_level,
            log_dir: self.log_dir.clone().or(state.config.log_dir.clone()),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
