use std::path::PathBuf;

use clap::Args;

use posts_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the API server
    #[arg(long)]
    pub port: Option<u16>,

    /// Origin allowed to call the API from a browser
    #[arg(long)]
    pub allowed_origin: Option<String>,

    /// Directory uploaded images are written to
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Maximum accepted JSON body size in bytes
    #[arg(long)]
    pub json_limit_bytes: Option<usize>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Init {
    fn config(&self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            port: self.port.unwrap_or(defaults.port),
            allowed_origin: self
                .allowed_origin
                .clone()
                .unwrap_or(defaults.allowed_origin),
            upload_dir: self.upload_dir.clone().unwrap_or(defaults.upload_dir),
            json_limit_bytes: self.json_limit_bytes.unwrap_or(defaults.json_limit_bytes),
            log_dir: self.log_dir.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::init(ctx.config_path.clone(), Some(self.config()))?;

        let mut lines = vec![format!("Initialized {}", state.posts_dir.display())];
        lines.push(format!("  config:     {}", state.config_path.display()));
        lines.push(format!("  port:       {}", state.config.port));
        lines.push(format!("  origin:     {}", state.config.allowed_origin));
        lines.push(format!("  upload_dir: {}", state.config.upload_dir.display()));
        Ok(lines.join("\n"))
    }
}
