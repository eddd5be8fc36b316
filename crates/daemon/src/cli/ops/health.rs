use std::convert::Infallible;

use clap::Args;

use posts_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                let upload_status = if state.config.upload_dir.is_dir() {
                    "OK"
                } else {
                    "MISSING"
                };
                lines.push(format!("  directory:   {}", state.posts_dir.display()));
                lines.push("  config.toml: OK".to_string());
                lines.push(format!(
                    "  upload_dir:  {} ({})",
                    state.config.upload_dir.display(),
                    upload_status
                ));
                lines.push(format!("  port:        {}", state.config.port));
                lines.push(format!("  origin:      {}", state.config.allowed_origin));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check daemon liveness
        lines.push(String::new());
        lines.push(format!("Daemon ({}):", ctx.client.base_url()));

        match ctx.client.livez().await {
            Ok(true) => lines.push("  livez: OK".to_string()),
            Ok(false) => lines.push("  livez: UNHEALTHY".to_string()),
            Err(_) => lines.push("  livez: NOT REACHABLE".to_string()),
        }

        Ok(lines.join("\n"))
    }
}
