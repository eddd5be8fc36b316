use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::Router;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
pub mod body;
mod config;
pub mod cors;
mod handlers;
mod health;
pub mod routes;
pub mod upload;

pub use config::Config;
pub use routes::{configure, Controllers, RouterSettings, SharedControllers, UPLOAD_FIELD};

use crate::http_server::api::posts::StoreControllers;
use crate::ServiceState;

const STATUS_PREFIX: &str = "/_status";

/// Maximum upload size in bytes (500 MB)
pub const MAX_UPLOAD_SIZE_BYTES: usize = 500 * 1024 * 1024;

/// Build the application router: the posts routes, the status routes and
///  read-only access to stored uploads for anything else.
pub fn router(state: &ServiceState) -> Router {
    let controllers: SharedControllers = Arc::new(StoreControllers::new(state.store().clone()));
    let uploads = ServeDir::new(state.upload_dir())
        .not_found_service(handlers::not_found_handler.into_service());

    routes::configure(Router::new(), controllers, state.settings())
        .nest(STATUS_PREFIX, health::router())
        .fallback_service(uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE_BYTES))
}

/// Run the API HTTP server until `shutdown_rx` fires.
pub async fn run_api(
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(&state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
