use axum::routing::get;
use axum::Router;

mod liveness;
mod version;

pub fn router() -> Router {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/version", get(version::handler))
}
