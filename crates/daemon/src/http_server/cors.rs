use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderValue, Method, StatusCode};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8000";

/// Cross-origin policy for the posts routes: a single allowed origin and
///  the status preflight requests are answered with.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
    preflight_status: StatusCode,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
            preflight_status: StatusCode::OK,
        }
    }
}

impl CorsPolicy {
    pub fn new(allowed_origin: &str) -> Result<Self, CorsPolicyError> {
        let allowed_origin = HeaderValue::from_str(allowed_origin)
            .map_err(|_| CorsPolicyError::InvalidOrigin(allowed_origin.to_string()))?;
        Ok(Self {
            allowed_origin,
            ..Default::default()
        })
    }

    pub fn with_preflight_status(mut self, status: StatusCode) -> Self {
        self.preflight_status = status;
        self
    }

    pub fn allowed_origin(&self) -> &HeaderValue {
        &self.allowed_origin
    }

    pub fn preflight_status(&self) -> StatusCode {
        self.preflight_status
    }

    /// Build the tower layer enforcing this policy.
    ///
    /// Requests from any other origin are still served, but without an
    ///  `Access-Control-Allow-Origin` header, so browsers refuse them.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([self.allowed_origin.clone()]))
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(false)
    }
}

/// Rewrites the status of preflight responses produced by the CORS layer.
///  Must wrap that layer.
pub async fn preflight_status(
    State(policy): State<CorsPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let preflight = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if preflight {
        *response.status_mut() = policy.preflight_status;
    }
    response
}

#[derive(Debug, thiserror::Error)]
pub enum CorsPolicyError {
    #[error("invalid allowed origin: {0}")]
    InvalidOrigin(String),
}
