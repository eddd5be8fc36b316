use std::convert::Infallible;

use axum::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::BytesMut;
use futures::StreamExt;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Maximum size of a JSON request body (100 KiB)
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 100 * 1024;

/// Global JSON body parser settings.
#[derive(Debug, Clone, Copy)]
pub struct JsonParser {
    limit: usize,
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new(DEFAULT_JSON_LIMIT_BYTES)
    }
}

impl JsonParser {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// The JSON body parsed by [`parse_json`]. Extracts as an empty object
///  when the request carried no JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl Default for JsonBody {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl JsonBody {
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<JsonBody>().cloned().unwrap_or_default())
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Buffers and validates JSON request bodies before any route runs.
///
/// An empty body parses as `{}`; only objects and arrays are accepted at
///  the top level. The raw bytes are put back on the request after parsing.
pub async fn parse_json(
    State(parser): State<JsonParser>,
    req: Request,
    next: Next,
) -> Result<Response, JsonBodyError> {
    if !is_json(req.headers()) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| JsonBodyError::Read(e.to_string()))?;
        if buffer.len() + chunk.len() > parser.limit {
            return Err(JsonBodyError::TooLarge(parser.limit));
        }
        buffer.extend_from_slice(&chunk);
    }
    let bytes = buffer.freeze();

    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&bytes)?
    };
    if !(value.is_object() || value.is_array()) {
        return Err(JsonBodyError::NotObjectOrArray);
    }

    parts.extensions.insert(JsonBody(value));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[derive(Debug, thiserror::Error)]
pub enum JsonBodyError {
    #[error("Failed to read request body: {0}")]
    Read(String),
    #[error("Request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("JSON body must be an object or an array")]
    NotObjectOrArray,
}

impl IntoResponse for JsonBodyError {
    fn into_response(self) -> Response {
        tracing::debug!("rejecting JSON body: {}", self);
        match self {
            JsonBodyError::TooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()).into_response()
            }
            JsonBodyError::Read(_)
            | JsonBodyError::Malformed(_)
            | JsonBodyError::NotObjectOrArray => (
                StatusCode::BAD_REQUEST,
                format!("Bad request: {}", self),
            )
                .into_response(),
        }
    }
}
