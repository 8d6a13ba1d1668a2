//! Upstream response translation.
//!
//! # Policy
//! - 2xx: status preserved; JSON passed through, empty stays empty, plain
//!   text wrapped as `{"data": ...}`
//! - Configured passthrough statuses (400/403 by default): status and
//!   backend diagnostic preserved
//! - Anything else: 500 with the backend body under `details`
//!
//! A body that fails to parse as JSON is kept as text; it never changes the
//! status decision.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::http::error::ErrorBody;
use crate::upstream::UpstreamResponse;

/// Parsed form of an upstream body.
#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Empty,
    Json(Value),
    Text(String),
}

impl Payload {
    fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Payload::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    fn into_details(self) -> Option<Value> {
        match self {
            Payload::Empty => None,
            Payload::Json(value) => Some(value),
            Payload::Text(text) => Some(Value::String(text)),
        }
    }
}

/// Map an upstream answer to the outward response.
pub fn translate(upstream: UpstreamResponse, passthrough: &[u16]) -> Response {
    let status = upstream.status;
    let payload = Payload::parse(&upstream.body);

    if status.is_success() {
        return match payload {
            _ if matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT) => {
                status.into_response()
            }
            Payload::Empty => status.into_response(),
            Payload::Json(value) => (status, Json(value)).into_response(),
            Payload::Text(text) => (status, Json(json!({ "data": text }))).into_response(),
        };
    }

    if passthrough.contains(&status.as_u16()) {
        return match payload {
            Payload::Json(value) => (status, Json(value)).into_response(),
            other => {
                let reason = status.canonical_reason().unwrap_or("Upstream Error");
                (status, Json(ErrorBody::new(reason, other.into_details()))).into_response()
            }
        };
    }

    tracing::warn!(upstream_status = %status, "Normalising unexpected upstream status to 500");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal Server Error", payload.into_details())),
    )
        .into_response()
}
