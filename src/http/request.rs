//! Request-scoped helpers.
//!
//! # Responsibilities
//! - Request ID layers (generated as early as possible, echoed on response)
//! - Bounded body reads that fail as JSON errors instead of plain text

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{HeaderMap, HeaderName};
use http_body_util::LengthLimitError;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::error::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns a UUID v4 `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The request ID assigned by [`set_request_id_layer`], if any.
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Buffer the request body, refusing anything above `limit` bytes.
///
/// Only an exceeded limit is a 413; a body that fails mid-stream is a 400.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    to_bytes(body, limit).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            tracing::debug!(limit, "Request body over limit");
            ApiError::PayloadTooLarge
        } else {
            tracing::debug!(error = %inner, "Request body could not be read");
            ApiError::BadRequest
        }
    })
}
