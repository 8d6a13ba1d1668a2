//! Outward error envelope.
//!
//! Every failure leaves the gateway as `{"error": <reason>, "details"?: ...}`
//! so the dashboard can parse any response body as JSON.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::routing::HttpMethod;
use crate::validation::FieldIssue;

/// Normalised error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

/// Errors raised by the gateway itself.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body stream failed before it was fully read.
    #[error("Bad Request")]
    BadRequest,

    /// Missing, malformed or expired credential. Never carries details.
    #[error("Unauthorized")]
    Unauthorized,

    /// Local schema validation failed; one issue per field.
    #[error("Unprocessable Entity")]
    Validation(Vec<FieldIssue>),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allow: Vec<HttpMethod> },

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Conflict")]
    Conflict(String),

    /// A bounded resource (such as the demo session store) is full.
    #[error("Service Unavailable")]
    ServiceUnavailable,

    /// Network failure or anything unexpected. Never carries details.
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation(issues) => serde_json::to_value(issues).ok(),
            ApiError::Conflict(message) => Some(Value::String(message.clone())),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody::new(self.to_string(), self.details());
        let mut response = (self.status(), Json(body)).into_response();

        if let ApiError::MethodNotAllowed { allow } = &self {
            let allow = allow
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}
