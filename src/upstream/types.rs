//! Upstream request/response types and the forwarding seam.

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::auth::Credential;

/// A fully resolved call to the backend.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    /// Attached as the Authorization header when present.
    pub credential: Option<Credential>,
    /// Serialized as the JSON request body when present.
    pub body: Option<Value>,
    /// Correlation ID of the inbound request.
    pub request_id: Option<String>,
}

/// Raw backend answer; translation happens in `http::response`.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// Network-level failures. Backend error statuses are not errors here.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream unreachable: {0}")]
    Connect(String),

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Anything that can carry an [`UpstreamRequest`] to the backend.
pub trait Upstream: Send + Sync {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>>;
}

/// Join the configured base URL and a route suffix by concatenation.
///
/// A trailing slash on the base is dropped so `https://api/v1/` and
/// `https://api/v1` behave the same. The inbound query string is carried
/// over untouched.
pub fn upstream_url(base: &Url, suffix: &str, query: Option<&str>) -> Result<Url, url::ParseError> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), suffix);
    let mut url = Url::parse(&joined)?;
    url.set_query(query.filter(|q| !q.is_empty()));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_url_concatenation() {
        let base = Url::parse("https://api.example.com").unwrap();
        let url = upstream_url(&base, "/api/workspaces/", None).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/workspaces/");

        let prefixed = Url::parse("https://api.example.com/v2/").unwrap();
        let url = upstream_url(&prefixed, "/auth/jwt/create/", None).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/auth/jwt/create/");
    }

    #[test]
    fn test_query_forwarded() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let url = upstream_url(&base, "/api/documents/", Some("page=2&search=w2")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/documents/?page=2&search=w2");

        let url = upstream_url(&base, "/api/documents/", Some("")).unwrap();
        assert_eq!(url.query(), None);
    }
}
