//! HTTP forwarder backed by reqwest.
//!
//! # Responsibilities
//! - Attach JSON content negotiation headers and the caller's credential
//! - Propagate the request ID
//! - Classify transport failures (timeout, connect, other)
//!
//! # Design Decisions
//! - One Authorization scheme per deployment, never mixed
//! - No retries: a failed call fails the request
//! - The client-level timeout is the only ceiling

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::config::{AuthScheme, UpstreamConfig};
use crate::http::request::X_REQUEST_ID;
use crate::upstream::types::{Upstream, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Production forwarder.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    scheme: AuthScheme,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("console-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            scheme: config.auth_scheme,
        })
    }

    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(credential) = &request.credential {
            builder = builder.header(
                AUTHORIZATION,
                format!("{} {}", self.scheme.as_str(), credential.as_str()),
            );
        }

        if let Some(request_id) = &request.request_id {
            builder = builder.header(X_REQUEST_ID, request_id.as_str());
        }

        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| UpstreamError::Transport(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse { status, body })
    }
}

impl Upstream for HttpUpstream {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>> {
        self.forward(request).boxed()
    }
}

fn classify(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else if error.is_connect() {
        UpstreamError::Connect(error.to_string())
    } else {
        UpstreamError::Transport(error.to_string())
    }
}
