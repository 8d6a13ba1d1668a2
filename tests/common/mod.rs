//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use futures_util::future::{self, BoxFuture, FutureExt};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use console_proxy::config::GatewayConfig;
use console_proxy::demo::MemoryStore;
use console_proxy::upstream::{Upstream, UpstreamError, UpstreamRequest, UpstreamResponse};
use console_proxy::HttpServer;

pub const SECRET: &str = "test-secret";
pub const BASE_URL: &str = "http://backend.test/v1";

type Responder = dyn Fn(&UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> + Send + Sync;

/// Scripted upstream that records every call it receives.
pub struct MockUpstream {
    calls: AtomicUsize,
    requests: Mutex<Vec<UpstreamRequest>>,
    responder: Box<Responder>,
}

impl MockUpstream {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Always answer `status` with a JSON body.
    pub fn replying(status: u16, body: Value) -> Arc<Self> {
        let status = StatusCode::from_u16(status).unwrap();
        Self::new(move |_| Ok(UpstreamResponse::json(status, &body)))
    }

    /// Always answer `status` with a raw body.
    pub fn replying_raw(status: u16, body: &'static str) -> Arc<Self> {
        let status = StatusCode::from_u16(status).unwrap();
        Self::new(move |_| Ok(UpstreamResponse::new(status, body)))
    }

    /// Simulate a network failure on every call.
    pub fn unreachable() -> Arc<Self> {
        Self::new(|_| Err(UpstreamError::Connect("connection refused".into())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> UpstreamRequest {
        self.requests.lock().unwrap().last().cloned().expect("upstream was never called")
    }
}

impl Upstream for MockUpstream {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        future::ready(result).boxed()
    }
}

pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = BASE_URL.into();
    config.auth.jwt_secret = Some(SECRET.into());
    config
}

fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

/// Mint an HS256 token expiring `ttl_secs` from now (negative for expired).
pub fn token(ttl_secs: i64) -> String {
    let claims = json!({ "exp": now() + ttl_secs, "user_id": 42, "token_type": "access" });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

pub fn valid_token() -> String {
    token(3600)
}

pub fn app(upstream: Arc<MockUpstream>) -> Router {
    app_with(test_config(), upstream)
}

pub fn app_with(config: GatewayConfig, upstream: Arc<MockUpstream>) -> Router {
    HttpServer::with_components(config, upstream, Arc::new(MemoryStore::default()))
        .unwrap()
        .router()
}

/// Build a request with an optional bearer token and JSON body.
pub fn request(method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Bytes,
}

impl TestResponse {
    /// Parsed body; `Value::Null` when empty.
    pub fn json(&self) -> Value {
        if self.raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.raw).unwrap()
        }
    }
}

pub async fn call(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse { status, headers, raw }
}

/// Serve `router` on an ephemeral localhost port.
pub async fn start_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
