//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared state (config, token validator, upstream, session store)
//! - Assemble the Axum router from the route catalogue
//! - Wire up middleware (request ID, tracing, security headers)
//! - Serve until the shutdown signal fires

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::auth::TokenValidator;
use crate::config::GatewayConfig;
use crate::demo::{onboarding, MemoryStore, SessionStore};
use crate::http::error::ApiError;
use crate::http::proxy::with_auth_proxy;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::routing::{catalog, HttpMethod, ProxyRoute};
use crate::security::with_security_headers;
use crate::upstream::{HttpUpstream, Upstream, UpstreamError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub tokens: Arc<TokenValidator>,
    pub upstream: Arc<dyn Upstream>,
    pub sessions: Arc<dyn SessionStore>,
    /// Parsed `upstream.base_url`.
    pub base_url: Arc<Url>,
    pub routes: Arc<Vec<ProxyRoute>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        upstream: Arc<dyn Upstream>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ServerError> {
        let base_url = Url::parse(&config.upstream.base_url)?;
        let tokens = TokenValidator::new(&config.auth);

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            upstream,
            sessions,
            base_url: Arc::new(base_url),
            routes: Arc::new(catalog()),
            started_at: Instant::now(),
        })
    }
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that forwards over HTTP and keeps demo state in memory.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let upstream = Arc::new(HttpUpstream::new(&config.upstream)?);
        let sessions = Arc::new(MemoryStore::new(
            config.demo.max_sessions,
            Duration::from_secs(config.demo.session_ttl_secs),
        ));
        Self::with_components(config, upstream, sessions)
    }

    /// Create a server with injected collaborators.
    pub fn with_components(
        config: GatewayConfig,
        upstream: Arc<dyn Upstream>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ServerError> {
        let state = AppState::new(config, upstream, sessions)?;
        let router = build_router(state.clone());
        Ok(Self { router, state })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.state.base_url,
            routes = self.state.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().route("/healthz", get(healthz));

    for (path, routes) in group_by_path(&state.routes) {
        router = router.route(path, method_router(routes));
    }

    if state.config.demo.onboarding_enabled {
        router = router.merge(onboarding::router());
    }

    let mut router = router.fallback(not_found).with_state(state.clone());

    if state.config.security.enable_headers {
        router = with_security_headers(router);
    }

    router.layer(
        ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let id = request_id(request.headers()).unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %id,
                )
            }))
            .layer(propagate_request_id_layer()),
    )
}

/// Routes sharing an inbound path, keyed by that path.
fn group_by_path(routes: &[ProxyRoute]) -> BTreeMap<&'static str, Vec<ProxyRoute>> {
    let mut grouped: BTreeMap<&'static str, Vec<ProxyRoute>> = BTreeMap::new();
    for route in routes {
        grouped.entry(route.path).or_default().push(route.clone());
    }
    grouped
}

/// One handler per method, and a JSON 405 with `Allow` for the rest.
fn method_router(routes: Vec<ProxyRoute>) -> MethodRouter<AppState> {
    let allow: Vec<HttpMethod> = routes.iter().map(|route| route.method).collect();

    routes
        .into_iter()
        .fold(MethodRouter::new(), |methods, route| methods.merge(with_auth_proxy(route)))
        .fallback(move || {
            let allow = allow.clone();
            async move { ApiError::MethodNotAllowed { allow } }
        })
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_path() {
        let grouped = group_by_path(&catalog());
        let methods: Vec<HttpMethod> = grouped["/api/workspaces/{workspace_id}"]
            .iter()
            .map(|route| route.method)
            .collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete]);
        assert_eq!(grouped["/api/auth/login"].len(), 1);
    }
}
