//! Authenticated proxy pipeline.
//!
//! Every dashboard route is one [`ProxyRoute`] turned into a handler by
//! [`with_auth_proxy`]. A request walks the stages in order and leaves at
//! the first failure:
//!
//! ```text
//! Start ──token──▶ TokenChecked ──schema──▶ BodyValidated ──send──▶ Forwarded ──▶ Translated
//!   │ 401              │ 413 / 422                │ 500
//! ```
//!
//! The upstream is contacted only after both checks pass, and at most once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodRouter};
use serde_json::Value;

use crate::auth::access_token;
use crate::http::error::ApiError;
use crate::http::request::{read_body, request_id};
use crate::http::response::translate;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Access, Callback, ProxyRoute};
use crate::upstream::{upstream_url, UpstreamRequest};
use crate::validation::{validate_path_params, FieldIssue};

/// Last pipeline stage a request completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TokenChecked,
    BodyValidated,
    Forwarded,
    Translated,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::TokenChecked => "token_checked",
            Stage::BodyValidated => "body_validated",
            Stage::Forwarded => "forwarded",
            Stage::Translated => "translated",
        }
    }
}

/// Inbound request parts the pipeline consumes.
struct Inbound {
    /// Decoded path parameters, or the issue that prevented decoding.
    params: Result<HashMap<String, String>, FieldIssue>,
    query: Option<String>,
    headers: HeaderMap,
    body: Body,
}

/// Build the axum handler for one route.
pub fn with_auth_proxy(route: ProxyRoute) -> MethodRouter<AppState> {
    let filter = route.method.filter();
    let has_params = !route.params().is_empty();
    let route = Arc::new(route);

    if has_params {
        on(
            filter,
            move |State(state): State<AppState>,
                  params: Result<Path<HashMap<String, String>>, PathRejection>,
                  RawQuery(query): RawQuery,
                  headers: HeaderMap,
                  body: Body| {
                let route = Arc::clone(&route);
                let inbound = Inbound {
                    params: params.map(|Path(params)| params).map_err(path_issue),
                    query,
                    headers,
                    body,
                };
                async move { run_pipeline(&state, &route, inbound).await }
            },
        )
    } else {
        on(
            filter,
            move |State(state): State<AppState>,
                  RawQuery(query): RawQuery,
                  headers: HeaderMap,
                  body: Body| {
                let route = Arc::clone(&route);
                let inbound = Inbound {
                    params: Ok(HashMap::new()),
                    query,
                    headers,
                    body,
                };
                async move { run_pipeline(&state, &route, inbound).await }
            },
        )
    }
}

/// Undecodable path segments are reported like any other bad parameter.
fn path_issue(rejection: PathRejection) -> FieldIssue {
    let name = match &rejection {
        PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
            ErrorKind::InvalidUtf8InPathParam { key } => key.clone(),
            _ => String::from("params"),
        },
        _ => String::from("params"),
    };
    FieldIssue::new(
        format!("path.{}", name),
        "invalid_format",
        "Path parameter is not valid UTF-8.",
    )
}

async fn run_pipeline(state: &AppState, route: &ProxyRoute, inbound: Inbound) -> Response {
    let request_id = request_id(&inbound.headers);
    let mut stage = Stage::Start;

    let response = match proxy(state, route, inbound, request_id.clone(), &mut stage).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };

    let status = response.status().as_u16();
    metrics::record_request(route.name, status, stage.as_str());
    tracing::info!(
        request_id = request_id.as_deref().unwrap_or("-"),
        route = route.name,
        status,
        stage = stage.as_str(),
        "Request finished"
    );

    response
}

async fn proxy(
    state: &AppState,
    route: &ProxyRoute,
    inbound: Inbound,
    request_id: Option<String>,
    stage: &mut Stage,
) -> Result<Response, ApiError> {
    // Public routes never send a credential upstream.
    let credential = match route.access {
        Access::Protected => {
            let credential = access_token(&inbound.headers, &state.config.auth.cookie_name);
            if !state.tokens.is_usable(credential.as_ref()) {
                return Err(ApiError::Unauthorized);
            }
            credential
        }
        Access::Public => None,
    };
    *stage = Stage::TokenChecked;

    let (params, mut issues) = match inbound.params {
        Ok(params) => {
            let issues = validate_path_params(&params);
            (params, issues)
        }
        Err(issue) => (HashMap::new(), vec![issue]),
    };
    let mut payload = None;
    if let Some(schema) = route.schema {
        let raw = read_body(inbound.body, state.config.security.max_body_size).await?;
        match schema(&raw) {
            Ok(value) => payload = Some(value),
            Err(body_issues) => issues.extend(body_issues),
        }
    }
    if !issues.is_empty() {
        return Err(ApiError::Validation(issues));
    }
    if let Some(value) = payload.as_mut() {
        inject_callbacks(value, route.callbacks, &state.config.upstream.app_url);
    }
    *stage = Stage::BodyValidated;

    let suffix = route.upstream_path(&params);
    let url = upstream_url(&state.base_url, &suffix, inbound.query.as_deref()).map_err(|e| {
        tracing::error!(route = route.name, error = %e, "Failed to build upstream URL");
        ApiError::Internal
    })?;

    let request = UpstreamRequest {
        method: route.method.method(),
        url,
        credential,
        body: payload,
        request_id,
    };

    let started = Instant::now();
    let result = state.upstream.send(request).await;
    metrics::record_upstream(route.name, started.elapsed(), result.is_ok());

    let upstream = result.map_err(|e| {
        tracing::error!(route = route.name, error = %e, "Upstream request failed");
        ApiError::Internal
    })?;
    *stage = Stage::Forwarded;

    let response = translate(upstream, &state.config.responses.passthrough_statuses);
    *stage = Stage::Translated;
    Ok(response)
}

/// Add absolute callback URLs under `app_url` to a validated body.
fn inject_callbacks(body: &mut Value, callbacks: &[Callback], app_url: &str) {
    let Value::Object(fields) = body else {
        return;
    };
    let origin = app_url.trim_end_matches('/');
    for callback in callbacks {
        fields.insert(
            callback.field.to_string(),
            Value::String(format!("{}{}", origin, callback.path)),
        );
    }
}
