use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::routing::RouteInfo;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub upstream: String,
    pub auth_scheme: &'static str,
    pub routes: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        upstream: state.base_url.to_string(),
        auth_scheme: state.config.upstream.auth_scheme.as_str(),
        routes: state.routes.len(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteInfo>> {
    Json(state.routes.iter().map(RouteInfo::from).collect())
}
