//! Operator API authentication and payloads.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;

use console_proxy::admin::setup_admin_router;
use console_proxy::demo::MemoryStore;
use console_proxy::routing::catalog;
use console_proxy::HttpServer;

mod common;
use common::{call, test_config, MockUpstream};

const ADMIN_KEY: &str = "test-admin-key";

fn admin_app() -> axum::Router {
    let mut config = test_config();
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();
    let server = HttpServer::with_components(
        config,
        MockUpstream::replying(200, json!({})),
        Arc::new(MemoryStore::default()),
    )
    .unwrap();
    setup_admin_router(server.state().clone())
}

fn get(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = key {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_admin_requires_api_key() {
    let app = admin_app();

    let res = call(&app, get("/admin/status", None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = call(&app, get("/admin/status", Some("wrong"))).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_admin_status_and_routes() {
    let app = admin_app();

    let res = call(&app, get("/admin/status", Some(ADMIN_KEY))).await;
    assert_eq!(res.status, StatusCode::OK);
    let status = res.json();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["auth_scheme"], "Bearer");
    assert_eq!(status["upstream"], "http://backend.test/v1");

    let res = call(&app, get("/admin/routes", Some(ADMIN_KEY))).await;
    assert_eq!(res.status, StatusCode::OK);
    let routes = res.json();
    let routes = routes.as_array().unwrap();
    assert_eq!(routes.len(), catalog().len());
    assert!(routes
        .iter()
        .any(|r| r["name"] == "memberships.update" && r["method"] == "PUT" && r["validated"] == true));
}
