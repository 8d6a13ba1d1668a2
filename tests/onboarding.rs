//! Onboarding demo routes over the in-memory session store.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::json;

use console_proxy::demo::MemoryStore;
use console_proxy::HttpServer;

mod common;
use common::{app, app_with, call, request, test_config, MockUpstream};

fn demo_app(upstream: Arc<MockUpstream>) -> Router {
    let mut config = test_config();
    config.demo.onboarding_enabled = true;
    app_with(config, upstream)
}

#[tokio::test]
async fn test_onboarding_walkthrough() {
    let upstream = MockUpstream::replying(200, json!({}));
    let app = demo_app(upstream.clone());

    let res = call(&app, request(Method::POST, "/api/demo/onboarding", None, None)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let session = res.json();
    assert_eq!(session["current_step"], "profile");
    let uri = format!("/api/demo/onboarding/{}", session["id"].as_str().unwrap());

    let res = call(
        &app,
        request(
            Method::PUT,
            &uri,
            None,
            Some(json!({ "step": "profile", "data": { "legal_name": "Acme Tax LLC" } })),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["current_step"], "business");

    let res = call(&app, request(Method::GET, &uri, None, None)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["completed_steps"], json!(["profile"]));
    assert_eq!(body["data"]["profile"]["legal_name"], "Acme Tax LLC");

    let res = call(&app, request(Method::DELETE, &uri, None, None)).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = call(&app, request(Method::GET, &uri, None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_step_rules() {
    let app = demo_app(MockUpstream::replying(200, json!({})));

    let res = call(&app, request(Method::POST, "/api/demo/onboarding", None, None)).await;
    let uri = format!("/api/demo/onboarding/{}", res.json()["id"].as_str().unwrap());

    let res = call(&app, request(Method::PUT, &uri, None, Some(json!({ "step": "review" })))).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["error"], "Conflict");

    let res = call(&app, request(Method::PUT, &uri, None, Some(json!({})))).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json()["details"][0]["field"], "step");

    let res = call(&app, request(Method::PUT, &uri, None, Some(json!({ "step": "launch" })))).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json()["details"][0]["code"], "invalid_choice");
}

#[tokio::test]
async fn test_unknown_sessions() {
    let app = demo_app(MockUpstream::replying(200, json!({})));

    let res = call(&app, request(Method::GET, "/api/demo/onboarding/not-a-uuid", None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = call(
        &app,
        request(
            Method::DELETE,
            "/api/demo/onboarding/6f1c2a9e-3c1b-4d53-9a55-0c2f8f0b9f11",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_demo_routes_off_by_default() {
    let app = app(MockUpstream::replying(200, json!({})));

    let res = call(&app, request(Method::POST, "/api/demo/onboarding", None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_undecodable_session_id_is_json_not_found() {
    let app = demo_app(MockUpstream::replying(200, json!({})));

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let res = call(&app, request(method, "/api/demo/onboarding/%FF", None, None)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.json(), json!({ "error": "Not Found" }));
    }
}

#[tokio::test]
async fn test_unknown_session_checked_before_body() {
    let app = demo_app(MockUpstream::replying(200, json!({})));

    let res = call(
        &app,
        request(
            Method::PUT,
            "/api/demo/onboarding/6f1c2a9e-3c1b-4d53-9a55-0c2f8f0b9f11",
            None,
            Some(json!({ "step": 7 })),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_session_store_rejects_new_sessions() {
    let mut config = test_config();
    config.demo.onboarding_enabled = true;
    let store = Arc::new(MemoryStore::new(1, Duration::from_secs(3_600)));
    let upstream = MockUpstream::replying(200, json!({}));
    let app = HttpServer::with_components(config, upstream, store.clone())
        .unwrap()
        .router();

    let res = call(&app, request(Method::POST, "/api/demo/onboarding", None, None)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let uri = format!("/api/demo/onboarding/{}", res.json()["id"].as_str().unwrap());

    let res = call(&app, request(Method::POST, "/api/demo/onboarding", None, None)).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json(), json!({ "error": "Service Unavailable" }));
    assert_eq!(store.len(), 1);

    // The existing session can still advance.
    let body = json!({ "step": "profile" });
    let res = call(&app, request(Method::PUT, &uri, None, Some(body))).await;
    assert_eq!(res.status, StatusCode::OK);
}
