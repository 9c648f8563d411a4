//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles through the router, with module loads
//! served from a temporary asset directory.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nav_cache::{
    api::create_router,
    cache::shared_cache,
    modules::{FsModuleSource, ModuleCatalog, ModuleRegistry},
    prefetch::{AdjacencyMap, PrefetchScheduler},
    retry::RetryPolicy,
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

/// Asset directory with bundles for every fitness page except `Coach`.
async fn asset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for page in ["Workout", "Nutrition", "Sleep", "Dashboard"] {
        tokio::fs::write(dir.path().join(format!("{}.js", page)), b"export {};")
            .await
            .unwrap();
    }
    dir
}

fn create_test_app(dir: &TempDir) -> Router {
    let scheduler = PrefetchScheduler::new(
        Arc::new(ModuleRegistry::new()),
        Arc::new(FsModuleSource::new(dir.path(), ModuleCatalog::fitness())),
        ModuleCatalog::fitness(),
        AdjacencyMap::fitness(),
        RetryPolicy::new(2, Duration::from_millis(10), 2.0).unwrap(),
    )
    .with_delay(Duration::from_millis(50))
    .unwrap();

    create_router(AppState::new(
        shared_cache(None),
        scheduler,
        Duration::from_secs(300),
    ))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_set_then_get() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            r#"{"key":"user_stats","value":{"streak":4},"ttl_ms":60000}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ttl_ms"], 60000);

    let response = app
        .oneshot(empty_request("GET", "/cache/user_stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "user_stats");
    assert_eq!(json["value"]["streak"], 4);
    assert!(json["ttl_remaining_ms"].as_u64().unwrap() <= 60000);
}

#[tokio::test]
async fn test_get_missing_key_is_404() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .oneshot(empty_request("GET", "/cache/nonexistent"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_zero_ttl_is_immediately_stale() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            r#"{"key":"k","value":1,"ttl_ms":0}"#,
        ))
        .await
        .unwrap();

    let response = app.oneshot(empty_request("GET", "/cache/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalidate() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    app.clone()
        .oneshot(json_request("PUT", "/cache", r#"{"key":"k","value":"v"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/cache/k"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["removed"], true);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/cache/k"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["removed"], false);

    let response = app.oneshot(empty_request("GET", "/cache/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_empty_key_rejected() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .oneshot(json_request("PUT", "/cache", r#"{"key":"","value":"v"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Navigation Tests ==

#[tokio::test]
async fn test_navigate_returns_before_preload_then_loads_neighbours() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/navigate",
            r#"{"path":"/sleep/history","from":"/dashboard"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["location"], "sleep");
    assert_eq!(json["scheduled"], serde_json::json!(["nutrition", "dashboard"]));

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/modules"))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["loaded_count"], 0);

    tokio::time::sleep(Duration::from_millis(500)).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/modules/nutrition"))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["state"], "loaded");

    // Navigation record cached under nav_<path>
    let response = app
        .oneshot(empty_request("GET", "/cache/nav_%2Fsleep%2Fhistory"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"]["from"], "/dashboard");
}

#[tokio::test]
async fn test_failed_background_preload_stays_not_loaded() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    // workout -> nutrition, coach; the Coach bundle is missing
    let response = app
        .clone()
        .oneshot(json_request("POST", "/navigate", r#"{"path":"/workout"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(500)).await;

    let response = app
        .oneshot(empty_request("GET", "/modules/coach"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["state"], "not_loaded");
    assert_eq!(json["load_attempts"], 1);
}

#[tokio::test]
async fn test_navigate_to_root_schedules_nothing() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .oneshot(json_request("POST", "/navigate", r#"{"path":"/"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_to_json(response.into_body()).await;
    assert!(json["location"].is_null());
    assert_eq!(json["scheduled"], serde_json::json!([]));
}

// == Module Endpoint Tests ==

#[tokio::test]
async fn test_on_demand_load() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/modules/workout/load"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["state"], "loaded");

    let response = app
        .oneshot(empty_request("GET", "/stats"))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["loaded_modules"], 1);
}

#[tokio::test]
async fn test_on_demand_load_errors() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/modules/billing/load"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("POST", "/modules/coach/load"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_modules_are_not_tracked() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    for name in ["billing", "junk1", "junk2"] {
        let response = app
            .clone()
            .oneshot(empty_request("POST", &format!("/modules/{}/load", name)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app
        .clone()
        .oneshot(json_request("POST", "/preload", r#"{"modules":["billing"]}"#))
        .await
        .unwrap();
    assert_eq!(
        body_to_json(response.into_body()).await["failed"],
        serde_json::json!(["billing"])
    );

    let response = app
        .oneshot(empty_request("GET", "/modules"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert!(json["modules"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preload_endpoint() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/preload",
            r#"{"modules":["workout","coach","nutrition"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["loaded"], serde_json::json!(["workout", "nutrition"]));
    assert_eq!(json["failed"], serde_json::json!(["coach"]));

    let response = app
        .oneshot(empty_request("GET", "/modules"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["loaded_count"], 2);
    assert_eq!(json["modules"].as_array().unwrap().len(), 3);
}

// == Health and Stats ==

#[tokio::test]
async fn test_health_endpoint() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["status"], "healthy");
}

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let dir = asset_dir().await;
    let app = create_test_app(&dir);

    app.clone()
        .oneshot(json_request("PUT", "/cache", r#"{"key":"k","value":1}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/cache/k"))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/cache/missing"))
        .await
        .unwrap();

    let response = app.oneshot(empty_request("GET", "/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache"]["hits"], 1);
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["hit_rate"], 0.5);
}
