//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use hypercache::{api::create_router, AppState, Cache, CacheConfig};
use serde_json::Value;

use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let config = CacheConfig {
        reap_interval: Duration::from_secs(3600),
        ..Default::default()
    };
    let cache = Cache::new(config).expect("valid config");
    let state = AppState::new(cache);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_request(key: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/get/{}", key))
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(set_request(r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("message").is_some());
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_endpoint_with_ttl() {
    let app = create_test_app();

    let response = app
        .oneshot(set_request(
            r#"{"key":"ttl_key","value":"ttl_value","ttl":60}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_set_endpoint_empty_key_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(set_request(r#"{"key":"","value":"v"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(set_request(r#"{"key":"get_key","value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_request("get_key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "get_key");
    assert_eq!(json["value"].as_str().unwrap(), "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_request("nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_get_endpoint_expired_key() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(set_request(r#"{"key":"short","value":"v","ttl":1}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    // Still live before the TTL elapses
    let response = app.clone().oneshot(get_request("short")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    // Expired now, even though no reaper sweep has run
    let response = app.oneshot(get_request("short")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    app.clone()
        .oneshot(set_request(r#"{"key":"doomed","value":"v"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/doomed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("doomed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_absent_key() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Idempotent: deleting a key that was never set still succeeds
    assert_eq!(response.status(), StatusCode::OK);
}

// == CLEAR Endpoint Tests ==

#[tokio::test]
async fn test_clear_endpoint_wipes_all_keys() {
    let app = create_test_app();

    for body in [
        r#"{"key":"k1","value":"v","ttl":60}"#,
        r#"{"key":"k2","value":"v","ttl":60}"#,
        r#"{"key":"k3","value":"v"}"#,
    ] {
        let response = app.clone().oneshot(set_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for key in ["k1", "k2", "k3"] {
        let response = app.clone().oneshot(get_request(key)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reports_hits_and_misses() {
    let app = create_test_app();

    app.clone()
        .oneshot(set_request(r#"{"key":"k","value":"v"}"#))
        .await
        .unwrap();

    // One hit, one miss
    app.clone().oneshot(get_request("k")).await.unwrap();
    app.clone().oneshot(get_request("absent")).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["server"]["gets"].as_u64().unwrap(), 2);
    assert_eq!(json["server"]["sets"].as_u64().unwrap(), 1);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("version").is_some());
    assert!(json.get("timestamp").is_some());
}
