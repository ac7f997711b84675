//! Integration tests for the composite health check (§4.8, §9).
//!
//! Requires a reachable Postgres at `TEST_DATABASE_URL` — see
//! `tests/common/mod.rs`. The origin dependency is mocked with `wiremock`
//! rather than pointed at a real deployment, since the probe is a plain
//! `GET /health` this gateway controls the expectations for.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_gateway::core::config::Config;
use catalog_gateway::core::state::AppState;
use catalog_gateway::origin::OriginClient;
use catalog_gateway::routes::health;
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn base_config(origin_base_url: String) -> Config {
    Config {
        http_port: 0,
        request_timeout: Duration::from_secs(5),
        shutdown_timeout: Duration::from_secs(1),
        bearer_tokens: Default::default(),
        origin_base_url,
        origin_api_key: String::new(),
        cache_host: "127.0.0.1".to_string(),
        cache_port: 6379,
        cache_password: None,
        cache_db: 0,
        cache_ttl: Duration::from_secs(300),
        database_url: String::new(),
        db_max_connections: 5,
        db_min_connections: 1,
        db_idle_timeout: Duration::from_secs(300),
        db_max_lifetime: Duration::from_secs(1800),
        log_level: "info".to_string(),
        log_json: false,
    }
}

#[tokio::test]
async fn degraded_when_only_the_optional_cache_is_unreachable() {
    let origin_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&origin_server)
        .await;

    let db = common::test_db().await;
    let config = base_config(origin_server.uri());

    let state = AppState {
        config: Arc::new(config),
        cache: None,
        db,
        origin: OriginClient::new(origin_server.uri(), ""),
    };

    let app = health::router().with_state(state);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "degraded is still a 200, not a 503");
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["dependencies"]["database"]["status"], "ok");
    assert_eq!(body["dependencies"]["supabase"]["status"], "ok");
    assert_eq!(body["dependencies"]["cache"]["status"], "skipped");
}

#[tokio::test]
async fn unhealthy_when_the_origin_row_store_is_unreachable() {
    let db = common::test_db().await;
    // nothing listens on this address, so the origin probe fails fast.
    let config = base_config("http://127.0.0.1:1".to_string());

    let state = AppState {
        config: Arc::new(config),
        cache: None,
        db,
        origin: OriginClient::new("http://127.0.0.1:1", ""),
    };

    let app = health::router().with_state(state);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["dependencies"]["supabase"]["status"], "unhealthy");
}
