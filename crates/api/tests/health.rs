//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["email_configured"], false);
    assert_eq!(json["billing_configured"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_counts_event_listeners(pool: PgPool) {
    let state = common::test_state(pool);
    let _events = state.event_bus.subscribe();
    let app = common::build_app(state);

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["event_listeners"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_is_unavailable_without_database(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let app = common::build_app(state);
    pool.close().await;

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Route with path '/this-route-does-not-exist' not found"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_web_origin_with_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/businesses")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_exposes_request_id(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-expose-headers").unwrap(),
        "x-request-id"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn public_config_reports_disabled_integrations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/config").await).await;

    assert_eq!(json["site_url"], "http://localhost:5173");
    assert_eq!(json["billing_enabled"], false);
    assert_eq!(json["email_enabled"], false);
    assert!(json["stripe_publishable_key"].is_null());
}
