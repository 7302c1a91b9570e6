#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use agendizo_api::auth::jwt::JwtConfig;
use agendizo_api::config::ServerConfig;
use agendizo_api::router::build_app_router;
use agendizo_api::state::AppState;
use agendizo_billing::{StripeApi, StripeConfig};
use agendizo_events::{EmailError, EmailFunction, EmailNotifier, EventBus, SendEmailRequest};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and no integrations.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        site_url: "http://localhost:5173".to_string(),
        session_cookie_secure: false,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_days: 30,
        },
        email: None,
        email_functions: None,
        stripe: None,
    }
}

pub fn test_stripe_config() -> StripeConfig {
    StripeConfig {
        secret_key: "sk_test_123".to_string(),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        publishable_key: Some("pk_test_123".to_string()),
        default_price_id: Some("price_basic".to_string()),
        // Nothing listens here; tests never reach the Stripe API.
        api_url: "http://127.0.0.1:9".to_string(),
    }
}

/// App state with no email backend and billing disabled.
pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus: Arc::new(EventBus::default()),
        notifier: None,
        stripe: None,
    }
}

/// App state with Stripe configured.
pub fn billing_state(pool: PgPool) -> AppState {
    let stripe = test_stripe_config();
    let mut config = test_config();
    config.stripe = Some(stripe.clone());
    AppState {
        stripe: Some(Arc::new(StripeApi::new(&stripe))),
        config: Arc::new(config),
        ..test_state(pool)
    }
}

/// App state whose emails are captured by `function`.
pub fn email_state(pool: PgPool, function: Arc<RecordingEmailFunction>) -> AppState {
    AppState {
        notifier: Some(EmailNotifier::new(function)),
        ..test_state(pool)
    }
}

/// Build the full application router from `state`, with the production
/// middleware stack.
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_app_router(state, &config)
}

/// Build the full application router with default test state.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(test_state(pool))
}

// ---------------------------------------------------------------------------
// Email capture
// ---------------------------------------------------------------------------

/// Records every invocation instead of sending mail.
#[derive(Default)]
pub struct RecordingEmailFunction {
    calls: Mutex<Vec<(String, SendEmailRequest)>>,
    fail: bool,
}

impl RecordingEmailFunction {
    /// A function that rejects every call, as a failing remote would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, SendEmailRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailFunction for RecordingEmailFunction {
    async fn invoke(&self, name: &str, request: &SendEmailRequest) -> Result<(), EmailError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), request.clone()));
        if self.fail {
            return Err(EmailError::Function {
                name: name.to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::POST, uri, body, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, body, Some(token)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::PATCH, uri, body, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered owner with one business.
pub struct Owner {
    pub user_id: i64,
    pub token: String,
    pub business_id: i64,
    pub slug: String,
}

/// Register an owner through the API and return their session.
pub async fn register_owner(app: Router, email: &str, business_name: &str) -> Owner {
    let body = serde_json::json!({
        "email": email,
        "password": TEST_PASSWORD,
        "full_name": "Ana Souza",
        "business_name": business_name,
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    Owner {
        user_id: json["user"]["id"].as_i64().unwrap(),
        token: json["access_token"].as_str().unwrap().to_string(),
        business_id: json["business"]["id"].as_i64().unwrap(),
        slug: json["business"]["slug"].as_str().unwrap().to_string(),
    }
}

/// Create a 30-minute service priced at R$ 25,00 and return its id.
pub async fn create_service(app: Router, owner: &Owner, name: &str) -> i64 {
    let body = serde_json::json!({
        "name": name,
        "duration_minutes": 30,
        "price_cents": 2500,
    });
    let uri = format!("/api/businesses/{}/services", owner.business_id);
    let response = post_json_auth(app, &uri, body, &owner.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// A date one week from now, in `YYYY-MM-DD` form.
pub fn next_week() -> String {
    (chrono::Utc::now() + chrono::Duration::days(7))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}
