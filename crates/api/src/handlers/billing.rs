//! Handlers for subscription billing: status, checkout and the Stripe
//! webhook.

use agendizo_billing::webhook::{parse_event, verify_signature, DEFAULT_TOLERANCE_SECS};
use agendizo_billing::{CheckoutSessionRequest, StripeApi, StripeConfig, WebhookEvent};
use agendizo_core::error::CoreError;
use agendizo_db::models::subscription::{Subscription, UpsertSubscription};
use agendizo_db::repositories::{SubscriptionRepo, UserRepo};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Status stored when a checkout completes; later webhooks refine it.
const STATUS_ACTIVE: &str = "active";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Falls back to the configured default price.
    pub price_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<Subscription>,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/subscription
pub async fn get_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<SubscriptionResponse>> {
    let subscription = SubscriptionRepo::find_for_user(&state.pool, user.user_id).await?;
    let is_active = subscription.as_ref().is_some_and(Subscription::is_active);
    Ok(Json(SubscriptionResponse {
        subscription,
        is_active,
    }))
}

/// POST /api/checkout
///
/// Creates a hosted checkout session and returns the URL to redirect to.
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let (config, api) = billing(&state)?;

    let price_id = input
        .price_id
        .filter(|p| !p.is_empty())
        .or_else(|| config.default_price_id.clone())
        .ok_or_else(|| AppError::BadRequest("price_id is required".into()))?;

    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    let existing = SubscriptionRepo::find_for_user(&state.pool, user.user_id).await?;
    let customer_id = existing.and_then(|s| s.stripe_customer_id);

    let billing_url = format!("{}/dashboard/billing", state.config.site_url);
    let request = CheckoutSessionRequest {
        price_id,
        success_url: format!("{billing_url}?checkout=success"),
        cancel_url: format!("{billing_url}?checkout=cancelled"),
        client_reference_id: user.user_id.to_string(),
        customer_email: customer_id.is_none().then(|| account.email.clone()),
        customer_id,
    };

    let session = api
        .create_checkout_session(&request)
        .await
        .map_err(|e| AppError::InternalError(format!("Checkout session failed: {e}")))?;
    let url = session
        .url
        .ok_or_else(|| AppError::InternalError("Checkout session has no URL".into()))?;

    Ok(Json(CheckoutResponse {
        url,
        session_id: session.id,
    }))
}

/// POST /api/webhooks/stripe
///
/// Verifies the `Stripe-Signature` header against the raw body, then
/// mirrors subscription state into `subscriptions`.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let (config, _) = billing(&state)?;
    let secret = config
        .webhook_secret
        .as_deref()
        .ok_or_else(|| AppError::InternalError("Webhook secret is not configured".into()))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;

    verify_signature(
        &body,
        signature,
        secret,
        Utc::now().timestamp(),
        DEFAULT_TOLERANCE_SECS,
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let event = parse_event(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    apply_webhook_event(&state, event).await?;

    Ok(Json(WebhookAck { received: true }))
}

async fn apply_webhook_event(state: &AppState, event: WebhookEvent) -> AppResult<()> {
    match event {
        WebhookEvent::CheckoutCompleted {
            user_id,
            customer_id,
            subscription_id,
        } => {
            let Some(user_id) = user_id else {
                tracing::warn!("Checkout completed without a client reference, ignoring");
                return Ok(());
            };
            if UserRepo::find_by_id(&state.pool, user_id).await?.is_none() {
                tracing::warn!(user_id, "Checkout completed for unknown user, ignoring");
                return Ok(());
            }
            let subscription = SubscriptionRepo::upsert(
                &state.pool,
                &UpsertSubscription {
                    user_id,
                    stripe_customer_id: customer_id,
                    stripe_subscription_id: subscription_id,
                    price_id: None,
                    status: STATUS_ACTIVE.to_string(),
                    current_period_end: None,
                },
            )
            .await?;
            tracing::info!(user_id, status = %subscription.status, "Subscription activated");
        }
        WebhookEvent::SubscriptionChanged {
            subscription_id,
            status,
            price_id,
            current_period_end,
            ..
        } => {
            let updated = SubscriptionRepo::update_by_stripe_subscription(
                &state.pool,
                &subscription_id,
                &status,
                price_id.as_deref(),
                current_period_end,
            )
            .await?;
            match updated {
                Some(s) => {
                    tracing::info!(user_id = s.user_id, status = %s.status, "Subscription updated");
                }
                None => {
                    tracing::warn!(%subscription_id, "Webhook for unknown subscription, ignoring");
                }
            }
        }
        WebhookEvent::Ignored(event_type) => {
            tracing::debug!(%event_type, "Ignoring Stripe event");
        }
    }
    Ok(())
}

fn billing(state: &AppState) -> AppResult<(&StripeConfig, &StripeApi)> {
    match (state.config.stripe.as_ref(), state.stripe.as_deref()) {
        (Some(config), Some(api)) => Ok((config, api)),
        _ => Err(AppError::InternalError("Billing is not configured".into())),
    }
}
