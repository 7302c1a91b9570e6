//! Billing routes, merged at the API root.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// ```text
/// GET  /subscription     -> get_subscription
/// POST /checkout         -> checkout
/// POST /webhooks/stripe  -> stripe_webhook (signature-checked, no session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscription", get(billing::get_subscription))
        .route("/checkout", post(billing::checkout))
        .route("/webhooks/stripe", post(billing::stripe_webhook))
}
