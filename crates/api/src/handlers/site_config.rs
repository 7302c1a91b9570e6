//! GET /api/config: the settings the web app needs before sign-in.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Public configuration. Never includes secrets.
#[derive(Debug, Serialize)]
pub struct PublicConfig {
    pub site_url: String,
    pub billing_enabled: bool,
    pub stripe_publishable_key: Option<String>,
    pub stripe_price_id: Option<String>,
    pub email_enabled: bool,
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<PublicConfig> {
    let stripe = state.config.stripe.as_ref();
    Json(PublicConfig {
        site_url: state.config.site_url.clone(),
        billing_enabled: state.stripe.is_some(),
        stripe_publishable_key: stripe.and_then(|s| s.publishable_key.clone()),
        stripe_price_id: stripe.and_then(|s| s.default_price_id.clone()),
        email_enabled: state.notifier.is_some(),
    })
}
