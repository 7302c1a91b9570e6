//! REST client for the Stripe checkout endpoints.

use serde::{Deserialize, Serialize};

use crate::config::StripeConfig;

/// HTTP client for the Stripe API.
pub struct StripeApi {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
}

/// Inputs for a subscription checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Our user id, echoed back as `client_reference_id` in the webhook.
    pub client_reference_id: String,
    pub customer_email: Option<String>,
    /// Existing Stripe customer to attach instead of creating a new one.
    pub customer_id: Option<String>,
}

/// The part of a created checkout session we use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout page the browser is redirected to.
    pub url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Stripe returned a non-2xx status code.
    #[error("Stripe API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl StripeApi {
    pub fn new(config: &StripeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &StripeConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }

    /// Create a hosted checkout session in `subscription` mode.
    ///
    /// Sends `POST /checkout/sessions` with form-encoded parameters.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(&checkout_params(request))
            .send()
            .await?;

        let session: CheckoutSession = Self::parse_response(response).await?;
        tracing::info!(session_id = %session.id, "Stripe checkout session created");
        Ok(session)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BillingError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BillingError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BillingError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Form fields for `POST /checkout/sessions`.
fn checkout_params(request: &CheckoutSessionRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("client_reference_id", request.client_reference_id.clone()),
        ("metadata[user_id]", request.client_reference_id.clone()),
    ];
    match (&request.customer_id, &request.customer_email) {
        (Some(customer), _) => params.push(("customer", customer.clone())),
        (None, Some(email)) => params.push(("customer_email", email.clone())),
        (None, None) => {}
    }
    params
}
