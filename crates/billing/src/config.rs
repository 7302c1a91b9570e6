/// Default Stripe REST base URL.
pub const DEFAULT_API_URL: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Signing secret for `POST /api/webhooks/stripe`.
    pub webhook_secret: Option<String>,
    /// Exposed to the browser through `GET /api/config`.
    pub publishable_key: Option<String>,
    /// Price used when the checkout request does not name one.
    pub default_price_id: Option<String>,
    pub api_url: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `STRIPE_SECRET_KEY` is not set or empty.
    ///
    /// | Variable                 | Required | Default                     |
    /// |--------------------------|----------|-----------------------------|
    /// | `STRIPE_SECRET_KEY`      | yes      |                             |
    /// | `STRIPE_WEBHOOK_SECRET`  | no       |                             |
    /// | `STRIPE_PUBLISHABLE_KEY` | no       |                             |
    /// | `STRIPE_PRICE_ID`        | no       |                             |
    /// | `STRIPE_API_URL`         | no       | `https://api.stripe.com/v1` |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())?;
        Some(Self {
            secret_key,
            webhook_secret: non_empty_var("STRIPE_WEBHOOK_SECRET"),
            publishable_key: non_empty_var("STRIPE_PUBLISHABLE_KEY"),
            default_price_id: non_empty_var("STRIPE_PRICE_ID"),
            api_url: non_empty_var("STRIPE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
