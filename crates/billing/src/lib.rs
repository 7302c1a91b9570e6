//! Subscription billing through Stripe hosted checkout.
//!
//! - [`StripeConfig`] is read from the environment; billing is disabled
//!   when no secret key is configured.
//! - [`StripeApi`] creates checkout sessions.
//! - [`webhook`] verifies and decodes the events Stripe posts back.

pub mod api;
pub mod config;
pub mod webhook;

pub use api::{BillingError, CheckoutSession, CheckoutSessionRequest, StripeApi};
pub use config::StripeConfig;
pub use webhook::{WebhookError, WebhookEvent};
