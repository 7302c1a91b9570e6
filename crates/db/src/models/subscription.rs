//! Billing subscription state mirrored from the payment provider.

use serde::Serialize;
use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub price_id: Option<String>,
    pub status: String,
    pub current_period_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing the subscription of a user.
#[derive(Debug)]
pub struct UpsertSubscription {
    pub user_id: DbId,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub price_id: Option<String>,
    pub status: String,
    pub current_period_end: Option<Timestamp>,
}

impl Subscription {
    /// Whether the subscription currently grants access to paid features.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }
}
