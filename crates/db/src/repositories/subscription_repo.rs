//! Repository for the `subscriptions` table.

use sqlx::PgPool;
use agendizo_core::types::{DbId, Timestamp};

use crate::models::subscription::{Subscription, UpsertSubscription};

const COLUMNS: &str = "id, user_id, stripe_customer_id, stripe_subscription_id, price_id, \
                        status, current_period_end, created_at, updated_at";

/// Provides access to the one subscription row each user may have.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the user's subscription or overwrite the existing one.
    ///
    /// Provider ids already stored are kept when the input omits them.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions
                (user_id, stripe_customer_id, stripe_subscription_id, price_id, status,
                 current_period_end)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                stripe_customer_id = COALESCE(EXCLUDED.stripe_customer_id,
                                              subscriptions.stripe_customer_id),
                stripe_subscription_id = COALESCE(EXCLUDED.stripe_subscription_id,
                                                  subscriptions.stripe_subscription_id),
                price_id = COALESCE(EXCLUDED.price_id, subscriptions.price_id),
                status = EXCLUDED.status,
                current_period_end = COALESCE(EXCLUDED.current_period_end,
                                              subscriptions.current_period_end)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(input.user_id)
            .bind(&input.stripe_customer_id)
            .bind(&input.stripe_subscription_id)
            .bind(&input.price_id)
            .bind(&input.status)
            .bind(input.current_period_end)
            .fetch_one(pool)
            .await
    }

    /// Update status, price and period end by provider subscription id.
    /// A missing price or period end keeps the stored value.
    ///
    /// Returns `None` when no local row references that subscription.
    pub async fn update_by_stripe_subscription(
        pool: &PgPool,
        stripe_subscription_id: &str,
        status: &str,
        price_id: Option<&str>,
        current_period_end: Option<Timestamp>,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                status = $2,
                price_id = COALESCE($3, price_id),
                current_period_end = COALESCE($4, current_period_end)
             WHERE stripe_subscription_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(stripe_subscription_id)
            .bind(status)
            .bind(price_id)
            .bind(current_period_end)
            .fetch_optional(pool)
            .await
    }
}
