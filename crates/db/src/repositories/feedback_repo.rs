//! Repository for the `feedback` table.

use sqlx::PgPool;
use agendizo_core::types::DbId;

use crate::models::feedback::{CreateFeedback, Feedback};

const COLUMNS: &str = "id, business_id, client_name, rating, comment, created_at";

/// Provides insert and read access to public feedback.
pub struct FeedbackRepo;

impl FeedbackRepo {
    pub async fn create(
        pool: &PgPool,
        business_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (business_id, client_name, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(business_id)
            .bind(&input.client_name)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Most recent feedback first, capped at `limit` rows.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: DbId,
        limit: i64,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE business_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(business_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every rating left for the business, used for the average.
    pub async fn ratings_for_business(
        pool: &PgPool,
        business_id: DbId,
    ) -> Result<Vec<i16>, sqlx::Error> {
        sqlx::query_scalar::<_, i16>("SELECT rating FROM feedback WHERE business_id = $1")
            .bind(business_id)
            .fetch_all(pool)
            .await
    }
}
