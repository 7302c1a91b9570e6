//! Repository for the `business_hours` table.

use sqlx::PgPool;
use agendizo_core::types::DbId;

use crate::models::business::{BusinessHours, DayHours};

const COLUMNS: &str = "id, business_id, weekday, opens_at, closes_at, is_closed";

/// Weekly working hours of a business.
pub struct BusinessHoursRepo;

impl BusinessHoursRepo {
    /// List the configured days of a business ordered Sunday first.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: DbId,
    ) -> Result<Vec<BusinessHours>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM business_hours WHERE business_id = $1 ORDER BY weekday"
        );
        sqlx::query_as::<_, BusinessHours>(&query)
            .bind(business_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the whole week in one transaction.
    ///
    /// Days missing from `days` are removed.
    pub async fn replace_week(
        pool: &PgPool,
        business_id: DbId,
        days: &[DayHours],
    ) -> Result<Vec<BusinessHours>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM business_hours WHERE business_id = $1")
            .bind(business_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO business_hours (business_id, weekday, opens_at, closes_at, is_closed)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(days.len());
        for day in days {
            let row = sqlx::query_as::<_, BusinessHours>(&insert)
                .bind(business_id)
                .bind(day.weekday)
                .bind(day.opens_at)
                .bind(day.closes_at)
                .bind(day.is_closed)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        rows.sort_by_key(|r| r.weekday);
        Ok(rows)
    }
}
