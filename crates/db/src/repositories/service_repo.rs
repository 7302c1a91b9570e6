//! Repository for the `services` table.

use sqlx::PgPool;
use agendizo_core::types::DbId;

use crate::models::service::{CreateService, Service, UpdateService};

const COLUMNS: &str = "id, business_id, name, description, duration_minutes, price_cents, \
                        is_active, created_at, updated_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn create(
        pool: &PgPool,
        business_id: DbId,
        input: &CreateService,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (business_id, name, description, duration_minutes, price_cents)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(business_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List services of a business ordered by name.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services
             WHERE business_id = $1 AND ($2 OR is_active = true)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(business_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a service. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                duration_minutes = COALESCE($4, duration_minutes),
                price_cents = COALESCE($5, price_cents),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(input.price_cents)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hide a service from the booking page. Existing appointments keep
    /// referencing it, so rows are never hard-deleted.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE services SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
