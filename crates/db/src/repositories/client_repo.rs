//! Repository for the `clients` table.

use sqlx::PgPool;
use agendizo_core::types::DbId;

use crate::models::client::{Client, CreateClient, UpdateClient};

const COLUMNS: &str = "id, business_id, name, email, phone, notes, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(
        pool: &PgPool,
        business_id: DbId,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (business_id, name, email, phone, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an existing client of the business by phone or email.
    ///
    /// Phone matches win over email matches.
    pub async fn find_by_contact(
        pool: &PgPool,
        business_id: DbId,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Client>, sqlx::Error> {
        if email.is_none() && phone.is_none() {
            return Ok(None);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE business_id = $1
               AND (($3::TEXT IS NOT NULL AND phone = $3)
                    OR ($2::TEXT IS NOT NULL AND LOWER(email) = LOWER($2)))
             ORDER BY (phone = $3) DESC NULLS LAST, id
             LIMIT 1"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .bind(email)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// List clients of a business ordered by name.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: DbId,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clients WHERE business_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client and, by cascade, their appointments.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
