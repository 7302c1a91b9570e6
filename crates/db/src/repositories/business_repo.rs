//! Repository for the `businesses` table.

use sqlx::{PgExecutor, PgPool};
use agendizo_core::types::DbId;

use crate::models::business::{Business, CreateBusiness, UpdateBusiness};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, slug, description, phone, email, address, \
                        utc_offset_minutes, is_active, created_at, updated_at";

/// Provides CRUD operations for businesses.
pub struct BusinessRepo;

impl BusinessRepo {
    /// Insert a new business, returning the created row.
    ///
    /// Slug uniqueness is enforced by `uq_businesses_slug`; a concurrent
    /// insert with the same slug surfaces as a unique violation.
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        input: &CreateBusiness,
    ) -> Result<Business, sqlx::Error> {
        let query = format!(
            "INSERT INTO businesses
                (owner_id, name, slug, description, phone, email, address, utc_offset_minutes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, -180))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(input.utc_offset_minutes)
            .fetch_one(db)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Business>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM businesses WHERE id = $1");
        sqlx::query_as::<_, Business>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Business>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM businesses WHERE slug = $1");
        sqlx::query_as::<_, Business>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all businesses owned by a user, oldest first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Business>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM businesses WHERE owner_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Business>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `slug` is taken by any business other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM businesses
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Update a business. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBusiness,
    ) -> Result<Option<Business>, sqlx::Error> {
        let query = format!(
            "UPDATE businesses SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                address = COALESCE($7, address),
                utc_offset_minutes = COALESCE($8, utc_offset_minutes),
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(input.utc_offset_minutes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
