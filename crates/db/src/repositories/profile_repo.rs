//! Repository for the `profiles` table.

use sqlx::{PgExecutor, PgPool};
use agendizo_core::types::DbId;

use crate::models::profile::{Profile, UpdateProfile};

const COLUMNS: &str = "user_id, full_name, phone, theme, locale, created_at, updated_at";

/// Provides read/write access to owner profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert the profile row created alongside a new account.
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, full_name, phone)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(full_name)
            .bind(phone)
            .fetch_one(db)
            .await
    }

    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                theme = COALESCE($4, theme),
                locale = COALESCE($5, locale)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.theme)
            .bind(&input.locale)
            .fetch_optional(pool)
            .await
    }
}
