//! Repository for the `notification_settings` table.

use sqlx::{PgExecutor, PgPool};
use agendizo_core::types::DbId;

use crate::models::notification::{NotificationSettings, UpdateNotificationSettings};

const COLUMNS: &str = "user_id, email_enabled, sms_enabled, whatsapp_enabled, \
                        notify_new_appointment, notify_reminder, notify_cancellation, \
                        reminder_hours_before, created_at, updated_at";

/// Provides access to per-user notification settings.
pub struct NotificationSettingsRepo;

impl NotificationSettingsRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_settings WHERE user_id = $1");
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's settings, creating the default row on first access.
    pub async fn get_or_create<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<NotificationSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_settings (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .fetch_one(db)
            .await
    }

    /// Apply a partial update, creating the row with defaults if needed.
    /// Only non-`None` fields in `input` are applied.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateNotificationSettings,
    ) -> Result<NotificationSettings, sqlx::Error> {
        Self::get_or_create(pool, user_id).await?;
        let query = format!(
            "UPDATE notification_settings SET
                email_enabled = COALESCE($2, email_enabled),
                sms_enabled = COALESCE($3, sms_enabled),
                whatsapp_enabled = COALESCE($4, whatsapp_enabled),
                notify_new_appointment = COALESCE($5, notify_new_appointment),
                notify_reminder = COALESCE($6, notify_reminder),
                notify_cancellation = COALESCE($7, notify_cancellation),
                reminder_hours_before = COALESCE($8, reminder_hours_before)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .bind(input.email_enabled)
            .bind(input.sms_enabled)
            .bind(input.whatsapp_enabled)
            .bind(input.notify_new_appointment)
            .bind(input.notify_reminder)
            .bind(input.notify_cancellation)
            .bind(input.reminder_hours_before)
            .fetch_one(pool)
            .await
    }
}
