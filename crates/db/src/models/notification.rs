//! Per-user notification settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use agendizo_core::notification::ChannelPreferences;
use agendizo_core::types::{DbId, Timestamp};

/// Default reminder lead time when no settings row exists.
pub const DEFAULT_REMINDER_HOURS: i32 = 24;

/// A row from the `notification_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationSettings {
    pub user_id: DbId,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub whatsapp_enabled: bool,
    pub notify_new_appointment: bool,
    pub notify_reminder: bool,
    pub notify_cancellation: bool,
    pub reminder_hours_before: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationSettings {
    pub fn preferences(&self) -> ChannelPreferences {
        ChannelPreferences {
            email_enabled: self.email_enabled,
            sms_enabled: self.sms_enabled,
            whatsapp_enabled: self.whatsapp_enabled,
            notify_new_appointment: self.notify_new_appointment,
            notify_reminder: self.notify_reminder,
            notify_cancellation: self.notify_cancellation,
        }
    }
}

/// DTO for updating notification settings. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNotificationSettings {
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub notify_new_appointment: Option<bool>,
    pub notify_reminder: Option<bool>,
    pub notify_cancellation: Option<bool>,
    pub reminder_hours_before: Option<i32>,
}
