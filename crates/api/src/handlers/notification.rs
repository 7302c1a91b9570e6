//! Handlers for notification settings and test sends.

use agendizo_core::error::CoreError;
use agendizo_core::notification::Channel;
use agendizo_core::types::DbId;
use agendizo_db::models::notification::{NotificationSettings, UpdateNotificationSettings};
use agendizo_db::repositories::{BusinessRepo, NotificationSettingsRepo, UserRepo};
use agendizo_events::{AppointmentEmail, EmailNotifier};
use axum::extract::State;
use axum::Json;
use chrono::{Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const SAMPLE_CLIENT: &str = "Cliente de teste";
const SAMPLE_SERVICE: &str = "Serviço de teste";
const SAMPLE_PRICE_CENTS: i64 = 5000;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub notify_new_appointment: Option<bool>,
    pub notify_reminder: Option<bool>,
    pub notify_cancellation: Option<bool>,
    #[validate(range(min = 1, max = 168, message = "must be between 1 and 168 hours"))]
    pub reminder_hours_before: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct ChannelResult {
    pub channel: Channel,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestNotificationResponse {
    pub results: Vec<ChannelResult>,
}

#[derive(Debug, Serialize)]
pub struct TestEmailResponse {
    pub sent: bool,
    pub to: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/notifications/settings
///
/// Creates the default row on first access.
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<NotificationSettings>> {
    let settings = NotificationSettingsRepo::get_or_create(&state.pool, user.user_id).await?;
    Ok(Json(settings))
}

/// PUT /api/notifications/settings
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateSettingsRequest>,
) -> AppResult<Json<NotificationSettings>> {
    input.validate()?;

    let update = UpdateNotificationSettings {
        email_enabled: input.email_enabled,
        sms_enabled: input.sms_enabled,
        whatsapp_enabled: input.whatsapp_enabled,
        notify_new_appointment: input.notify_new_appointment,
        notify_reminder: input.notify_reminder,
        notify_cancellation: input.notify_cancellation,
        reminder_hours_before: input.reminder_hours_before,
    };
    let settings = NotificationSettingsRepo::upsert(&state.pool, user.user_id, &update).await?;
    Ok(Json(settings))
}

// ---------------------------------------------------------------------------
// Test sends
// ---------------------------------------------------------------------------

/// POST /api/notifications/test
///
/// Sends a sample notification over every enabled channel. Only email has
/// a delivery backend; SMS and WhatsApp are reported as skipped.
pub async fn send_test(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<TestNotificationResponse>> {
    let settings = NotificationSettingsRepo::get_or_create(&state.pool, user.user_id).await?;
    let channels = settings.preferences().enabled_channels();
    if channels.is_empty() {
        return Err(AppError::BadRequest(
            "No notification channel is enabled".into(),
        ));
    }

    let mut results = Vec::with_capacity(channels.len());
    for channel in channels {
        let result = match channel {
            Channel::Email => match state.notifier.as_ref() {
                Some(notifier) => {
                    let email = sample_email(&state, user.user_id).await?;
                    match notifier.send_new_appointment_email(&email).await {
                        Ok(()) => ChannelResult {
                            channel,
                            status: DeliveryStatus::Sent,
                            detail: None,
                        },
                        Err(e) => ChannelResult {
                            channel,
                            status: DeliveryStatus::Failed,
                            detail: Some(e.to_string()),
                        },
                    }
                }
                None => ChannelResult {
                    channel,
                    status: DeliveryStatus::Skipped,
                    detail: Some("Email delivery is not configured".into()),
                },
            },
            Channel::Sms | Channel::WhatsApp => ChannelResult {
                channel,
                status: DeliveryStatus::Skipped,
                detail: Some(format!("No {} provider is configured", channel.as_str())),
            },
        };
        results.push(result);
    }

    Ok(Json(TestNotificationResponse { results }))
}

/// POST /api/test-email
///
/// Sends a sample new-appointment email to the signed-in owner.
pub async fn send_test_email(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<TestEmailResponse>> {
    let notifier = configured_notifier(&state)?;
    let email = sample_email(&state, user.user_id).await?;

    notifier
        .send_new_appointment_email(&email)
        .await
        .map_err(|e| AppError::InternalError(format!("Test email failed: {e}")))?;

    tracing::info!(user_id = user.user_id, "Test email sent");
    Ok(Json(TestEmailResponse {
        sent: true,
        to: email.to,
    }))
}

fn configured_notifier(state: &AppState) -> AppResult<&EmailNotifier> {
    state
        .notifier
        .as_ref()
        .ok_or_else(|| AppError::InternalError("Email delivery is not configured".into()))
}

/// A new-appointment email for tomorrow at 10:00, addressed to the owner.
async fn sample_email(state: &AppState, user_id: DbId) -> AppResult<AppointmentEmail> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    let business_name = BusinessRepo::list_for_owner(&state.pool, user_id)
        .await?
        .into_iter()
        .next()
        .map(|b| b.name)
        .unwrap_or_else(|| "Agendizo".to_string());

    Ok(AppointmentEmail {
        to: user.email,
        business_name,
        client_name: SAMPLE_CLIENT.to_string(),
        service_name: SAMPLE_SERVICE.to_string(),
        date: (Utc::now() + Duration::days(1)).date_naive(),
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        price_cents: SAMPLE_PRICE_CENTS,
    })
}
