//! Event-to-email routing engine.

use agendizo_core::notification::{Channel, ChannelPreferences, NotificationKind};
use agendizo_db::repositories::NotificationSettingsRepo;
use agendizo_db::DbPool;
use agendizo_events::{AppointmentEmail, BookingEvent, EmailError, EmailNotifier};
use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email error: {0}")]
    Email(#[from] EmailError),
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { to: String },
    Skipped(&'static str),
}

/// Routes booking events to email notifications.
///
/// New public bookings email the business owner. Cancellations email the
/// client. Both respect the owner's channel and event switches. Failed
/// sends are logged and not retried.
pub struct NotificationRouter {
    pool: DbPool,
    notifier: EmailNotifier,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, notifier: EmailNotifier) -> Self {
        Self { pool, notifier }
    }

    /// Run the main routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](agendizo_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<BookingEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => match self.handle_event(&event).await {
                    Ok(DispatchOutcome::Sent { to }) => {
                        tracing::info!(
                            appointment_id = event.appointment_id(),
                            kind = ?event.kind,
                            %to,
                            "Notification sent"
                        );
                    }
                    Ok(DispatchOutcome::Skipped(reason)) => {
                        tracing::debug!(
                            appointment_id = event.appointment_id(),
                            kind = ?event.kind,
                            reason,
                            "Notification skipped"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            appointment_id = event.appointment_id(),
                            kind = ?event.kind,
                            "Failed to route event"
                        );
                    }
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver the notification for a single event.
    pub async fn handle_event(
        &self,
        event: &BookingEvent,
    ) -> Result<DispatchOutcome, NotificationError> {
        let kind = event.notification_kind();
        let detail = &event.appointment;

        let recipient = match kind {
            NotificationKind::NewAppointment => {
                if event.actor_user_id.is_some() {
                    return Ok(DispatchOutcome::Skipped("booked from the dashboard"));
                }
                detail.owner_email.clone()
            }
            _ => match detail.client_email.clone() {
                Some(email) => email,
                None => return Ok(DispatchOutcome::Skipped("client has no email")),
            },
        };

        let preferences = NotificationSettingsRepo::find(&self.pool, detail.owner_id)
            .await?
            .map(|s| s.preferences())
            .unwrap_or_default();
        if !email_wanted(&preferences, kind) {
            return Ok(DispatchOutcome::Skipped("email disabled for this event"));
        }

        let email = AppointmentEmail::from_detail(detail, recipient);
        match kind {
            NotificationKind::NewAppointment => {
                self.notifier.send_new_appointment_email(&email).await?
            }
            NotificationKind::AppointmentReminder => {
                self.notifier.send_appointment_reminder_email(&email).await?
            }
            NotificationKind::AppointmentCancelled => {
                self.notifier.send_appointment_cancelled_email(&email).await?
            }
        }

        Ok(DispatchOutcome::Sent { to: email.to })
    }
}

fn email_wanted(preferences: &ChannelPreferences, kind: NotificationKind) -> bool {
    preferences.channels_for(kind).contains(&Channel::Email)
}
