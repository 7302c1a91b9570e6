//! Appointment reminder emails.
//!
//! Every five minutes, emails each client whose appointment starts within
//! the owner's `reminder_hours_before` window. An appointment is stamped
//! only after its email is accepted, so failed sends are retried on the
//! next pass.

use std::time::Duration;

use agendizo_db::repositories::AppointmentRepo;
use agendizo_events::{AppointmentEmail, EmailNotifier};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

const REMINDER_INTERVAL: Duration = Duration::from_secs(300);

/// Counts from one reminder pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReminderRun {
    pub sent: usize,
    pub failed: usize,
}

/// Run the reminder loop until `cancel` is triggered.
pub async fn run(pool: PgPool, notifier: EmailNotifier, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = REMINDER_INTERVAL.as_secs(),
        "Reminder job started"
    );

    let mut interval = tokio::time::interval(REMINDER_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder job stopping");
                break;
            }
            _ = interval.tick() => {
                match send_due_reminders(&pool, &notifier).await {
                    Ok(run) if run.sent == 0 && run.failed == 0 => {
                        tracing::debug!("Reminders: nothing due");
                    }
                    Ok(run) => {
                        tracing::info!(sent = run.sent, failed = run.failed, "Reminders: pass finished");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reminders: query failed");
                    }
                }
            }
        }
    }
}

/// Send every reminder that is due now.
pub async fn send_due_reminders(
    pool: &PgPool,
    notifier: &EmailNotifier,
) -> Result<ReminderRun, sqlx::Error> {
    let due = AppointmentRepo::list_due_reminders(pool).await?;
    let mut run = ReminderRun::default();

    for detail in due {
        let Some(to) = detail.client_email.clone() else {
            continue;
        };
        let email = AppointmentEmail::from_detail(&detail, to);

        match notifier.send_appointment_reminder_email(&email).await {
            Ok(()) => {
                AppointmentRepo::mark_reminder_sent(pool, detail.id).await?;
                run.sent += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, appointment_id = detail.id, "Reminder send failed");
                run.failed += 1;
            }
        }
    }

    Ok(run)
}
