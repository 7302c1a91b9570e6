//! Marks appointments as completed once their end time has passed.
//!
//! Runs every minute. "Passed" is judged in each business's local time.

use std::time::Duration;

use agendizo_db::repositories::AppointmentRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the completion sweep until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Appointment auto-complete job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Appointment auto-complete job stopping");
                break;
            }
            _ = interval.tick() => {
                match AppointmentRepo::complete_elapsed(&pool).await {
                    Ok(0) => tracing::debug!("Auto-complete: nothing elapsed"),
                    Ok(completed) => {
                        tracing::info!(completed, "Auto-complete: marked appointments completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Auto-complete: sweep failed");
                    }
                }
            }
        }
    }
}
