//! Repository for the `appointments` table.

use sqlx::PgPool;
use agendizo_core::appointment::{STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING};
use agendizo_core::types::DbId;

use crate::models::appointment::{
    Appointment, AppointmentDetail, AppointmentFilter, CreateAppointment,
};
use crate::models::notification::DEFAULT_REMINDER_HOURS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, business_id, service_id, client_id, appointment_date, start_time, \
                        end_time, status, notes, reminder_sent_at, created_at, updated_at";

/// Select list and joins producing an [`AppointmentDetail`].
const DETAIL_SELECT: &str = "SELECT a.id, a.business_id, b.name AS business_name, b.owner_id, \
        u.email AS owner_email, a.service_id, s.name AS service_name, s.price_cents, \
        a.client_id, c.name AS client_name, c.email AS client_email, c.phone AS client_phone, \
        a.appointment_date, a.start_time, a.end_time, a.status, a.notes, a.created_at \
     FROM appointments a \
     JOIN businesses b ON b.id = a.business_id \
     JOIN users u ON u.id = b.owner_id \
     JOIN services s ON s.id = a.service_id \
     JOIN clients c ON c.id = a.client_id";

/// Local wall-clock "now" of the business joined as `b`.
const BUSINESS_LOCAL_NOW: &str =
    "((NOW() AT TIME ZONE 'UTC') + make_interval(mins => b.utc_offset_minutes))";

/// Provides CRUD operations and sweeps for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments
                (business_id, service_id, client_id, appointment_date, start_time, end_time,
                 status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.business_id)
            .bind(input.service_id)
            .bind(input.client_id)
            .bind(input.appointment_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load an appointment joined with its business, service and client.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AppointmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, AppointmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a business's appointments, optionally bounded by date range and
    /// filtered by status. Ordered chronologically.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: DbId,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.business_id = $1
               AND ($2::DATE IS NULL OR a.appointment_date >= $2)
               AND ($3::DATE IS NULL OR a.appointment_date <= $3)
               AND ($4::TEXT IS NULL OR a.status = $4)
             ORDER BY a.appointment_date, a.start_time, a.id"
        );
        sqlx::query_as::<_, AppointmentDetail>(&query)
            .bind(business_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.status)
            .fetch_all(pool)
            .await
    }

    /// Set the status of an appointment. No transition guards apply.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an appointment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every pending or confirmed appointment whose end time has passed
    /// (in its business's local time) as completed.
    ///
    /// Returns the number of rows updated.
    pub async fn complete_elapsed(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE appointments a SET status = $1
             FROM businesses b
             WHERE b.id = a.business_id
               AND a.status IN ($2, $3)
               AND (a.appointment_date + a.end_time) < {BUSINESS_LOCAL_NOW}"
        );
        let result = sqlx::query(&query)
            .bind(STATUS_COMPLETED)
            .bind(STATUS_PENDING)
            .bind(STATUS_CONFIRMED)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Appointments that should receive a reminder now.
    ///
    /// An appointment is due when it is pending or confirmed, has not been
    /// reminded yet, its client has an email, its owner has reminders and
    /// email enabled (defaults apply when no settings row exists), and it
    /// starts within the owner's `reminder_hours_before` window.
    pub async fn list_due_reminders(pool: &PgPool) -> Result<Vec<AppointmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             LEFT JOIN notification_settings ns ON ns.user_id = b.owner_id
             WHERE a.status IN ($1, $2)
               AND a.reminder_sent_at IS NULL
               AND c.email IS NOT NULL
               AND COALESCE(ns.email_enabled, true)
               AND COALESCE(ns.notify_reminder, true)
               AND (a.appointment_date + a.start_time) > {BUSINESS_LOCAL_NOW}
               AND (a.appointment_date + a.start_time) <= {BUSINESS_LOCAL_NOW}
                    + make_interval(hours => COALESCE(ns.reminder_hours_before, $3))
             ORDER BY a.appointment_date, a.start_time, a.id"
        );
        sqlx::query_as::<_, AppointmentDetail>(&query)
            .bind(STATUS_PENDING)
            .bind(STATUS_CONFIRMED)
            .bind(DEFAULT_REMINDER_HOURS)
            .fetch_all(pool)
            .await
    }

    /// Stamp `reminder_sent_at` so the reminder is not sent twice.
    pub async fn mark_reminder_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE appointments SET reminder_sent_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
