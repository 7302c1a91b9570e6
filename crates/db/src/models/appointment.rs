//! Appointment model, joined detail view and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use agendizo_core::types::{DbId, Timestamp};

/// A row from the `appointments` table.
///
/// `status` holds one of the values of
/// [`AppointmentStatus`](agendizo_core::appointment::AppointmentStatus).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub business_id: DbId,
    pub service_id: DbId,
    pub client_id: DbId,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub reminder_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An appointment joined with its business, owner, service and client.
///
/// This is what dashboard listings return and what the notification layer
/// needs to build an email payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentDetail {
    pub id: DbId,
    pub business_id: DbId,
    pub business_name: String,
    pub owner_id: DbId,
    pub owner_email: String,
    pub service_id: DbId,
    pub service_name: String,
    pub price_cents: i64,
    pub client_id: DbId,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting an appointment. Times are already resolved.
#[derive(Debug)]
pub struct CreateAppointment {
    pub business_id: DbId,
    pub service_id: DbId,
    pub client_id: DbId,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
}

/// Filters for listing a business's appointments.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
}
