//! Handlers for appointments in the owner dashboard.
//!
//! Status changes are direct field updates with no transition guards.
//! Cancelling (by status or by deletion) publishes
//! [`BookingEvent::cancelled`] so the client is told.

use agendizo_core::appointment::{end_time_for, AppointmentStatus};
use agendizo_core::error::CoreError;
use agendizo_core::types::DbId;
use agendizo_db::models::appointment::{AppointmentDetail, AppointmentFilter, CreateAppointment};
use agendizo_db::repositories::{AppointmentRepo, ClientRepo, ServiceRepo};
use agendizo_db::DbPool;
use agendizo_events::BookingEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{non_blank, owned_business};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: DbId,
    pub client_id: DbId,
    pub appointment_date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    pub notes: Option<String>,
    /// Defaults to `pending`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/businesses/{id}/appointments?from=&to=&status=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
    Query(filter): Query<AppointmentFilter>,
) -> AppResult<Json<DataResponse<Vec<AppointmentDetail>>>> {
    owned_business(&state.pool, &user, business_id).await?;
    if let Some(status) = filter.status.as_deref() {
        parse_status(status)?;
    }

    let appointments = AppointmentRepo::list_for_business(&state.pool, business_id, &filter).await?;
    Ok(Json(DataResponse::new(appointments)))
}

/// POST /api/businesses/{id}/appointments
///
/// Booked by the owner for an existing client. The owner is the actor, so
/// no new-appointment email goes out.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
    Json(input): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<AppointmentDetail>)> {
    owned_business(&state.pool, &user, business_id).await?;

    let status = match input.status.as_deref() {
        Some(status) => parse_status(status)?,
        None => AppointmentStatus::Pending,
    };
    let start_time = parse_start_time(&input.start_time)?;

    let service = ServiceRepo::find_by_id(&state.pool, input.service_id)
        .await?
        .filter(|s| s.business_id == business_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: input.service_id,
        }))?;
    let client = ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .filter(|c| c.business_id == business_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        }))?;

    let end_time = end_time_for(start_time, service.duration_minutes).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "start_time: appointment must end before midnight".into(),
        ))
    })?;

    let appointment = AppointmentRepo::create(
        &state.pool,
        &CreateAppointment {
            business_id,
            service_id: service.id,
            client_id: client.id,
            appointment_date: input.appointment_date,
            start_time,
            end_time,
            status: status.as_str().to_string(),
            notes: non_blank(input.notes),
        },
    )
    .await?;

    let detail = load_detail(&state.pool, appointment.id).await?;
    state
        .event_bus
        .publish(BookingEvent::created(detail.clone()).with_actor(user.user_id));

    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/appointments/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppointmentDetail>> {
    let status = parse_status(&input.status)?;
    let before = owned_appointment(&state.pool, &user, id).await?;

    AppointmentRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;
    let detail = load_detail(&state.pool, id).await?;

    tracing::info!(
        appointment_id = id,
        from = %before.status,
        to = %status,
        "Appointment status changed"
    );

    if status == AppointmentStatus::Cancelled && before.status != status.as_str() {
        state
            .event_bus
            .publish(BookingEvent::cancelled(detail.clone()).with_actor(user.user_id));
    }

    Ok(Json(detail))
}

/// DELETE /api/appointments/{id}
///
/// Removes the appointment. If it was still pending or confirmed the
/// client gets a cancellation email.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let detail = owned_appointment(&state.pool, &user, id).await?;

    if !AppointmentRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }));
    }
    tracing::info!(appointment_id = id, business_id = detail.business_id, "Appointment deleted");

    let was_active = parse_status(&detail.status)
        .map(|s| !s.is_terminal())
        .unwrap_or(false);
    if was_active {
        state
            .event_bus
            .publish(BookingEvent::cancelled(detail).with_actor(user.user_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`.
pub(crate) fn parse_start_time(raw: &str) -> AppResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "start_time: '{raw}' is not a valid HH:MM time"
            )))
        })
}

fn parse_status(raw: &str) -> AppResult<AppointmentStatus> {
    raw.parse::<AppointmentStatus>()
        .map_err(|e| AppError::Core(CoreError::Validation(format!("status: {e}"))))
}

async fn load_detail(pool: &DbPool, id: DbId) -> AppResult<AppointmentDetail> {
    AppointmentRepo::find_detail(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))
}

async fn owned_appointment(
    pool: &DbPool,
    user: &AuthUser,
    id: DbId,
) -> AppResult<AppointmentDetail> {
    let detail = load_detail(pool, id).await?;
    if detail.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Appointment belongs to another account".into(),
        )));
    }
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn start_time_accepts_minutes_and_seconds() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_start_time("14:30").unwrap(), expected);
        assert_eq!(parse_start_time(" 14:30:00 ").unwrap(), expected);
    }

    #[test]
    fn start_time_rejects_garbage() {
        assert_matches!(
            parse_start_time("2pm"),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.starts_with("start_time")
        );
        assert!(parse_start_time("25:00").is_err());
    }

    #[test]
    fn status_errors_are_validation_errors() {
        assert_eq!(parse_status("confirmed").unwrap(), AppointmentStatus::Confirmed);
        assert_matches!(
            parse_status("archived"),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
