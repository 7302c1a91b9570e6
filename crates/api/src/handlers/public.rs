//! Unauthenticated handlers behind a business's public booking page.

use agendizo_core::appointment::{end_time_for, local_now, AppointmentStatus};
use agendizo_core::error::CoreError;
use agendizo_core::phone::whatsapp_number;
use agendizo_core::rating::average_rating;
use agendizo_core::types::DbId;
use agendizo_db::models::appointment::CreateAppointment;
use agendizo_db::models::business::{Business, BusinessHours};
use agendizo_db::models::feedback::{CreateFeedback, Feedback};
use agendizo_db::models::service::Service;
use agendizo_db::repositories::{
    AppointmentRepo, BusinessHoursRepo, BusinessRepo, ClientRepo, FeedbackRepo, ServiceRepo,
};
use agendizo_db::DbPool;
use agendizo_events::BookingEvent;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::appointment::parse_start_time;
use crate::handlers::client::{normalize_new, ClientRequest};
use crate::handlers::{blank_as_none, non_blank, not_blank};
use crate::state::AppState;

/// Feedback entries shown on the booking page.
const FEEDBACK_PAGE_SIZE: i64 = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Public view of a business; internal flags and the owner stay hidden.
#[derive(Debug, Serialize)]
pub struct PublicBusiness {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// Digits for a `wa.me` link.
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<Business> for PublicBusiness {
    fn from(b: Business) -> Self {
        Self {
            id: b.id,
            whatsapp: b.phone.as_deref().and_then(whatsapp_number),
            name: b.name,
            slug: b.slug,
            description: b.description,
            phone: b.phone,
            email: b.email,
            address: b.address,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicPage {
    pub business: PublicBusiness,
    pub services: Vec<Service>,
    pub hours: Vec<BusinessHours>,
    pub feedback: Vec<Feedback>,
    pub average_rating: Option<f64>,
    pub rating_count: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingRequest {
    pub service_id: DbId,
    pub appointment_date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    #[validate(
        length(min = 1, max = 120, message = "is required"),
        custom(function = "not_blank")
    )]
    pub client_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "must be a valid email address"))]
    pub client_email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub client_phone: Option<String>,
    #[validate(length(max = 1000, message = "is too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub id: DbId,
    pub status: String,
    pub service_name: String,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(
        length(min = 1, max = 120, message = "is required"),
        custom(function = "not_blank")
    )]
    pub client_name: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 2000, message = "is too long"))]
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/public/businesses/{slug}
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PublicPage>> {
    let business = active_business(&state.pool, &slug).await?;

    let services = ServiceRepo::list_for_business(&state.pool, business.id, false).await?;
    let hours = BusinessHoursRepo::list_for_business(&state.pool, business.id).await?;
    let feedback = FeedbackRepo::list_for_business(&state.pool, business.id, FEEDBACK_PAGE_SIZE).await?;
    let ratings = FeedbackRepo::ratings_for_business(&state.pool, business.id).await?;

    Ok(Json(PublicPage {
        business: business.into(),
        services,
        hours,
        feedback,
        average_rating: average_rating(&ratings),
        rating_count: ratings.len(),
    }))
}

/// POST /api/public/businesses/{slug}/appointments
///
/// Books a pending appointment for a walk-up client. The client is matched
/// by phone or email, or created. The owner is emailed through the event
/// bus.
pub async fn book(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<BookingConfirmation>)> {
    input.validate()?;
    let client_request = ClientRequest {
        name: input.client_name,
        email: input.client_email,
        phone: input.client_phone,
        notes: None,
    };
    if client_request.email.is_none() && client_request.phone.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "client_email: an email or a phone number is required".into(),
        )));
    }

    let business = active_business(&state.pool, &slug).await?;
    let service = ServiceRepo::find_by_id(&state.pool, input.service_id)
        .await?
        .filter(|s| s.business_id == business.id && s.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: input.service_id,
        }))?;

    let start_time = parse_start_time(&input.start_time)?;
    let hours = BusinessHoursRepo::list_for_business(&state.pool, business.id).await?;
    let end_time = check_slot(
        local_now(Utc::now(), business.utc_offset_minutes),
        input.appointment_date,
        start_time,
        service.duration_minutes,
        &hours,
    )?;

    let new_client = normalize_new(client_request);
    let client = match ClientRepo::find_by_contact(
        &state.pool,
        business.id,
        new_client.email.as_deref(),
        new_client.phone.as_deref(),
    )
    .await?
    {
        Some(existing) => existing,
        None => ClientRepo::create(&state.pool, business.id, &new_client).await?,
    };

    let appointment = AppointmentRepo::create(
        &state.pool,
        &CreateAppointment {
            business_id: business.id,
            service_id: service.id,
            client_id: client.id,
            appointment_date: input.appointment_date,
            start_time,
            end_time,
            status: AppointmentStatus::Pending.as_str().to_string(),
            notes: non_blank(input.notes),
        },
    )
    .await?;

    tracing::info!(
        appointment_id = appointment.id,
        business_id = business.id,
        client_id = client.id,
        "Public booking received"
    );

    if let Some(detail) = AppointmentRepo::find_detail(&state.pool, appointment.id).await? {
        state.event_bus.publish(BookingEvent::created(detail));
    }

    Ok((
        StatusCode::CREATED,
        Json(BookingConfirmation {
            id: appointment.id,
            status: appointment.status,
            service_name: service.name,
            appointment_date: appointment.appointment_date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
        }),
    ))
}

/// POST /api/public/businesses/{slug}/feedback
pub async fn leave_feedback(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    input.validate()?;
    let business = active_business(&state.pool, &slug).await?;

    let feedback = FeedbackRepo::create(
        &state.pool,
        business.id,
        &CreateFeedback {
            client_name: input.client_name.trim().to_string(),
            rating: input.rating,
            comment: non_blank(input.comment),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn active_business(pool: &DbPool, slug: &str) -> AppResult<Business> {
    BusinessRepo::find_by_slug(pool, slug)
        .await?
        .filter(|b| b.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundBy {
                entity: "Business",
                field: "slug",
                value: slug.to_string(),
            })
        })
}

/// Check a requested slot against the clock and the working hours and
/// return its end time.
///
/// With no hours configured every day is open all day.
fn check_slot(
    now_local: NaiveDateTime,
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: i32,
    hours: &[BusinessHours],
) -> AppResult<NaiveTime> {
    let end = end_time_for(start, duration_minutes).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "start_time: appointment must end before midnight".into(),
        ))
    })?;

    if date.and_time(start) <= now_local {
        return Err(AppError::Core(CoreError::Validation(
            "appointment_date: must be in the future".into(),
        )));
    }

    if hours.is_empty() {
        return Ok(end);
    }

    let weekday = date.weekday().num_days_from_sunday() as i16;
    let day = hours
        .iter()
        .find(|h| h.weekday == weekday && !h.is_closed)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "appointment_date: the business is closed on that day".into(),
            ))
        })?;

    match (day.opens_at, day.closes_at) {
        (Some(opens), Some(closes)) if start >= opens && end <= closes => Ok(end),
        _ => Err(AppError::Core(CoreError::Validation(
            "start_time: outside working hours".into(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-03-14 is a Saturday (weekday 6).
    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn friday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 13).unwrap().and_time(t(12, 0))
    }

    fn hours(weekday: i16, opens: NaiveTime, closes: NaiveTime) -> BusinessHours {
        BusinessHours {
            id: 1,
            business_id: 1,
            weekday,
            opens_at: Some(opens),
            closes_at: Some(closes),
            is_closed: false,
        }
    }

    #[test]
    fn open_all_day_without_hours() {
        let end = check_slot(friday_noon(), saturday(), t(14, 30), 30, &[]).unwrap();
        assert_eq!(end, t(15, 0));
    }

    #[test]
    fn rejects_past_slot() {
        let err = check_slot(friday_noon(), friday_noon().date(), t(9, 0), 30, &[]).unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg.contains("future"));
    }

    #[test]
    fn rejects_slot_past_midnight() {
        assert_matches!(
            check_slot(friday_noon(), saturday(), t(23, 45), 30, &[]),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("midnight")
        );
    }

    #[test]
    fn respects_working_hours() {
        let week = [hours(6, t(9, 0), t(13, 0))];
        assert_eq!(
            check_slot(friday_noon(), saturday(), t(12, 30), 30, &week).unwrap(),
            t(13, 0)
        );
        assert_matches!(
            check_slot(friday_noon(), saturday(), t(12, 45), 30, &week),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("working hours")
        );
        assert!(check_slot(friday_noon(), saturday(), t(8, 30), 30, &week).is_err());
    }

    #[test]
    fn closed_day_is_rejected() {
        let sunday_only = hours(0, t(9, 0), t(18, 0));
        let mut closed_saturday = hours(6, t(9, 0), t(18, 0));
        closed_saturday.is_closed = true;

        assert_matches!(
            check_slot(friday_noon(), saturday(), t(10, 0), 30, &[sunday_only, closed_saturday]),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("closed")
        );
    }
}
