//! Handlers for the `/businesses` resource and its weekly hours.

use std::collections::HashSet;

use agendizo_core::error::CoreError;
use agendizo_core::phone::format_phone;
use agendizo_core::slug::{is_valid_slug, slugify, with_suffix};
use agendizo_core::types::DbId;
use agendizo_db::models::business::{
    Business, BusinessHours, CreateBusiness, DayHours, UpdateBusiness,
};
use agendizo_db::repositories::{BusinessHoursRepo, BusinessRepo};
use agendizo_db::DbPool;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{non_blank, owned_business};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Slug used when a business name has no usable characters.
const FALLBACK_SLUG: &str = "negocio";

/// Numbered suffixes tried before giving up on a slug.
const MAX_SLUG_ATTEMPTS: u32 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusinessRequest {
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = -720, max = 840, message = "must be between -720 and 840"))]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 120, message = "must not be empty"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = -720, max = 840, message = "must be between -720 and 840"))]
    pub utc_offset_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: String,
    /// The business being edited, whose own slug counts as available.
    pub exclude_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    /// The normalized form of the requested slug.
    pub slug: String,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Business handlers
// ---------------------------------------------------------------------------

/// GET /api/businesses
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Business>>>> {
    let businesses = BusinessRepo::list_for_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(businesses)))
}

/// POST /api/businesses
///
/// The uniqueness check is advisory; the `uq_businesses_slug` constraint
/// turns a lost race into a 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBusinessRequest>,
) -> AppResult<(StatusCode, Json<Business>)> {
    input.validate()?;
    let name = input.name.trim().to_string();

    let slug = match non_blank(input.slug) {
        Some(requested) => {
            let slug = checked_slug(&requested)?;
            if BusinessRepo::slug_exists(&state.pool, &slug, None).await? {
                return Err(slug_taken(&slug));
            }
            slug
        }
        None => unique_slug(&state.pool, &name, None).await?,
    };

    let business = BusinessRepo::create(
        &state.pool,
        &CreateBusiness {
            owner_id: user.user_id,
            name,
            slug,
            description: non_blank(input.description),
            phone: non_blank(input.phone).map(|p| format_phone(&p)),
            email: non_blank(input.email),
            address: non_blank(input.address),
            utc_offset_minutes: input.utc_offset_minutes,
        },
    )
    .await?;

    tracing::info!(business_id = business.id, slug = %business.slug, "Business created");
    Ok((StatusCode::CREATED, Json(business)))
}

/// GET /api/businesses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Business>> {
    let business = owned_business(&state.pool, &user, id).await?;
    Ok(Json(business))
}

/// PUT /api/businesses/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBusinessRequest>,
) -> AppResult<Json<Business>> {
    input.validate()?;
    owned_business(&state.pool, &user, id).await?;

    let slug = match non_blank(input.slug) {
        Some(requested) => {
            let slug = checked_slug(&requested)?;
            if BusinessRepo::slug_exists(&state.pool, &slug, Some(id)).await? {
                return Err(slug_taken(&slug));
            }
            Some(slug)
        }
        None => None,
    };

    let update = UpdateBusiness {
        name: input.name.map(|n| n.trim().to_string()),
        slug,
        description: input.description,
        phone: non_blank(input.phone).map(|p| format_phone(&p)),
        email: non_blank(input.email),
        address: input.address,
        utc_offset_minutes: input.utc_offset_minutes,
        is_active: input.is_active,
    };

    let business = BusinessRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Business",
            id,
        }))?;
    Ok(Json(business))
}

/// GET /api/businesses/slug-available?slug=&exclude_id=
pub async fn slug_available(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SlugQuery>,
) -> AppResult<Json<SlugAvailability>> {
    let slug = slugify(&params.slug);
    let available = is_valid_slug(&slug)
        && !BusinessRepo::slug_exists(&state.pool, &slug, params.exclude_id).await?;
    Ok(Json(SlugAvailability { slug, available }))
}

// ---------------------------------------------------------------------------
// Working hours
// ---------------------------------------------------------------------------

/// GET /api/businesses/{id}/hours
pub async fn get_hours(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BusinessHours>>>> {
    owned_business(&state.pool, &user, id).await?;
    let hours = BusinessHoursRepo::list_for_business(&state.pool, id).await?;
    Ok(Json(DataResponse::new(hours)))
}

/// PUT /api/businesses/{id}/hours
///
/// Replaces the whole week. Days left out of the list have no hours.
pub async fn replace_hours(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(days): Json<Vec<DayHours>>,
) -> AppResult<Json<DataResponse<Vec<BusinessHours>>>> {
    owned_business(&state.pool, &user, id).await?;
    validate_week(&days)?;

    let hours = BusinessHoursRepo::replace_week(&state.pool, id, &days).await?;
    tracing::debug!(business_id = id, days = hours.len(), "Working hours replaced");
    Ok(Json(DataResponse::new(hours)))
}

/// Weekdays are 0 (Sunday) to 6, each at most once. Open days need both
/// times, with closing after opening.
fn validate_week(days: &[DayHours]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for day in days {
        if !(0..=6).contains(&day.weekday) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "weekday: {} is not between 0 and 6",
                day.weekday
            ))));
        }
        if !seen.insert(day.weekday) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "weekday: {} appears more than once",
                day.weekday
            ))));
        }
        if day.is_closed {
            continue;
        }
        match (day.opens_at, day.closes_at) {
            (Some(opens), Some(closes)) if closes > opens => {}
            (Some(_), Some(_)) => {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "closes_at: must be after opens_at on weekday {}",
                    day.weekday
                ))));
            }
            _ => {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "opens_at: open days need opening and closing times (weekday {})",
                    day.weekday
                ))));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Find a free slug derived from `name`, appending `-2`, `-3`, ... as
/// needed.
pub(crate) async fn unique_slug(
    pool: &DbPool,
    name: &str,
    exclude_id: Option<DbId>,
) -> AppResult<String> {
    let mut base = slugify(name);
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    if !BusinessRepo::slug_exists(pool, &base, exclude_id).await? {
        return Ok(base);
    }
    for n in 2..=MAX_SLUG_ATTEMPTS {
        let candidate = with_suffix(&base, n);
        if !BusinessRepo::slug_exists(pool, &candidate, exclude_id).await? {
            return Ok(candidate);
        }
    }
    Err(slug_taken(&base))
}

fn checked_slug(requested: &str) -> AppResult<String> {
    let slug = slugify(requested);
    if !is_valid_slug(&slug) {
        return Err(AppError::Core(CoreError::Validation(
            "slug: must contain letters or digits".into(),
        )));
    }
    Ok(slug)
}

fn slug_taken(slug: &str) -> AppError {
    AppError::Core(CoreError::Conflict(format!("Slug '{slug}' is already in use")))
}
