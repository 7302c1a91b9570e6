//! Handlers for bookable services.
//!
//! Listing and creation are nested under `/businesses/{id}/services`;
//! updates and removal address the service directly at `/services/{id}`.

use agendizo_core::error::CoreError;
use agendizo_core::types::DbId;
use agendizo_db::models::service::{CreateService, Service, UpdateService};
use agendizo_db::repositories::ServiceRepo;
use agendizo_db::DbPool;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{non_blank, owned_business};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 5, max = 720, message = "must be between 5 and 720 minutes"))]
    pub duration_minutes: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 120, message = "must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 5, max = 720, message = "must be between 5 and 720 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price_cents: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceListParams {
    /// Hide deactivated services.
    #[serde(default)]
    pub active_only: bool,
}

/// GET /api/businesses/{id}/services
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
    Query(params): Query<ServiceListParams>,
) -> AppResult<Json<DataResponse<Vec<Service>>>> {
    owned_business(&state.pool, &user, business_id).await?;
    let services =
        ServiceRepo::list_for_business(&state.pool, business_id, !params.active_only).await?;
    Ok(Json(DataResponse::new(services)))
}

/// POST /api/businesses/{id}/services
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
    Json(input): Json<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<Service>)> {
    input.validate()?;
    owned_business(&state.pool, &user, business_id).await?;

    let create = CreateService {
        name: input.name.trim().to_string(),
        description: non_blank(input.description),
        duration_minutes: input.duration_minutes,
        price_cents: input.price_cents,
    };
    let service = ServiceRepo::create(&state.pool, business_id, &create).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/services/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceRequest>,
) -> AppResult<Json<Service>> {
    input.validate()?;
    owned_service(&state.pool, &user, id).await?;

    let update = UpdateService {
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        duration_minutes: input.duration_minutes,
        price_cents: input.price_cents,
        is_active: input.is_active,
    };
    let service = ServiceRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;
    Ok(Json(service))
}

/// DELETE /api/services/{id}
///
/// Deactivates the service so past appointments keep their reference.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let service = owned_service(&state.pool, &user, id).await?;
    if service.is_active {
        ServiceRepo::deactivate(&state.pool, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_service(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<Service> {
    let service = ServiceRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }))?;
    owned_business(pool, user, service.business_id).await?;
    Ok(service)
}
