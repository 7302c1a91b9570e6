//! Handlers for the signed-in owner's `/profile`.

use agendizo_core::error::CoreError;
use agendizo_core::phone::format_phone;
use agendizo_db::models::profile::{Profile, UpdateProfile, THEMES};
use agendizo_db::repositories::ProfileRepo;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::non_blank;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /profile`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120, message = "must not be empty"))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub theme: Option<String>,
    #[validate(length(min = 2, max = 10, message = "must be a locale tag such as pt-BR"))]
    pub locale: Option<String>,
}

/// GET /api/profile
pub async fn get(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Profile>> {
    let profile = ProfileRepo::find(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(profile))
}

/// PUT /api/profile
///
/// Phone numbers are stored in display format.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    input.validate()?;

    if let Some(theme) = input.theme.as_deref() {
        if !THEMES.contains(&theme) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "theme: must be one of {}",
                THEMES.join(", ")
            ))));
        }
    }

    let update = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        phone: non_blank(input.phone).map(|p| format_phone(&p)),
        theme: input.theme,
        locale: input.locale,
    };

    let profile = ProfileRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(profile))
}
