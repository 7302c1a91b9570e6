//! Session-based authentication extractor for Axum handlers.

use agendizo_core::error::CoreError;
use agendizo_core::types::DbId;
use agendizo_db::repositories::SessionRepo;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::auth::cookie::session_token;
use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated owner extracted from the `agendizo_session` cookie, or from
/// an `Authorization: Bearer <token>` header when no cookie is present.
///
/// The token must verify and its session row must be neither revoked nor
/// expired.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The backing `user_sessions` row (from `claims.sid`).
    pub session_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        match SessionRepo::find_active(&state.pool, claims.sid, claims.sub).await? {
            Some(session) => Ok(AuthUser {
                user_id: session.user_id,
                session_id: session.id,
            }),
            None => Err(AppError::Core(CoreError::Unauthorized(
                "Session has ended".into(),
            ))),
        }
    }
}

fn extract_token(parts: &Parts) -> AppResult<String> {
    if let Some(token) = session_token(&CookieJar::from_headers(&parts.headers)) {
        return Ok(token);
    }

    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Not signed in".into())))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })
}
