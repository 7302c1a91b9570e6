//! Handlers for the `/auth` resource (register, login, logout).

use agendizo_core::error::CoreError;
use agendizo_core::phone::format_phone;
use agendizo_core::types::Timestamp;
use agendizo_db::models::business::{Business, CreateBusiness};
use agendizo_db::models::session::CreateSession;
use agendizo_db::models::user::{CreateUser, UserResponse};
use agendizo_db::repositories::{
    BusinessRepo, NotificationSettingsRepo, ProfileRepo, SessionRepo, UserRepo,
};
use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::business::unique_slug;
use crate::handlers::{non_blank, not_blank};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 120, message = "is required"),
        custom(function = "not_blank")
    )]
    pub full_name: String,
    pub phone: Option<String>,
    /// Creates the owner's first business when present.
    #[validate(length(min = 1, max = 120, message = "must not be empty"))]
    pub business_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
///
/// The same token is also set as the session cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// The owner's first business, if any.
    pub business: Option<Business>,
    pub access_token: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an owner account with its profile and default notification
/// settings, optionally with a first business. Signs the new owner in.
///
/// All rows are written in one transaction; a failure leaves no account
/// behind.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Response> {
    input.validate()?;

    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let business_name = non_blank(input.business_name);
    let slug = match &business_name {
        Some(name) => Some(unique_slug(&state.pool, name, None).await?),
        None => None,
    };

    let mut tx = state.pool.begin().await?;

    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            email,
            password_hash,
        },
    )
    .await?;

    let phone = non_blank(input.phone).map(|p| format_phone(&p));
    ProfileRepo::create(&mut *tx, user.id, input.full_name.trim(), phone.as_deref()).await?;
    NotificationSettingsRepo::get_or_create(&mut *tx, user.id).await?;

    let business = match business_name.zip(slug) {
        Some((name, slug)) => {
            let business = BusinessRepo::create(
                &mut *tx,
                &CreateBusiness {
                    owner_id: user.id,
                    name,
                    slug,
                    description: None,
                    phone: phone.clone(),
                    email: Some(user.email.clone()),
                    address: None,
                    utc_offset_minutes: None,
                },
            )
            .await?;
            Some(business)
        }
        None => None,
    };

    tx.commit().await?;

    tracing::info!(user_id = user.id, has_business = business.is_some(), "Owner registered");

    sign_in(&state, &headers, jar, user.into(), business, StatusCode::CREATED).await
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    let email = input.email.trim().to_lowercase();
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let business = BusinessRepo::list_for_owner(&state.pool, user.id)
        .await?
        .into_iter()
        .next();

    sign_in(&state, &headers, jar, user.into(), business, StatusCode::OK).await
}

/// POST /api/auth/logout
///
/// Revoke the current session and clear the cookie. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> AppResult<Response> {
    SessionRepo::revoke(&state.pool, auth_user.session_id).await?;
    tracing::debug!(user_id = auth_user.user_id, "Session revoked");

    let jar = jar.add(clear_session_cookie(state.config.session_cookie_secure));
    Ok((StatusCode::NO_CONTENT, jar).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Persist a session row, sign its token and build the cookie + body.
async fn sign_in(
    state: &AppState,
    headers: &HeaderMap,
    jar: CookieJar,
    user: UserResponse,
    business: Option<Business>,
    status: StatusCode,
) -> AppResult<Response> {
    let jwt = &state.config.jwt;
    let expires_at = Utc::now() + chrono::Duration::seconds(jwt.session_expiry_secs());

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            expires_at,
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            ip_address: forwarded_for(headers),
        },
    )
    .await?;

    let access_token = generate_session_token(user.id, session.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let jar = jar.add(session_cookie(
        access_token.clone(),
        jwt.session_expiry_secs(),
        state.config.session_cookie_secure,
    ));

    let body = AuthResponse {
        user,
        business,
        access_token,
        expires_at: session.expires_at,
    };
    Ok((status, jar, Json(body)).into_response())
}

/// Client address as reported by the reverse proxy.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}
