//! Request handlers, one module per resource.
//!
//! Dashboard handlers take an [`AuthUser`] and resolve every
//! business-scoped row through [`owned_business`], so an owner can never
//! read or write another tenant's data.

pub mod appointment;
pub mod auth;
pub mod billing;
pub mod business;
pub mod client;
pub mod notification;
pub mod profile;
pub mod public;
pub mod service;
pub mod site_config;

use agendizo_core::error::CoreError;
use agendizo_core::types::DbId;
use agendizo_db::models::business::Business;
use agendizo_db::repositories::BusinessRepo;
use agendizo_db::DbPool;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Load a business and check it belongs to the caller.
///
/// Missing businesses are 404; someone else's business is 403.
pub(crate) async fn owned_business(
    pool: &DbPool,
    user: &AuthUser,
    business_id: DbId,
) -> AppResult<Business> {
    let business = BusinessRepo::find_by_id(pool, business_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Business",
            id: business_id,
        }))?;

    if business.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Business belongs to another account".into(),
        )));
    }
    Ok(business)
}

/// Trim a free-text field, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Serde adapter for optional text fields: blank input deserializes as
/// `None`, so format validators only see real values.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(Option::<String>::deserialize(deserializer)?))
}

/// Validator for required text: whitespace alone does not count.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("is required".into()));
    }
    Ok(())
}
