//! Handlers for a business's clients.

use agendizo_core::error::CoreError;
use agendizo_core::phone::format_phone;
use agendizo_core::types::DbId;
use agendizo_db::models::client::{Client, CreateClient, UpdateClient};
use agendizo_db::repositories::ClientRepo;
use agendizo_db::DbPool;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{blank_as_none, non_blank, not_blank, owned_business};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(
        length(min = 1, max = 120, message = "is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(
        length(min = 1, max = 120, message = "must not be empty"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/businesses/{id}/clients
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    owned_business(&state.pool, &user, business_id).await?;
    let clients = ClientRepo::list_for_business(&state.pool, business_id).await?;
    Ok(Json(DataResponse::new(clients)))
}

/// POST /api/businesses/{id}/clients
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(business_id): Path<DbId>,
    Json(input): Json<ClientRequest>,
) -> AppResult<(StatusCode, Json<Client>)> {
    input.validate()?;
    owned_business(&state.pool, &user, business_id).await?;

    let client = ClientRepo::create(&state.pool, business_id, &normalize_new(input)).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClientRequest>,
) -> AppResult<Json<Client>> {
    input.validate()?;
    owned_client(&state.pool, &user, id).await?;

    let update = UpdateClient {
        name: input.name.map(|n| n.trim().to_string()),
        email: non_blank(input.email).map(|e| e.to_lowercase()),
        phone: non_blank(input.phone).map(|p| format_phone(&p)),
        notes: input.notes,
    };
    let client = ClientRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Client", id }))?;
    Ok(Json(client))
}

/// DELETE /api/clients/{id}
///
/// Removes the client together with their appointments.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_client(&state.pool, &user, id).await?;
    if ClientRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Client", id }))
    }
}

/// Trim the name, lower-case the email and store the phone in display
/// format, so lookups by contact match what was saved.
pub(crate) fn normalize_new(input: ClientRequest) -> CreateClient {
    CreateClient {
        name: input.name.trim().to_string(),
        email: non_blank(input.email).map(|e| e.to_lowercase()),
        phone: non_blank(input.phone).map(|p| format_phone(&p)),
        notes: non_blank(input.notes),
    }
}

async fn owned_client(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<Client> {
    let client = ClientRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Client", id }))?;
    owned_business(pool, user, client.business_id).await?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_contact_fields() {
        let client = normalize_new(ClientRequest {
            name: "  Maria ".into(),
            email: Some("Maria@Example.com".into()),
            phone: Some("11987654321".into()),
            notes: Some("   ".into()),
        });
        assert_eq!(client.name, "Maria");
        assert_eq!(client.email.as_deref(), Some("maria@example.com"));
        assert_eq!(client.phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(client.notes, None);
    }

    #[test]
    fn blank_email_is_not_validated_as_an_address() {
        let input: ClientRequest =
            serde_json::from_str(r#"{"name": "Maria", "email": "", "phone": "11987654321"}"#)
                .unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.email, None);
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let input: ClientRequest = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let update: UpdateClientRequest = serde_json::from_str(r#"{"name": " "}"#).unwrap();
        assert!(update.validate().is_err());
    }
}
