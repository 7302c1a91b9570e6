//! Route definitions for the `/appointments` resource.

use axum::routing::{delete, patch};
use axum::Router;

use crate::handlers::appointment;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// DELETE /{id}          -> delete
/// PATCH  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(appointment::delete))
        .route("/{id}/status", patch(appointment::update_status))
}
