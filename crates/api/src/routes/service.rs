//! Route definitions for the `/services` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::service;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete (deactivates)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(service::update).delete(service::delete))
}
