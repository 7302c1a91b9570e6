//! Route definitions for the public booking page.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public/businesses`. None require a session.
///
/// ```text
/// GET  /{slug}               -> get_page
/// POST /{slug}/appointments  -> book
/// POST /{slug}/feedback      -> leave_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(public::get_page))
        .route("/{slug}/appointments", post(public::book))
        .route("/{slug}/feedback", post(public::leave_feedback))
}
