//! Route definitions for `/notifications`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /settings  -> get_settings
/// PUT  /settings  -> update_settings
/// POST /test      -> send_test
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(notification::get_settings).put(notification::update_settings),
        )
        .route("/test", post(notification::send_test))
}
