//! Route definitions for the `/businesses` resource.
//!
//! Also nests the business-scoped collections (services, clients,
//! appointments) under `/businesses/{id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{appointment, business, client, service};
use crate::state::AppState;

/// Routes mounted at `/businesses`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /slug-available         -> slug_available
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// GET    /{id}/hours             -> get_hours
/// PUT    /{id}/hours             -> replace_hours
///
/// GET    /{id}/services          -> service::list
/// POST   /{id}/services          -> service::create
/// GET    /{id}/clients           -> client::list
/// POST   /{id}/clients           -> client::create
/// GET    /{id}/appointments      -> appointment::list
/// POST   /{id}/appointments      -> appointment::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(business::list).post(business::create))
        .route("/slug-available", get(business::slug_available))
        .route("/{id}", get(business::get_by_id).put(business::update))
        .route(
            "/{id}/hours",
            get(business::get_hours).put(business::replace_hours),
        )
        .route("/{id}/services", get(service::list).post(service::create))
        .route("/{id}/clients", get(client::list).post(client::create))
        .route(
            "/{id}/appointments",
            get(appointment::list).post(appointment::create),
        )
}
