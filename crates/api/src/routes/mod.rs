pub mod appointment;
pub mod auth;
pub mod billing;
pub mod business;
pub mod client;
pub mod health;
pub mod notification;
pub mod profile;
pub mod public;
pub mod service;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
///
/// /profile                                         get, update
///
/// /businesses                                      list, create
/// /businesses/slug-available                       slug check
/// /businesses/{id}                                 get, update
/// /businesses/{id}/hours                           get, replace week
/// /businesses/{id}/services                        list, create
/// /businesses/{id}/clients                         list, create
/// /businesses/{id}/appointments                    list, create
///
/// /services/{id}                                   update, deactivate
/// /clients/{id}                                    update, delete
/// /appointments/{id}                               delete
/// /appointments/{id}/status                        change status (PATCH)
///
/// /notifications/settings                          get, update
/// /notifications/test                              test send (POST)
/// /test-email                                      test email (POST)
///
/// /subscription                                    current subscription
/// /checkout                                        checkout session (POST)
/// /webhooks/stripe                                 Stripe webhook (public)
///
/// /public/businesses/{slug}                        booking page (public)
/// /public/businesses/{slug}/appointments           book (public)
/// /public/businesses/{slug}/feedback               leave feedback (public)
///
/// /config                                          public config
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Registration and sessions.
        .nest("/auth", auth::router())
        // Owner profile.
        .nest("/profile", profile::router())
        // Businesses with their hours and nested collections.
        .nest("/businesses", business::router())
        // Directly addressed rows.
        .nest("/services", service::router())
        .nest("/clients", client::router())
        .nest("/appointments", appointment::router())
        // Notification settings and test sends.
        .nest("/notifications", notification::router())
        .route("/test-email", post(handlers::notification::send_test_email))
        // Billing.
        .merge(billing::router())
        // Public booking page.
        .nest("/public/businesses", public::router())
        // Client bootstrap config.
        .route("/config", get(handlers::site_config::get_config))
}
