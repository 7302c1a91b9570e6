use std::sync::Arc;

use agendizo_billing::StripeApi;
use agendizo_events::{EmailNotifier, EventBus};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: agendizo_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub event_bus: Arc<EventBus>,
    /// `None` when neither an email function nor SMTP is configured.
    pub notifier: Option<EmailNotifier>,
    /// `None` when Stripe is not configured.
    pub stripe: Option<Arc<StripeApi>>,
}
