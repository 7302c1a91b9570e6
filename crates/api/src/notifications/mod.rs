//! Booking-event notification routing.
//!
//! [`NotificationRouter`] subscribes to the event bus and turns booking
//! events into emails, honoring each owner's notification settings.

mod router;

use std::sync::Arc;

use agendizo_events::{
    EmailError, EmailNotifier, HttpEmailFunction, LocalEmailFunction, SmtpMailer,
};

pub use router::{DispatchOutcome, NotificationError, NotificationRouter};

use crate::config::ServerConfig;

/// Pick the email backend from configuration.
///
/// A remote email function wins over SMTP. Returns `None` when neither is
/// configured, in which case no emails are sent.
pub fn build_notifier(config: &ServerConfig) -> Result<Option<EmailNotifier>, EmailError> {
    if let Some(functions) = &config.email_functions {
        tracing::info!(url = %functions.url, "Email delivery via remote function");
        let function = HttpEmailFunction::new(functions.url.clone(), functions.api_key.clone())?;
        return Ok(Some(EmailNotifier::new(Arc::new(function))));
    }

    if let Some(smtp) = &config.email {
        tracing::info!(host = %smtp.smtp_host, "Email delivery via SMTP");
        let function = LocalEmailFunction::new(SmtpMailer::new(smtp.clone()));
        return Ok(Some(EmailNotifier::new(Arc::new(function))));
    }

    tracing::warn!("No email backend configured, notifications are disabled");
    Ok(None)
}
