//! Transactional appointment emails.
//!
//! Application code never talks to a mail server directly. It asks the
//! [`EmailNotifier`](notifier::EmailNotifier) to send one of the three
//! appointment emails; the notifier builds a [`SendEmailRequest`] and
//! invokes the `send-email` function, which renders the named template and
//! delivers it.

use agendizo_db::models::appointment::AppointmentDetail;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::delivery::smtp::SmtpError;

pub mod function;
pub mod notifier;
pub mod templates;

/// Name of the function that renders and sends appointment emails.
pub const SEND_EMAIL_FUNCTION: &str = "send-email";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The HTTP request to a remote function failed (network, DNS, TLS).
    #[error("Email function request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote function answered with a non-2xx status.
    #[error("Email function '{name}' failed ({status}): {body}")]
    Function {
        name: String,
        status: u16,
        body: String,
    },

    #[error("Unknown email function: {0}")]
    UnknownFunction(String),

    #[error("Unknown email template: {0}")]
    UnknownTemplate(String),

    #[error("Email template failed to render: {0}")]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Smtp(#[from] SmtpError),
}

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

/// Body sent to the `send-email` function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    /// One of the template keys in [`agendizo_core::notification`].
    pub template: String,
    pub data: EmailData,
}

/// Values interpolated into a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailData {
    pub business_name: String,
    pub client_name: String,
    pub service_name: String,
    /// Display date, `dd/mm/yyyy`.
    pub date: String,
    /// Display time, `HH:MM`.
    pub time: String,
    /// Two-decimal price; only present on new-appointment emails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

// ---------------------------------------------------------------------------
// AppointmentEmail
// ---------------------------------------------------------------------------

/// Everything the notifier needs to describe one appointment to one
/// recipient.
#[derive(Debug, Clone)]
pub struct AppointmentEmail {
    pub to: String,
    pub business_name: String,
    pub client_name: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price_cents: i64,
}

impl AppointmentEmail {
    pub fn from_detail(detail: &AppointmentDetail, to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            business_name: detail.business_name.clone(),
            client_name: detail.client_name.clone(),
            service_name: detail.service_name.clone(),
            date: detail.appointment_date,
            time: detail.start_time,
            price_cents: detail.price_cents,
        }
    }

    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    pub fn display_time(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}
