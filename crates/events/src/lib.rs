//! Agendizo booking events and transactional email.
//!
//! - [`EventBus`] carries [`BookingEvent`]s from request handlers to the
//!   notification router.
//! - [`email`] builds the three appointment emails and hands them to an
//!   [`EmailFunction`], either a remote HTTP function or the local SMTP one.
//! - [`delivery`] holds the SMTP transport.

pub mod bus;
pub mod delivery;
pub mod email;

#[cfg(test)]
pub(crate) mod test_support;

pub use bus::{BookingEvent, BookingEventKind, EventBus};
pub use delivery::smtp::{EmailConfig, SmtpMailer};
pub use email::function::{EmailFunction, HttpEmailFunction, LocalEmailFunction};
pub use email::notifier::EmailNotifier;
pub use email::{AppointmentEmail, EmailData, EmailError, SendEmailRequest};
