//! The three HTML email templates, rendered with askama from
//! `templates/email/`.

use agendizo_core::notification::{
    TEMPLATE_APPOINTMENT_CANCELLED, TEMPLATE_APPOINTMENT_REMINDER, TEMPLATE_NEW_APPOINTMENT,
};
use askama::Template;

use super::{EmailData, EmailError};

#[derive(Template)]
#[template(path = "email/new_appointment.html")]
struct NewAppointmentEmail<'a> {
    data: &'a EmailData,
}

#[derive(Template)]
#[template(path = "email/appointment_reminder.html")]
struct AppointmentReminderEmail<'a> {
    data: &'a EmailData,
}

#[derive(Template)]
#[template(path = "email/appointment_cancelled.html")]
struct AppointmentCancelledEmail<'a> {
    data: &'a EmailData,
}

/// Render the template named `key` with `data`.
pub fn render(key: &str, data: &EmailData) -> Result<String, EmailError> {
    let html = match key {
        TEMPLATE_NEW_APPOINTMENT => NewAppointmentEmail { data }.render(),
        TEMPLATE_APPOINTMENT_REMINDER => AppointmentReminderEmail { data }.render(),
        TEMPLATE_APPOINTMENT_CANCELLED => AppointmentCancelledEmail { data }.render(),
        other => return Err(EmailError::UnknownTemplate(other.to_string())),
    }?;
    Ok(html)
}
