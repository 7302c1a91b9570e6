//! Builds and dispatches the three appointment emails.

use std::sync::Arc;

use agendizo_core::money::format_price;
use agendizo_core::notification::NotificationKind;

use super::function::EmailFunction;
use super::{AppointmentEmail, EmailData, EmailError, SendEmailRequest, SEND_EMAIL_FUNCTION};

/// Sends appointment emails through an [`EmailFunction`].
///
/// Each call invokes the `send-email` function exactly once and returns its
/// error unchanged.
#[derive(Clone)]
pub struct EmailNotifier {
    function: Arc<dyn EmailFunction>,
}

impl EmailNotifier {
    pub fn new(function: Arc<dyn EmailFunction>) -> Self {
        Self { function }
    }

    /// Tell the business owner about a new booking.
    pub async fn send_new_appointment_email(
        &self,
        email: &AppointmentEmail,
    ) -> Result<(), EmailError> {
        let subject = format!("Nova reserva: {} - {}", email.client_name, email.service_name);
        self.send(NotificationKind::NewAppointment, subject, email, true)
            .await
    }

    /// Remind the client of an upcoming appointment.
    pub async fn send_appointment_reminder_email(
        &self,
        email: &AppointmentEmail,
    ) -> Result<(), EmailError> {
        let subject = format!(
            "Lembrete: {} em {} às {}",
            email.service_name,
            email.display_date(),
            email.display_time()
        );
        self.send(NotificationKind::AppointmentReminder, subject, email, false)
            .await
    }

    /// Tell the client their appointment was cancelled.
    pub async fn send_appointment_cancelled_email(
        &self,
        email: &AppointmentEmail,
    ) -> Result<(), EmailError> {
        let subject = format!(
            "Reserva cancelada: {} em {}",
            email.service_name,
            email.display_date()
        );
        self.send(NotificationKind::AppointmentCancelled, subject, email, false)
            .await
    }

    async fn send(
        &self,
        kind: NotificationKind,
        subject: String,
        email: &AppointmentEmail,
        include_price: bool,
    ) -> Result<(), EmailError> {
        let request = SendEmailRequest {
            to: email.to.clone(),
            subject,
            template: kind.template_key().to_string(),
            data: EmailData {
                business_name: email.business_name.clone(),
                client_name: email.client_name.clone(),
                service_name: email.service_name.clone(),
                date: email.display_date(),
                time: email.display_time(),
                price: include_price.then(|| format_price(email.price_cents)),
            },
        };

        self.function
            .invoke(SEND_EMAIL_FUNCTION, &request)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    template = %request.template,
                    to = %request.to,
                    error = %e,
                    "Failed to send appointment email",
                );
            })
    }
}
