//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between request handlers,
//! which publish [`BookingEvent`]s, and the notification router, which
//! turns them into emails.

use agendizo_core::notification::NotificationKind;
use agendizo_core::types::{DbId, Timestamp};
use agendizo_db::models::appointment::AppointmentDetail;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// BookingEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    AppointmentCreated,
    AppointmentCancelled,
}

/// Something happened to an appointment.
///
/// The event carries a snapshot of the joined appointment row taken when it
/// was published, so subscribers can still act after the row is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub appointment: AppointmentDetail,
    /// Dashboard user that caused the event; `None` for public bookings.
    pub actor_user_id: Option<DbId>,
    pub timestamp: Timestamp,
}

impl BookingEvent {
    pub fn created(appointment: AppointmentDetail) -> Self {
        Self::new(BookingEventKind::AppointmentCreated, appointment)
    }

    pub fn cancelled(appointment: AppointmentDetail) -> Self {
        Self::new(BookingEventKind::AppointmentCancelled, appointment)
    }

    fn new(kind: BookingEventKind, appointment: AppointmentDetail) -> Self {
        Self {
            kind,
            appointment,
            actor_user_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn appointment_id(&self) -> DbId {
        self.appointment.id
    }

    pub fn business_id(&self) -> DbId {
        self.appointment.business_id
    }

    /// The notification this event should produce.
    pub fn notification_kind(&self) -> NotificationKind {
        match self.kind {
            BookingEventKind::AppointmentCreated => NotificationKind::NewAppointment,
            BookingEventKind::AppointmentCancelled => NotificationKind::AppointmentCancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest messages are dropped and slow
/// receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no subscribers the event is dropped.
    pub fn publish(&self, event: BookingEvent) {
        tracing::debug!(
            kind = ?event.kind,
            appointment_id = event.appointment_id(),
            business_id = event.business_id(),
            "Publishing booking event",
        );
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_detail;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(BookingEvent::created(sample_detail()).with_actor(1));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, BookingEventKind::AppointmentCreated);
        assert_eq!(received.appointment_id(), 10);
        assert_eq!(received.business_id(), 3);
        assert_eq!(received.actor_user_id, Some(1));
    }

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BookingEvent::cancelled(sample_detail()));

        assert_eq!(rx1.recv().await.unwrap().kind, BookingEventKind::AppointmentCancelled);
        assert_eq!(rx2.recv().await.unwrap().kind, BookingEventKind::AppointmentCancelled);
    }

    #[test]
    fn subscriber_count_tracks_receivers() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        EventBus::default().publish(BookingEvent::created(sample_detail()));
    }

    #[test]
    fn kinds_map_to_notifications() {
        assert_eq!(
            BookingEvent::created(sample_detail()).notification_kind(),
            NotificationKind::NewAppointment
        );
        assert_eq!(
            BookingEvent::cancelled(sample_detail()).notification_kind(),
            NotificationKind::AppointmentCancelled
        );
    }
}
