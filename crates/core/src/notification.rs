//! Notification kinds, delivery channels and per-user channel preferences.

use serde::{Deserialize, Serialize};

pub const TEMPLATE_NEW_APPOINTMENT: &str = "new-appointment";
pub const TEMPLATE_APPOINTMENT_REMINDER: &str = "appointment-reminder";
pub const TEMPLATE_APPOINTMENT_CANCELLED: &str = "appointment-cancelled";

/// Appointment events that can trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewAppointment,
    AppointmentReminder,
    AppointmentCancelled,
}

impl NotificationKind {
    /// Key of the HTML template the email function renders for this kind.
    pub fn template_key(self) -> &'static str {
        match self {
            NotificationKind::NewAppointment => TEMPLATE_NEW_APPOINTMENT,
            NotificationKind::AppointmentReminder => TEMPLATE_APPOINTMENT_REMINDER,
            NotificationKind::AppointmentCancelled => TEMPLATE_APPOINTMENT_CANCELLED,
        }
    }

    pub fn from_template_key(key: &str) -> Option<Self> {
        match key {
            TEMPLATE_NEW_APPOINTMENT => Some(NotificationKind::NewAppointment),
            TEMPLATE_APPOINTMENT_REMINDER => Some(NotificationKind::AppointmentReminder),
            TEMPLATE_APPOINTMENT_CANCELLED => Some(NotificationKind::AppointmentCancelled),
            _ => None,
        }
    }
}

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
        }
    }
}

/// Per-user booleans controlling which channels fire for which events.
///
/// A channel fires for an event only when both the channel and the event
/// are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreferences {
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub whatsapp_enabled: bool,
    pub notify_new_appointment: bool,
    pub notify_reminder: bool,
    pub notify_cancellation: bool,
}

impl Default for ChannelPreferences {
    /// New accounts get email for every event; SMS and WhatsApp are opt-in.
    fn default() -> Self {
        Self {
            email_enabled: true,
            sms_enabled: false,
            whatsapp_enabled: false,
            notify_new_appointment: true,
            notify_reminder: true,
            notify_cancellation: true,
        }
    }
}

impl ChannelPreferences {
    pub fn event_enabled(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::NewAppointment => self.notify_new_appointment,
            NotificationKind::AppointmentReminder => self.notify_reminder,
            NotificationKind::AppointmentCancelled => self.notify_cancellation,
        }
    }

    /// Every channel that is switched on, regardless of event.
    pub fn enabled_channels(&self) -> Vec<Channel> {
        let mut channels = Vec::with_capacity(3);
        if self.email_enabled {
            channels.push(Channel::Email);
        }
        if self.sms_enabled {
            channels.push(Channel::Sms);
        }
        if self.whatsapp_enabled {
            channels.push(Channel::WhatsApp);
        }
        channels
    }

    /// Channels that should fire for `kind`.
    pub fn channels_for(&self, kind: NotificationKind) -> Vec<Channel> {
        if !self.event_enabled(kind) {
            return Vec::new();
        }
        self.enabled_channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_keys_round_trip() {
        for kind in [
            NotificationKind::NewAppointment,
            NotificationKind::AppointmentReminder,
            NotificationKind::AppointmentCancelled,
        ] {
            assert_eq!(NotificationKind::from_template_key(kind.template_key()), Some(kind));
        }
        assert_eq!(NotificationKind::from_template_key("welcome"), None);
    }

    #[test]
    fn defaults_fire_email_only() {
        let prefs = ChannelPreferences::default();
        assert_eq!(
            prefs.channels_for(NotificationKind::NewAppointment),
            vec![Channel::Email]
        );
    }

    #[test]
    fn disabled_event_fires_nothing() {
        let prefs = ChannelPreferences {
            notify_reminder: false,
            sms_enabled: true,
            ..ChannelPreferences::default()
        };
        assert!(prefs.channels_for(NotificationKind::AppointmentReminder).is_empty());
        assert_eq!(
            prefs.channels_for(NotificationKind::AppointmentCancelled),
            vec![Channel::Email, Channel::Sms]
        );
    }

    #[test]
    fn all_channels_off() {
        let prefs = ChannelPreferences {
            email_enabled: false,
            ..ChannelPreferences::default()
        };
        assert!(prefs.enabled_channels().is_empty());
    }
}
