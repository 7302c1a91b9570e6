//! Appointment status values.
//!
//! Status is a flat enumeration stored as text. Owners may set any status
//! on any appointment; the only automatic transition is the sweep that
//! marks elapsed appointments as completed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_COMPLETED: &str = "completed";

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// All statuses, in display order.
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => STATUS_PENDING,
            AppointmentStatus::Confirmed => STATUS_CONFIRMED,
            AppointmentStatus::Cancelled => STATUS_CANCELLED,
            AppointmentStatus::Completed => STATUS_COMPLETED,
        }
    }

    /// Cancelled and completed appointments are never touched by the
    /// completion sweep or the reminder job.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(AppointmentStatus::Pending),
            STATUS_CONFIRMED => Ok(AppointmentStatus::Confirmed),
            STATUS_CANCELLED => Ok(AppointmentStatus::Cancelled),
            STATUS_COMPLETED => Ok(AppointmentStatus::Completed),
            other => Err(format!(
                "Unknown appointment status '{other}'. Expected one of: pending, confirmed, cancelled, completed"
            )),
        }
    }
}

/// End of an appointment that starts at `start` and lasts
/// `duration_minutes`.
///
/// Returns `None` for non-positive durations and for appointments that
/// would run past midnight.
pub fn end_time_for(start: NaiveTime, duration_minutes: i32) -> Option<NaiveTime> {
    if duration_minutes <= 0 {
        return None;
    }
    let (end, wrapped_secs) =
        start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
    (wrapped_secs == 0).then_some(end)
}

/// Wall-clock time of a business whose local time is `utc_offset_minutes`
/// away from UTC.
pub fn local_now(now: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDateTime {
    now.naive_utc() + Duration::minutes(i64::from(utc_offset_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_every_status() {
        for status in AppointmentStatus::ALL {
            assert_eq!(status.as_str().parse::<AppointmentStatus>(), Ok(status));
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "declined".parse::<AppointmentStatus>().unwrap_err();
        assert!(err.contains("declined"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
    }

    #[test]
    fn display_matches_stored_value() {
        assert_eq!(AppointmentStatus::Confirmed.to_string(), "confirmed");
    }

    #[test]
    fn end_time_adds_duration() {
        assert_eq!(end_time_for(t(14, 30), 30), Some(t(15, 0)));
        assert_eq!(end_time_for(t(22, 0), 120 - 1), Some(t(23, 59)));
    }

    #[test]
    fn end_time_rejects_wrap_and_empty_durations() {
        assert_eq!(end_time_for(t(23, 30), 45), None);
        assert_eq!(end_time_for(t(23, 0), 60), None);
        assert_eq!(end_time_for(t(10, 0), 0), None);
        assert_eq!(end_time_for(t(10, 0), -15), None);
    }

    #[test]
    fn local_now_applies_offset() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        assert_eq!(
            local_now(now, -180),
            now.naive_utc() - Duration::hours(3)
        );
    }
}
