//! Appointment model and ride window derivation.
//!
//! An appointment is a ride request: where, when, and for how long. The
//! occupied time interval ([`RideWindow`]) is derived from the start
//! date/time plus the estimated duration, and feeds both concurrent-ride
//! detection and per-driver unavailability checks.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Default estimated ride duration when the booking did not supply one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// A ride request.
///
/// Immutable once matching begins; status transitions and driver assignment
/// live at the persistence boundary, not on this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: String,
    /// Ride date.
    pub date: NaiveDate,
    /// Ride start time.
    pub start_time: NaiveTime,
    /// Estimated duration in minutes. `None` → 60.
    pub estimated_duration_minutes: Option<i64>,
    /// Destination city.
    pub destination_city: String,
    /// Destination state.
    pub destination_state: String,
    /// The client is bringing an additional rider.
    pub has_additional_rider: bool,
}

impl Appointment {
    /// Creates an appointment at the given date and time.
    pub fn new(id: impl Into<String>, date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            id: id.into(),
            date,
            start_time,
            estimated_duration_minutes: None,
            destination_city: String::new(),
            destination_state: String::new(),
            has_additional_rider: false,
        }
    }

    /// Sets the estimated duration in minutes.
    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.estimated_duration_minutes = Some(minutes);
        self
    }

    /// Sets the destination.
    pub fn with_destination(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.destination_city = city.into();
        self.destination_state = state.into();
        self
    }

    /// Marks the appointment as carrying an additional rider.
    pub fn with_additional_rider(mut self) -> Self {
        self.has_additional_rider = true;
        self
    }

    /// The time interval this ride occupies.
    pub fn ride_window(&self) -> RideWindow {
        RideWindow::of(self)
    }
}

/// The occupied time interval of an appointment: `[start, end)`.
///
/// `start = date + start_time`, `end = start + estimated duration`
/// (60 minutes when unspecified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl RideWindow {
    /// Derives the window for an appointment.
    pub fn of(appointment: &Appointment) -> Self {
        let start = appointment.date.and_time(appointment.start_time);
        let minutes = appointment
            .estimated_duration_minutes
            .unwrap_or(DEFAULT_DURATION_MINUTES);
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    /// Window duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether two windows overlap (half-open intervals).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_duration() {
        let a = Appointment::new("A1", date(2024, 3, 4), time(9, 0));
        let w = a.ride_window();
        assert_eq!(w.start, date(2024, 3, 4).and_time(time(9, 0)));
        assert_eq!(w.end, date(2024, 3, 4).and_time(time(10, 0)));
        assert_eq!(w.duration(), Duration::minutes(60));
    }

    #[test]
    fn test_explicit_duration() {
        let a = Appointment::new("A1", date(2024, 3, 4), time(9, 0)).with_duration_minutes(90);
        let w = a.ride_window();
        assert_eq!(w.end, date(2024, 3, 4).and_time(time(10, 30)));
    }

    #[test]
    fn test_window_crossing_midnight() {
        let a = Appointment::new("A1", date(2024, 3, 4), time(23, 30)).with_duration_minutes(90);
        let w = a.ride_window();
        assert_eq!(w.end, date(2024, 3, 5).and_time(time(1, 0)));
    }

    #[test]
    fn test_window_overlap() {
        let a = Appointment::new("A1", date(2024, 3, 4), time(9, 0)).ride_window();
        let b = Appointment::new("A2", date(2024, 3, 4), time(9, 30)).ride_window();
        let c = Appointment::new("A3", date(2024, 3, 4), time(10, 0)).ride_window();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching windows do not overlap
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_different_days_disjoint() {
        let a = Appointment::new("A1", date(2024, 3, 4), time(9, 0)).ride_window();
        let b = Appointment::new("A2", date(2024, 3, 5), time(9, 0)).ride_window();
        assert!(!a.overlaps(&b));
    }
}
