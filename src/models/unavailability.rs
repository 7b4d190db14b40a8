//! Driver unavailability blocks.
//!
//! A block is either a bounded date range (a single day when start == end)
//! or a recurring weekly pattern, optionally narrowed to a time-of-day
//! sub-range. The variant split makes the structural invariant (a recurring
//! block never carries dates, a date range never carries a weekday)
//! unrepresentable rather than validated.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// The recurrence shape of an unavailability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// A bounded span of calendar dates (inclusive on both ends).
    DateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// Every occurrence of a weekday.
    Recurring { day_of_week: Weekday },
}

/// A period during which a driver cannot take rides.
///
/// Created and edited through the unavailability workflow; matching and
/// overlap detection only read these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailabilityBlock {
    /// Unique block identifier.
    pub id: String,
    /// Owning driver.
    pub driver_id: String,
    /// Date range or weekly recurrence.
    pub kind: BlockKind,
    /// Occupies the whole day; `start_time`/`end_time` are ignored.
    pub is_all_day: bool,
    /// Time-of-day start (required when not all-day).
    pub start_time: Option<NaiveTime>,
    /// Time-of-day end (required when not all-day, must exceed `start_time`).
    pub end_time: Option<NaiveTime>,
}

impl UnavailabilityBlock {
    /// Creates an all-day block over a date range (inclusive).
    pub fn date_range(
        id: impl Into<String>,
        driver_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            driver_id: driver_id.into(),
            kind: BlockKind::DateRange {
                start_date,
                end_date,
            },
            is_all_day: true,
            start_time: None,
            end_time: None,
        }
    }

    /// Creates an all-day block for a single date.
    pub fn single_day(
        id: impl Into<String>,
        driver_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::date_range(id, driver_id, date, date)
    }

    /// Creates an all-day block recurring on a weekday.
    pub fn recurring(
        id: impl Into<String>,
        driver_id: impl Into<String>,
        day_of_week: Weekday,
    ) -> Self {
        Self {
            id: id.into(),
            driver_id: driver_id.into(),
            kind: BlockKind::Recurring { day_of_week },
            is_all_day: true,
            start_time: None,
            end_time: None,
        }
    }

    /// Narrows the block to a time-of-day range (clears the all-day flag).
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.is_all_day = false;
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// The effective time-of-day range, or `None` for all-day blocks.
    pub fn time_range(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_all_day {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => Some((s, e)),
            // Missing times on a non-all-day block are a validation error
            // upstream; treat as all-day so overlap checks stay conservative.
            _ => None,
        }
    }

    /// Whether this block occupies the given calendar date.
    pub fn occupies_date(&self, date: NaiveDate) -> bool {
        match self.kind {
            BlockKind::DateRange {
                start_date,
                end_date,
            } => start_date <= date && date <= end_date,
            BlockKind::Recurring { day_of_week } => {
                chrono::Datelike::weekday(&date) == day_of_week
            }
        }
    }
}
