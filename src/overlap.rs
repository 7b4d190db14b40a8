//! Unavailability overlap detection.
//!
//! Decides whether unavailability blocks collide with each other (guarding
//! block creation) and whether a block covers an appointment's ride window
//! (feeding the scoring penalty). Overlap is symmetric and pure: no conflicts
//! means an empty result, never an error. Business-rule outcomes are data.
//!
//! # Rules
//! Two blocks overlap when their day patterns intersect AND their
//! time-of-day ranges are not provably disjoint. All-day blocks occupy the
//! full day, so they never pass the time-disjointness carve-out.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::models::{BlockKind, RideWindow, UnavailabilityBlock};

/// Finds every existing block that would overlap with `candidate`.
///
/// A block with the same id as the candidate is skipped, so re-saving an
/// edited block does not conflict with itself. The caller maps a non-empty
/// result to a conflict response carrying the returned blocks.
pub fn find_overlaps(
    candidate: &UnavailabilityBlock,
    existing: &[UnavailabilityBlock],
) -> Vec<UnavailabilityBlock> {
    existing
        .iter()
        .filter(|block| block.id != candidate.id)
        .filter(|block| blocks_overlap(candidate, block))
        .cloned()
        .collect()
}

/// Whether two blocks overlap. Symmetric in its arguments.
pub fn blocks_overlap(a: &UnavailabilityBlock, b: &UnavailabilityBlock) -> bool {
    days_intersect(&a.kind, &b.kind) && !times_disjoint(a, b)
}

/// Whether a block covers any part of an appointment's ride window.
///
/// Walks each calendar date the window touches and compares the window's
/// time slice on that date against the block's time range.
pub fn block_overlaps_window(block: &UnavailabilityBlock, window: &RideWindow) -> bool {
    let first = window.start.date();
    let last = window.end.date();

    let mut date = first;
    while date <= last {
        let slice_start = if date == first {
            minute_of_day(window.start.time())
        } else {
            0
        };
        let slice_end = if date == last {
            minute_of_day(window.end.time())
        } else {
            MINUTES_PER_DAY
        };

        // A window ending exactly at midnight contributes nothing to its
        // final date.
        if slice_end > slice_start && block.occupies_date(date) {
            match block.time_range() {
                None => return true,
                Some((bs, be)) => {
                    if slice_start < minute_of_day(be) && minute_of_day(bs) < slice_end {
                        return true;
                    }
                }
            }
        }

        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }
    false
}

const MINUTES_PER_DAY: u32 = 24 * 60;

#[inline]
fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

fn days_intersect(a: &BlockKind, b: &BlockKind) -> bool {
    match (*a, *b) {
        (
            BlockKind::Recurring { day_of_week: wa },
            BlockKind::Recurring { day_of_week: wb },
        ) => wa == wb,
        (
            BlockKind::Recurring { day_of_week },
            BlockKind::DateRange {
                start_date,
                end_date,
            },
        )
        | (
            BlockKind::DateRange {
                start_date,
                end_date,
            },
            BlockKind::Recurring { day_of_week },
        ) => span_contains_weekday(start_date, end_date, day_of_week),
        (
            BlockKind::DateRange {
                start_date: s1,
                end_date: e1,
            },
            BlockKind::DateRange {
                start_date: s2,
                end_date: e2,
            },
        ) => s1 <= e2 && s2 <= e1,
    }
}

/// Whether the inclusive span [start, end] lands on the given weekday.
fn span_contains_weekday(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> bool {
    if end < start {
        return false;
    }
    let days = (end - start).num_days();
    if days >= 6 {
        return true;
    }
    (0..=days as u64).any(|offset| {
        start
            .checked_add_days(Days::new(offset))
            .is_some_and(|d| d.weekday() == weekday)
    })
}

/// Time ranges are disjoint only when both blocks are time-scoped.
fn times_disjoint(a: &UnavailabilityBlock, b: &UnavailabilityBlock) -> bool {
    match (a.time_range(), b.time_range()) {
        (Some((a_start, a_end)), Some((b_start, b_end))) => a_end <= b_start || b_end <= a_start,
        _ => false,
    }
}
