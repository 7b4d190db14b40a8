//! Driver matching: eligibility, scoring, and ranking.
//!
//! The matching computation is pure and stateless: each driver is scored
//! independently against the ride from a read-only [`MatchingContext`], then
//! a single deterministic sort produces the two-tier ranking. Per-driver
//! scoring runs in parallel; the comparator is side-effect-free, so the
//! result is identical to sequential evaluation.
//!
//! # Usage
//!
//! ```
//! use ride_dispatch::matching::{self, MatchingContext, ScoreWeights};
//! use ride_dispatch::models::{Appointment, ClientAccommodationProfile, DriverProfile};
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let appointment = Appointment::new(
//!     "A1",
//!     NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
//!     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//! );
//! let client = ClientAccommodationProfile::new();
//! let drivers = vec![DriverProfile::new("D1"), DriverProfile::new("D2")];
//! let context = MatchingContext::for_pool(drivers.len());
//!
//! let matches = matching::score_pool(
//!     &drivers,
//!     &client,
//!     &appointment,
//!     &context,
//!     &ScoreWeights::default(),
//! );
//! assert_eq!(matches.len(), 2);
//! ```

mod context;
pub mod eligibility;
mod ranker;
pub mod scoring;

pub use context::MatchingContext;
pub use eligibility::Eligibility;
pub use ranker::{rank, RankedMatches, ScoredDriver};
pub use scoring::{ScoreBreakdown, ScoreWeights, WarningFlags};

use rayon::prelude::*;

use crate::models::{Appointment, ClientAccommodationProfile, DriverProfile};

/// Evaluates one driver: hard gate, score breakdown, and reasons.
pub fn score_driver(
    driver: &DriverProfile,
    client: &ClientAccommodationProfile,
    appointment: &Appointment,
    context: &MatchingContext,
    weights: &ScoreWeights,
) -> ScoredDriver {
    let eligibility = eligibility::evaluate(driver, client, appointment);
    let breakdown = scoring::score(driver, client, appointment, context, weights);
    let match_reasons = scoring::match_reasons(driver, client, &breakdown, context);

    ScoredDriver {
        driver: driver.clone(),
        match_score: breakdown.total,
        match_reasons,
        weekly_ride_count: context.weekly_rides(&driver.id),
        breakdown,
        eligible: eligibility.eligible,
        critical_warnings: eligibility.critical_warnings,
    }
}

/// Scores the whole pool in parallel, then ranks deterministically.
///
/// Returns only complete result sets. Abandoning a cancelled request means
/// dropping the returned value; there is no partial-output path.
pub fn score_pool(
    drivers: &[DriverProfile],
    client: &ClientAccommodationProfile,
    appointment: &Appointment,
    context: &MatchingContext,
    weights: &ScoreWeights,
) -> RankedMatches {
    let scored: Vec<ScoredDriver> = drivers
        .par_iter()
        .map(|driver| score_driver(driver, client, appointment, context, weights))
        .collect();
    rank(scored)
}
