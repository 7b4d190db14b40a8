//! Match ranking: two-tier perfect/ranked split.
//!
//! Perfect matches are eligible drivers with no warning flags at all; they
//! back the UI's highlighted tier. Everyone else, ineligible drivers
//! included, lands in the ranked tier for transparency. Both tiers share one
//! deterministic comparator so the assignment list and a single driver's
//! can-I-accept check always agree.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::scoring::ScoreBreakdown;
use crate::models::DriverProfile;

/// A driver with their request-scoped match evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDriver {
    /// The driver's capability profile.
    pub driver: DriverProfile,
    /// Composite suitability score (the breakdown's clamped total).
    pub match_score: f64,
    /// Human-readable reasons, fixed order.
    pub match_reasons: Vec<String>,
    /// Accepted rides this week.
    pub weekly_ride_count: u32,
    /// Score decomposition.
    pub breakdown: ScoreBreakdown,
    /// Hard-requirement gate outcome.
    pub eligible: bool,
    /// One message per failed hard requirement.
    pub critical_warnings: Vec<String>,
}

impl ScoredDriver {
    /// A perfect match is eligible with no warning flags, regardless of
    /// score magnitude.
    pub fn is_perfect_match(&self) -> bool {
        self.eligible && !self.breakdown.flags.any()
    }
}

/// The two-tier ranking result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedMatches {
    /// Eligible drivers with no warnings, best first.
    pub perfect_matches: Vec<ScoredDriver>,
    /// Everyone else, best first.
    pub ranked: Vec<ScoredDriver>,
}

impl RankedMatches {
    /// Locates a driver's entry in either tier.
    pub fn find(&self, driver_id: &str) -> Option<&ScoredDriver> {
        self.perfect_matches
            .iter()
            .chain(self.ranked.iter())
            .find(|s| s.driver.id == driver_id)
    }

    /// Total number of scored drivers across both tiers.
    pub fn len(&self) -> usize {
        self.perfect_matches.len() + self.ranked.len()
    }

    /// Whether no drivers were scored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions and orders scored drivers.
///
/// Sort key in both tiers: total score descending, then weekly ride count
/// ascending, then driver id ascending. The comparator is pure, so results
/// are reproducible regardless of scoring order.
pub fn rank(scored: Vec<ScoredDriver>) -> RankedMatches {
    let (mut perfect_matches, mut ranked): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(ScoredDriver::is_perfect_match);

    perfect_matches.sort_by(compare);
    ranked.sort_by(compare);

    RankedMatches {
        perfect_matches,
        ranked,
    }
}

fn compare(a: &ScoredDriver, b: &ScoredDriver) -> Ordering {
    b.match_score
        .total_cmp(&a.match_score)
        .then_with(|| a.weekly_ride_count.cmp(&b.weekly_ride_count))
        .then_with(|| a.driver.id.cmp(&b.driver.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scoring::WarningFlags;

    fn scored(id: &str, total: f64, weekly: u32, eligible: bool, flags: WarningFlags) -> ScoredDriver {
        ScoredDriver {
            driver: DriverProfile::new(id),
            match_score: total,
            match_reasons: Vec::new(),
            weekly_ride_count: weekly,
            breakdown: ScoreBreakdown {
                total,
                load_balancing: total,
                vehicle_match: 0.0,
                mobility_equipment: 0.0,
                special_accommodations: 0.0,
                unavailable_penalty: 0.0,
                concurrent_ride_penalty: 0.0,
                over_max_rides_penalty: 0.0,
                flags,
            },
            eligible,
            critical_warnings: if eligible {
                Vec::new()
            } else {
                vec!["Cannot accommodate oxygen equipment".into()]
            },
        }
    }

    fn clean() -> WarningFlags {
        WarningFlags::default()
    }

    fn flagged() -> WarningFlags {
        WarningFlags {
            has_concurrent_ride: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_and_order() {
        let matches = rank(vec![
            scored("C", 50.0, 1, true, clean()),
            scored("A", 70.0, 0, true, clean()),
            scored("B", 90.0, 2, true, flagged()),
        ]);

        let perfect: Vec<_> = matches.perfect_matches.iter().map(|s| s.driver.id.as_str()).collect();
        assert_eq!(perfect, vec!["A", "C"]);
        // Flagged driver stays out of the perfect tier despite the top score
        let ranked: Vec<_> = matches.ranked.iter().map(|s| s.driver.id.as_str()).collect();
        assert_eq!(ranked, vec!["B"]);
    }

    #[test]
    fn test_ineligible_never_perfect() {
        let matches = rank(vec![
            scored("top", 99.0, 0, false, clean()),
            scored("ok", 10.0, 0, true, clean()),
        ]);
        assert_eq!(matches.perfect_matches.len(), 1);
        assert_eq!(matches.perfect_matches[0].driver.id, "ok");
        assert_eq!(matches.ranked[0].driver.id, "top");
    }

    #[test]
    fn test_tie_breaks() {
        let matches = rank(vec![
            scored("B", 50.0, 3, true, clean()),
            scored("C", 50.0, 1, true, clean()),
            scored("A", 50.0, 1, true, clean()),
        ]);
        let order: Vec<_> = matches.perfect_matches.iter().map(|s| s.driver.id.as_str()).collect();
        // Score tied: fewer weekly rides first, then id
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_deterministic_across_input_order() {
        let forward = rank(vec![
            scored("A", 50.0, 1, true, clean()),
            scored("B", 50.0, 1, true, clean()),
            scored("C", 60.0, 0, true, flagged()),
        ]);
        let backward = rank(vec![
            scored("C", 60.0, 0, true, flagged()),
            scored("B", 50.0, 1, true, clean()),
            scored("A", 50.0, 1, true, clean()),
        ]);

        let ids = |v: &[ScoredDriver]| v.iter().map(|s| s.driver.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&forward.perfect_matches), ids(&backward.perfect_matches));
        assert_eq!(ids(&forward.ranked), ids(&backward.ranked));
    }

    #[test]
    fn test_find_in_either_tier() {
        let matches = rank(vec![
            scored("A", 70.0, 0, true, clean()),
            scored("B", 90.0, 2, true, flagged()),
        ]);
        assert!(matches.find("A").unwrap().is_perfect_match());
        assert!(!matches.find("B").unwrap().is_perfect_match());
        assert!(matches.find("Z").is_none());
    }

    #[test]
    fn test_empty() {
        let matches = rank(Vec::new());
        assert!(matches.is_empty());
        assert_eq!(matches.len(), 0);
    }
}
