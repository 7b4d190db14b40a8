//! Matching context: per-request read-only lookup state.
//!
//! Built once per matching request by the surrounding service layer and
//! passed into scoring. Everything is keyed by driver id so per-driver
//! lookups are explicit and the scoring functions stay pure. No shared or
//! global caches.

use std::collections::{HashMap, HashSet};

use crate::models::UnavailabilityBlock;

/// Read-only driver-pool state for one matching request.
#[derive(Debug, Clone, Default)]
pub struct MatchingContext {
    /// Unavailability blocks per driver.
    unavailability: HashMap<String, Vec<UnavailabilityBlock>>,
    /// Accepted rides this week per driver. Missing = 0.
    weekly_ride_counts: HashMap<String, u32>,
    /// Drivers with another accepted ride overlapping this appointment's window.
    concurrent_rides: HashSet<String>,
    /// Pool size used for the load-balancing average. Missing drivers count
    /// as zero rides, so this must be the full pool, not just busy drivers.
    pool_size: usize,
}

impl MatchingContext {
    /// Creates an empty context for a pool of the given size.
    pub fn for_pool(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Default::default()
        }
    }

    /// Sets a driver's unavailability blocks.
    pub fn with_unavailability(
        mut self,
        driver_id: impl Into<String>,
        blocks: Vec<UnavailabilityBlock>,
    ) -> Self {
        self.unavailability.insert(driver_id.into(), blocks);
        self
    }

    /// Sets a driver's accepted ride count for the current week.
    pub fn with_weekly_rides(mut self, driver_id: impl Into<String>, count: u32) -> Self {
        self.weekly_ride_counts.insert(driver_id.into(), count);
        self
    }

    /// Flags a driver as having a concurrent ride.
    pub fn with_concurrent_ride(mut self, driver_id: impl Into<String>) -> Self {
        self.concurrent_rides.insert(driver_id.into());
        self
    }

    /// Unavailability blocks for a driver (empty when none recorded).
    pub fn unavailability_for(&self, driver_id: &str) -> &[UnavailabilityBlock] {
        self.unavailability
            .get(driver_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// This week's accepted ride count for a driver.
    pub fn weekly_rides(&self, driver_id: &str) -> u32 {
        self.weekly_ride_counts.get(driver_id).copied().unwrap_or(0)
    }

    /// Whether a driver already has an overlapping accepted ride.
    pub fn has_concurrent_ride(&self, driver_id: &str) -> bool {
        self.concurrent_rides.contains(driver_id)
    }

    /// Average weekly ride count across the pool.
    ///
    /// Drivers without an entry count as zero. Returns 0.0 for an empty pool.
    pub fn pool_average_weekly_rides(&self) -> f64 {
        let pool = self.pool_size.max(self.weekly_ride_counts.len());
        if pool == 0 {
            return 0.0;
        }
        let total: u64 = self.weekly_ride_counts.values().map(|&c| u64::from(c)).sum();
        total as f64 / pool as f64
    }
}
