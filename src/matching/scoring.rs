//! Driver suitability scoring.
//!
//! Composes a suitability score from four bounded base components
//! (load-balancing, vehicle match, mobility equipment, spare special
//! accommodations) net of three flagged penalties (unavailability overlap,
//! concurrent ride, weekly cap). The exact constants live in
//! [`ScoreWeights`]; the contract is monotonicity in each stated direction
//! and determinism for identical inputs.

use serde::{Deserialize, Serialize};

use super::context::MatchingContext;
use crate::models::{Appointment, ClientAccommodationProfile, DriverProfile};
use crate::overlap::block_overlaps_window;

/// Scoring constants.
///
/// Base components are bounded: load-balancing tops out at
/// `load_balancing_max`, vehicle match is all-or-nothing, mobility equipment
/// scales with the supported fraction of required gear, and each spare
/// special-accommodation capability earns `special_accommodation_each`.
/// Penalties are large relative to base components so a flagged driver ranks
/// below comparable clean drivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Ceiling of the load-balancing component.
    pub load_balancing_max: f64,
    /// Points gained per ride below the pool average (and lost per ride above).
    pub load_balancing_per_ride: f64,
    /// Awarded when the driver drives an acceptable vehicle type.
    pub vehicle_match: f64,
    /// Ceiling of the mobility-equipment component.
    pub mobility_equipment_max: f64,
    /// Per spare special-accommodation capability (oxygen, service animal,
    /// additional rider) not required by this ride.
    pub special_accommodation_each: f64,
    /// Subtracted when an unavailability block covers the ride window.
    pub unavailable_penalty: f64,
    /// Subtracted when another accepted ride overlaps the window.
    pub concurrent_ride_penalty: f64,
    /// Subtracted when accepting would exceed the weekly cap.
    pub over_max_rides_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            load_balancing_max: 30.0,
            load_balancing_per_ride: 3.0,
            vehicle_match: 20.0,
            mobility_equipment_max: 20.0,
            special_accommodation_each: 5.0,
            unavailable_penalty: 40.0,
            concurrent_ride_penalty: 35.0,
            over_max_rides_penalty: 25.0,
        }
    }
}

/// The closed set of soft-warning conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFlags {
    /// An unavailability block covers the ride window.
    pub has_unavailability: bool,
    /// Another accepted ride overlaps the window.
    pub has_concurrent_ride: bool,
    /// Accepting would exceed the weekly ride cap.
    pub is_over_max_rides: bool,
    /// The driver drives none of the client's acceptable vehicle types.
    pub has_vehicle_mismatch: bool,
}

impl WarningFlags {
    /// Whether any warning condition fired.
    pub fn any(&self) -> bool {
        self.has_unavailability
            || self.has_concurrent_ride
            || self.is_over_max_rides
            || self.has_vehicle_mismatch
    }
}

/// Per-driver score decomposition. Constructed fresh per matching request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// `sum(base) - sum(penalties)`, clamped at zero.
    pub total: f64,
    /// Load-balancing component.
    pub load_balancing: f64,
    /// Vehicle-type match component.
    pub vehicle_match: f64,
    /// Mobility-equipment coverage component.
    pub mobility_equipment: f64,
    /// Spare special-accommodation component.
    pub special_accommodations: f64,
    /// Unavailability overlap penalty (0 when not flagged).
    pub unavailable_penalty: f64,
    /// Concurrent-ride penalty (0 when not flagged).
    pub concurrent_ride_penalty: f64,
    /// Weekly-cap penalty (0 when not flagged).
    pub over_max_rides_penalty: f64,
    /// Warning conditions behind the penalties (plus vehicle mismatch).
    pub flags: WarningFlags,
}

/// Scores one driver for one ride.
///
/// Pure: reads only its arguments, so per-driver calls can run in parallel.
pub fn score(
    driver: &DriverProfile,
    client: &ClientAccommodationProfile,
    appointment: &Appointment,
    context: &MatchingContext,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let weekly_count = context.weekly_rides(&driver.id);
    let window = appointment.ride_window();

    // Load balancing: midpoint at the pool average, linear either side.
    let average = context.pool_average_weekly_rides();
    let midpoint = weights.load_balancing_max / 2.0;
    let load_balancing = (midpoint
        + weights.load_balancing_per_ride * (average - f64::from(weekly_count)))
    .clamp(0.0, weights.load_balancing_max);

    let vehicle_ok = driver.drives_any_of(&client.vehicle_types);
    let vehicle_match = if vehicle_ok { weights.vehicle_match } else { 0.0 };

    let mobility_equipment = mobility_score(driver, client, weights);

    // Spare capacity: capabilities this ride does not require.
    let mut spare = 0u32;
    if driver.can_accommodate_oxygen && !client.has_oxygen {
        spare += 1;
    }
    if driver.can_accommodate_service_animal && !client.has_service_animal {
        spare += 1;
    }
    if driver.can_accommodate_additional_rider && !appointment.has_additional_rider {
        spare += 1;
    }
    let special_accommodations = weights.special_accommodation_each * f64::from(spare);

    let has_unavailability = context
        .unavailability_for(&driver.id)
        .iter()
        .any(|block| block_overlaps_window(block, &window));
    let has_concurrent_ride = context.has_concurrent_ride(&driver.id);
    let is_over_max_rides =
        driver.max_rides_per_week > 0 && weekly_count + 1 > driver.max_rides_per_week;

    let unavailable_penalty = if has_unavailability {
        weights.unavailable_penalty
    } else {
        0.0
    };
    let concurrent_ride_penalty = if has_concurrent_ride {
        weights.concurrent_ride_penalty
    } else {
        0.0
    };
    let over_max_rides_penalty = if is_over_max_rides {
        weights.over_max_rides_penalty
    } else {
        0.0
    };

    let base = load_balancing + vehicle_match + mobility_equipment + special_accommodations;
    let penalties = unavailable_penalty + concurrent_ride_penalty + over_max_rides_penalty;

    ScoreBreakdown {
        // Clamped at zero so ordering stays stable near the floor.
        total: (base - penalties).max(0.0),
        load_balancing,
        vehicle_match,
        mobility_equipment,
        special_accommodations,
        unavailable_penalty,
        concurrent_ride_penalty,
        over_max_rides_penalty,
        flags: WarningFlags {
            has_unavailability,
            has_concurrent_ride,
            is_over_max_rides,
            has_vehicle_mismatch: !vehicle_ok,
        },
    }
}

/// Fraction of the client's distinct required equipment the driver supports,
/// scaled to the component ceiling. Full marks when nothing is required.
fn mobility_score(
    driver: &DriverProfile,
    client: &ClientAccommodationProfile,
    weights: &ScoreWeights,
) -> f64 {
    let mut required = Vec::new();
    for &equipment in &client.mobility_equipment {
        if !required.contains(&equipment) {
            required.push(equipment);
        }
    }
    if required.is_empty() {
        return weights.mobility_equipment_max;
    }
    let supported = required.iter().filter(|&&e| driver.accommodates(e)).count();
    weights.mobility_equipment_max * supported as f64 / required.len() as f64
}

/// Human-readable match reasons, in fixed order: accommodations, vehicle,
/// load balancing, then warnings.
pub fn match_reasons(
    driver: &DriverProfile,
    client: &ClientAccommodationProfile,
    breakdown: &ScoreBreakdown,
    context: &MatchingContext,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if client.has_accommodation_needs() && can_meet_all_needs(driver, client) {
        reasons.push("Meets all accommodation needs".to_string());
    }

    if !breakdown.flags.has_vehicle_mismatch && !client.vehicle_types.is_empty() {
        reasons.push("Drives a vehicle type the client accepts".to_string());
    }

    let count = context.weekly_rides(&driver.id);
    reasons.push(format!(
        "{} rides this week (pool average {:.1})",
        count,
        context.pool_average_weekly_rides()
    ));

    reasons.extend(standard_warnings(driver, breakdown, count));
    reasons
}

/// Soft-warning messages for the flagged penalty conditions.
///
/// The weekly-cap message interpolates the literal counts, e.g.
/// "weekly ride limit (5/5)".
pub fn standard_warnings(
    driver: &DriverProfile,
    breakdown: &ScoreBreakdown,
    weekly_count: u32,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if breakdown.flags.has_unavailability {
        warnings.push("Marked unavailable during this ride".to_string());
    }
    if breakdown.flags.has_concurrent_ride {
        warnings.push("Already has a ride overlapping this time".to_string());
    }
    if breakdown.flags.is_over_max_rides {
        warnings.push(format!(
            "Accepting this ride would exceed your weekly ride limit ({}/{})",
            weekly_count, driver.max_rides_per_week
        ));
    }
    if breakdown.flags.has_vehicle_mismatch {
        warnings.push("Does not drive a vehicle type the client accepts".to_string());
    }
    warnings
}

fn can_meet_all_needs(driver: &DriverProfile, client: &ClientAccommodationProfile) -> bool {
    (!client.has_oxygen || driver.can_accommodate_oxygen)
        && (!client.has_service_animal || driver.can_accommodate_service_animal)
        && client
            .mobility_equipment
            .iter()
            .all(|&e| driver.accommodates(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MobilityEquipment, UnavailabilityBlock, VehicleType};
    use chrono::{NaiveDate, NaiveTime};

    fn appointment() -> Appointment {
        Appointment::new(
            "A1",
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    fn weights() -> ScoreWeights {
        ScoreWeights::default()
    }

    #[test]
    fn test_load_balancing_rewards_underutilized() {
        let client = ClientAccommodationProfile::new();
        let appt = appointment();
        let ctx = MatchingContext::for_pool(2)
            .with_weekly_rides("busy", 6)
            .with_weekly_rides("idle", 0);

        let busy = score(&DriverProfile::new("busy"), &client, &appt, &ctx, &weights());
        let idle = score(&DriverProfile::new("idle"), &client, &appt, &ctx, &weights());
        assert!(idle.load_balancing > busy.load_balancing);
    }

    #[test]
    fn test_load_balancing_bounded() {
        let client = ClientAccommodationProfile::new();
        let appt = appointment();
        let ctx = MatchingContext::for_pool(2)
            .with_weekly_rides("D1", 0)
            .with_weekly_rides("D2", 100);

        let idle = score(&DriverProfile::new("D1"), &client, &appt, &ctx, &weights());
        let swamped = score(&DriverProfile::new("D2"), &client, &appt, &ctx, &weights());
        assert!(idle.load_balancing <= weights().load_balancing_max);
        assert_eq!(swamped.load_balancing, 0.0);
    }

    #[test]
    fn test_vehicle_mismatch_flag() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1);
        let client = ClientAccommodationProfile::new().with_vehicle(VehicleType::Minivan);

        let sedan = DriverProfile::new("D1").with_vehicle(VehicleType::Sedan);
        let breakdown = score(&sedan, &client, &appt, &ctx, &weights());
        assert!(breakdown.flags.has_vehicle_mismatch);
        assert_eq!(breakdown.vehicle_match, 0.0);

        let minivan = DriverProfile::new("D2").with_vehicle(VehicleType::Minivan);
        let breakdown = score(&minivan, &client, &appt, &ctx, &weights());
        assert!(!breakdown.flags.has_vehicle_mismatch);
        assert_eq!(breakdown.vehicle_match, weights().vehicle_match);
    }

    #[test]
    fn test_no_vehicle_preference_never_mismatches() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1);
        let client = ClientAccommodationProfile::new();
        let driver = DriverProfile::new("D1").with_vehicle(VehicleType::Truck);
        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        assert!(!breakdown.flags.has_vehicle_mismatch);
    }

    #[test]
    fn test_mobility_fraction() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1);
        let client = ClientAccommodationProfile::new()
            .with_equipment(MobilityEquipment::Cane)
            .with_equipment(MobilityEquipment::Rollator);

        let half = DriverProfile::new("D1").with_equipment(MobilityEquipment::Cane);
        let breakdown = score(&half, &client, &appt, &ctx, &weights());
        assert!((breakdown.mobility_equipment - weights().mobility_equipment_max / 2.0).abs() < 1e-10);

        let full = DriverProfile::new("D2")
            .with_equipment(MobilityEquipment::Cane)
            .with_equipment(MobilityEquipment::Rollator);
        let breakdown = score(&full, &client, &appt, &ctx, &weights());
        assert_eq!(breakdown.mobility_equipment, weights().mobility_equipment_max);
    }

    #[test]
    fn test_spare_accommodations() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1);
        let client = ClientAccommodationProfile::new();

        let driver = DriverProfile::new("D1")
            .with_oxygen()
            .with_service_animal()
            .with_additional_rider();
        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        assert_eq!(
            breakdown.special_accommodations,
            3.0 * weights().special_accommodation_each
        );

        // A required capability is no longer spare
        let needy = ClientAccommodationProfile::new().with_oxygen();
        let breakdown = score(&driver, &needy, &appt, &ctx, &weights());
        assert_eq!(
            breakdown.special_accommodations,
            2.0 * weights().special_accommodation_each
        );
    }

    #[test]
    fn test_unavailability_penalty() {
        let appt = appointment();
        let block =
            UnavailabilityBlock::single_day("B1", "D1", NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        let ctx = MatchingContext::for_pool(1).with_unavailability("D1", vec![block]);
        let client = ClientAccommodationProfile::new();

        let breakdown = score(&DriverProfile::new("D1"), &client, &appt, &ctx, &weights());
        assert!(breakdown.flags.has_unavailability);
        assert_eq!(breakdown.unavailable_penalty, weights().unavailable_penalty);
    }

    #[test]
    fn test_concurrent_ride_penalty() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1).with_concurrent_ride("D1");
        let client = ClientAccommodationProfile::new();
        let breakdown = score(&DriverProfile::new("D1"), &client, &appt, &ctx, &weights());
        assert!(breakdown.flags.has_concurrent_ride);
        assert_eq!(
            breakdown.concurrent_ride_penalty,
            weights().concurrent_ride_penalty
        );
    }

    #[test]
    fn test_over_max_rides() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1).with_weekly_rides("D1", 5);
        let client = ClientAccommodationProfile::new();
        let driver = DriverProfile::new("D1").with_max_rides_per_week(5);

        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        assert!(breakdown.flags.is_over_max_rides);

        let warnings = standard_warnings(&driver, &breakdown, 5);
        assert!(warnings.iter().any(|w| w.contains("weekly ride limit (5/5)")));
    }

    #[test]
    fn test_unlimited_cap_never_flags() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1).with_weekly_rides("D1", 50);
        let client = ClientAccommodationProfile::new();
        let driver = DriverProfile::new("D1"); // max 0 = unlimited
        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        assert!(!breakdown.flags.is_over_max_rides);
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let appt = appointment();
        let block =
            UnavailabilityBlock::single_day("B1", "D1", NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        let ctx = MatchingContext::for_pool(2)
            .with_weekly_rides("D1", 20)
            .with_unavailability("D1", vec![block])
            .with_concurrent_ride("D1");
        let client = ClientAccommodationProfile::new().with_vehicle(VehicleType::Minivan);
        let driver = DriverProfile::new("D1").with_max_rides_per_week(5);

        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        assert_eq!(breakdown.total, 0.0);
        assert!(breakdown.flags.any());
    }

    #[test]
    fn test_idempotent_scoring() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(2).with_weekly_rides("D1", 2);
        let client = ClientAccommodationProfile::new().with_oxygen();
        let driver = DriverProfile::new("D1").with_oxygen();

        let first = score(&driver, &client, &appt, &ctx, &weights());
        let second = score(&driver, &client, &appt, &ctx, &weights());
        assert_eq!(first, second);
    }

    #[test]
    fn test_reason_order() {
        let appt = appointment();
        let ctx = MatchingContext::for_pool(1).with_weekly_rides("D1", 5);
        let client = ClientAccommodationProfile::new()
            .with_oxygen()
            .with_vehicle(VehicleType::Sedan);
        let driver = DriverProfile::new("D1")
            .with_oxygen()
            .with_vehicle(VehicleType::Sedan)
            .with_max_rides_per_week(5);

        let breakdown = score(&driver, &client, &appt, &ctx, &weights());
        let reasons = match_reasons(&driver, &client, &breakdown, &ctx);

        assert_eq!(reasons[0], "Meets all accommodation needs");
        assert_eq!(reasons[1], "Drives a vehicle type the client accepts");
        assert!(reasons[2].contains("rides this week"));
        assert!(reasons[3].contains("weekly ride limit (5/5)"));
    }
}
