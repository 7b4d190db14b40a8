//! Hard-requirement eligibility gate.
//!
//! Each requirement is checked independently so simultaneous failures all
//! surface at once. Ineligibility is a first-class return value, not an
//! error: the UI presents critical warnings and demands acknowledgement
//! rather than failing the request. Must always be re-evaluated server-side
//! before an accept; a cached client-side list is never trusted.

use crate::models::{Appointment, ClientAccommodationProfile, DriverProfile};

/// Outcome of the hard-requirement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    /// True iff no critical warning fired.
    pub eligible: bool,
    /// One message per failed hard requirement.
    pub critical_warnings: Vec<String>,
}

/// Evaluates the four hard requirements for a driver against a ride.
pub fn evaluate(
    driver: &DriverProfile,
    client: &ClientAccommodationProfile,
    appointment: &Appointment,
) -> Eligibility {
    let mut critical_warnings = Vec::new();

    if client.has_oxygen && !driver.can_accommodate_oxygen {
        critical_warnings.push("Cannot accommodate oxygen equipment".to_string());
    }

    if client.has_service_animal && !driver.can_accommodate_service_animal {
        critical_warnings.push("Cannot accommodate a service animal".to_string());
    }

    if appointment.has_additional_rider && !driver.can_accommodate_additional_rider {
        critical_warnings.push("Cannot accommodate an additional rider".to_string());
    }

    let missing = missing_equipment(driver, client);
    if !missing.is_empty() {
        critical_warnings.push(format!(
            "Cannot accommodate mobility equipment: {}",
            missing.join(", ")
        ));
    }

    Eligibility {
        eligible: critical_warnings.is_empty(),
        critical_warnings,
    }
}

/// Labels of client equipment the driver cannot accommodate, in the
/// client's declaration order, deduplicated.
fn missing_equipment(driver: &DriverProfile, client: &ClientAccommodationProfile) -> Vec<String> {
    let mut seen = Vec::new();
    for &equipment in &client.mobility_equipment {
        if !driver.accommodates(equipment) && !seen.contains(&equipment) {
            seen.push(equipment);
        }
    }
    seen.into_iter().map(|e| e.label().to_string()).collect()
}
