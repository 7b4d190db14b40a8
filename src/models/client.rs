//! Client accommodation profile.
//!
//! Captures what a client needs from a driver: mobility equipment that must
//! fit in the vehicle, oxygen and service-animal support, and which vehicle
//! types the client can ride in. Read-only input to matching; the client
//! record itself is owned by the surrounding client-management subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mobility equipment a client travels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityEquipment {
    Cane,
    Crutches,
    LightweightWalker,
    Rollator,
    Other,
}

impl MobilityEquipment {
    /// Human-readable label used in warning messages.
    pub fn label(&self) -> &'static str {
        match self {
            MobilityEquipment::Cane => "cane",
            MobilityEquipment::Crutches => "crutches",
            MobilityEquipment::LightweightWalker => "lightweight walker",
            MobilityEquipment::Rollator => "rollator",
            MobilityEquipment::Other => "other equipment",
        }
    }
}

impl fmt::Display for MobilityEquipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vehicle type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Sedan,
    Suv,
    Minivan,
    Truck,
    Other,
}

/// What a client needs accommodated on a ride.
///
/// An empty `vehicle_types` list means the client has no vehicle preference
/// (any vehicle is acceptable). Empty collections rather than `Option` keep
/// normalization out of the scoring path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientAccommodationProfile {
    /// Equipment the client travels with (all must be accommodated).
    pub mobility_equipment: Vec<MobilityEquipment>,
    /// Client travels with oxygen equipment.
    pub has_oxygen: bool,
    /// Client travels with a service animal.
    pub has_service_animal: bool,
    /// Vehicle types the client can ride in. Empty = no preference.
    pub vehicle_types: Vec<VehicleType>,
}

impl ClientAccommodationProfile {
    /// Creates a profile with no accommodation needs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a piece of mobility equipment.
    pub fn with_equipment(mut self, equipment: MobilityEquipment) -> Self {
        self.mobility_equipment.push(equipment);
        self
    }

    /// Marks the client as traveling with oxygen.
    pub fn with_oxygen(mut self) -> Self {
        self.has_oxygen = true;
        self
    }

    /// Marks the client as traveling with a service animal.
    pub fn with_service_animal(mut self) -> Self {
        self.has_service_animal = true;
        self
    }

    /// Adds an acceptable vehicle type.
    pub fn with_vehicle(mut self, vehicle: VehicleType) -> Self {
        self.vehicle_types.push(vehicle);
        self
    }

    /// Whether the client has any special accommodation needs at all.
    pub fn has_accommodation_needs(&self) -> bool {
        self.has_oxygen || self.has_service_animal || !self.mobility_equipment.is_empty()
    }
}
