//! Driver capability profile.
//!
//! What a volunteer driver can accommodate: equipment, oxygen, service
//! animals, an additional rider, and the vehicle types they drive. Owned by
//! the surrounding user-management subsystem; matching reads it as-is.

use serde::{Deserialize, Serialize};

use super::{MobilityEquipment, VehicleType};

/// A volunteer driver's capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverProfile {
    /// Unique driver identifier.
    pub id: String,
    /// Mobility equipment this driver can accommodate.
    pub mobility_equipment: Vec<MobilityEquipment>,
    /// Can transport oxygen equipment.
    pub can_accommodate_oxygen: bool,
    /// Can transport a service animal.
    pub can_accommodate_service_animal: bool,
    /// Can take one additional rider beyond the client.
    pub can_accommodate_additional_rider: bool,
    /// Vehicle types the driver drives.
    pub vehicle_types: Vec<VehicleType>,
    /// Weekly ride cap. 0 = unlimited.
    pub max_rides_per_week: u32,
}

impl DriverProfile {
    /// Creates a driver with no special capabilities.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mobility_equipment: Vec::new(),
            can_accommodate_oxygen: false,
            can_accommodate_service_animal: false,
            can_accommodate_additional_rider: false,
            vehicle_types: Vec::new(),
            max_rides_per_week: 0,
        }
    }

    /// Adds a piece of mobility equipment the driver can accommodate.
    pub fn with_equipment(mut self, equipment: MobilityEquipment) -> Self {
        self.mobility_equipment.push(equipment);
        self
    }

    /// Marks the driver as able to transport oxygen equipment.
    pub fn with_oxygen(mut self) -> Self {
        self.can_accommodate_oxygen = true;
        self
    }

    /// Marks the driver as able to transport a service animal.
    pub fn with_service_animal(mut self) -> Self {
        self.can_accommodate_service_animal = true;
        self
    }

    /// Marks the driver as able to take an additional rider.
    pub fn with_additional_rider(mut self) -> Self {
        self.can_accommodate_additional_rider = true;
        self
    }

    /// Adds a vehicle type the driver drives.
    pub fn with_vehicle(mut self, vehicle: VehicleType) -> Self {
        self.vehicle_types.push(vehicle);
        self
    }

    /// Sets the weekly ride cap (0 = unlimited).
    pub fn with_max_rides_per_week(mut self, max: u32) -> Self {
        self.max_rides_per_week = max;
        self
    }

    /// Whether the driver can accommodate a specific piece of equipment.
    pub fn accommodates(&self, equipment: MobilityEquipment) -> bool {
        self.mobility_equipment.contains(&equipment)
    }

    /// Whether the driver drives any of the given vehicle types.
    ///
    /// An empty `acceptable` list means no preference and always matches.
    pub fn drives_any_of(&self, acceptable: &[VehicleType]) -> bool {
        acceptable.is_empty() || self.vehicle_types.iter().any(|v| acceptable.contains(v))
    }
}
