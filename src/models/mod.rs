//! Ride-dispatch domain models.
//!
//! Core data types consumed by matching: the ride request, the client's
//! accommodation needs, the driver's capabilities, and driver unavailability.
//! All are read-only inputs; ownership of the underlying records sits with
//! the surrounding booking and user-management subsystems.
//!
//! # Time Model
//! Calendar-anchored: `chrono` naive dates and times in the organization's
//! local timezone. Recurring unavailability is keyed by weekday, so an
//! epoch-offset representation would not fit.

mod appointment;
mod client;
mod driver;
mod unavailability;

pub use appointment::{Appointment, RideWindow, DEFAULT_DURATION_MINUTES};
pub use client::{ClientAccommodationProfile, MobilityEquipment, VehicleType};
pub use driver::DriverProfile;
pub use unavailability::{BlockKind, UnavailabilityBlock};
