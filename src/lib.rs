//! Driver-matching core for volunteer ride coordination.
//!
//! Matches a client's ride request against a pool of volunteer drivers:
//! hard accommodation requirements gate eligibility, a weighted score
//! ranks suitability, and calendar overlap detection keeps each driver's
//! unavailability consistent. Acceptance is guarded by a warning gate and
//! a conditional write, so two drivers racing for the same ride resolve
//! to exactly one winner.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Appointment`, `RideWindow`, `DriverProfile`,
//!   `ClientAccommodationProfile`, `UnavailabilityBlock`)
//! - **`overlap`**: Unavailability block overlap detection, recurring and
//!   date-range kinds included
//! - **`matching`**: Eligibility gate, suitability scoring, two-tier ranking
//! - **`gate`**: Acceptance state machine with critical/standard warnings
//! - **`store`**: Persistence contracts and in-memory implementations
//! - **`service`**: Operation-level orchestration over the stores
//! - **`validation`**: Field-level input checks for unavailability blocks

pub mod gate;
pub mod matching;
pub mod models;
pub mod overlap;
pub mod service;
pub mod store;
pub mod validation;
