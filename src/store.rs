//! Persistence-boundary contracts and in-memory implementations.
//!
//! The core never talks to a database directly; it sees these traits. The
//! one genuine concurrency hazard in the system lives here: two drivers
//! racing to accept the same ride must resolve to exactly one winner, so
//! assignment is a conditional write ("assign only while still unassigned")
//! and unavailability insertion is atomic with its overlap check. The
//! in-memory implementations back tests and small deployments; a SQL-backed
//! implementation expresses the same contracts as conditional UPDATEs.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Appointment, UnavailabilityBlock};
use crate::overlap;

/// Booking status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Unassigned,
    Assigned,
    Cancelled,
}

/// An appointment as the persistence layer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment: Appointment,
    pub status: AppointmentStatus,
    /// Set iff `status == Assigned`.
    pub driver_id: Option<String>,
}

impl AppointmentRecord {
    /// Wraps a new, unassigned appointment.
    pub fn unassigned(appointment: Appointment) -> Self {
        Self {
            appointment,
            status: AppointmentStatus::Unassigned,
            driver_id: None,
        }
    }
}

/// Storage-layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The conditional write lost the race: someone else assigned first.
    #[error("appointment '{0}' is already assigned")]
    AlreadyAssigned(String),
    #[error("appointment '{0}' not found")]
    NotFound(String),
    /// Backend failure (connection loss, timeout). Never silently swallowed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Unavailability insertion failure.
#[derive(Debug, Error)]
pub enum InsertBlockError {
    /// The candidate overlaps existing blocks. Carries the full conflicting
    /// list so the caller can render them without re-fetching.
    #[error("block overlaps {} existing block(s)", .0.len())]
    Overlap(Vec<UnavailabilityBlock>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Appointment persistence contract.
pub trait AppointmentStore: Send + Sync {
    /// Fetches an appointment record.
    fn get(&self, appointment_id: &str) -> Result<AppointmentRecord, StoreError>;

    /// Assigns a driver iff the appointment is still unassigned.
    ///
    /// Compare-and-swap semantics: of two concurrent calls, exactly one
    /// succeeds and the other gets [`StoreError::AlreadyAssigned`].
    fn assign_if_unassigned(&self, appointment_id: &str, driver_id: &str)
        -> Result<(), StoreError>;

    /// All accepted (assigned, not cancelled) rides with their drivers.
    fn accepted_assignments(&self) -> Result<Vec<(String, Appointment)>, StoreError>;
}

/// Unavailability persistence contract.
pub trait UnavailabilityStore: Send + Sync {
    /// A driver's current unavailability blocks.
    fn blocks_for(&self, driver_id: &str) -> Result<Vec<UnavailabilityBlock>, StoreError>;

    /// Inserts a block, checking for overlaps first.
    ///
    /// The check and the insert are atomic with respect to other inserts for
    /// the same driver, so two simultaneous submissions cannot both pass the
    /// check against a stale read. `ignore_overlap` forces the save after
    /// the caller has shown the conflicts to the user.
    fn insert(
        &self,
        block: UnavailabilityBlock,
        ignore_overlap: bool,
    ) -> Result<(), InsertBlockError>;
}

/// In-memory appointment store.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    records: Mutex<HashMap<String, AppointmentRecord>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unassigned appointment.
    pub fn add(&self, appointment: Appointment) {
        let record = AppointmentRecord::unassigned(appointment);
        self.records
            .lock()
            .expect("appointment store lock poisoned")
            .insert(record.appointment.id.clone(), record);
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn get(&self, appointment_id: &str) -> Result<AppointmentRecord, StoreError> {
        self.records
            .lock()
            .expect("appointment store lock poisoned")
            .get(appointment_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(appointment_id.to_string()))
    }

    fn assign_if_unassigned(
        &self,
        appointment_id: &str,
        driver_id: &str,
    ) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .expect("appointment store lock poisoned");
        let record = records
            .get_mut(appointment_id)
            .ok_or_else(|| StoreError::NotFound(appointment_id.to_string()))?;

        if record.status != AppointmentStatus::Unassigned || record.driver_id.is_some() {
            return Err(StoreError::AlreadyAssigned(appointment_id.to_string()));
        }
        record.status = AppointmentStatus::Assigned;
        record.driver_id = Some(driver_id.to_string());
        Ok(())
    }

    fn accepted_assignments(&self) -> Result<Vec<(String, Appointment)>, StoreError> {
        let records = self
            .records
            .lock()
            .expect("appointment store lock poisoned");
        let mut accepted: Vec<(String, Appointment)> = records
            .values()
            .filter(|r| r.status == AppointmentStatus::Assigned)
            .filter_map(|r| {
                r.driver_id
                    .as_ref()
                    .map(|d| (d.clone(), r.appointment.clone()))
            })
            .collect();
        // Stable output regardless of map iteration order
        accepted.sort_by(|a, b| (&a.0, &a.1.id).cmp(&(&b.0, &b.1.id)));
        Ok(accepted)
    }
}

/// In-memory unavailability store.
#[derive(Debug, Default)]
pub struct InMemoryUnavailabilityStore {
    blocks: Mutex<HashMap<String, Vec<UnavailabilityBlock>>>,
}

impl InMemoryUnavailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnavailabilityStore for InMemoryUnavailabilityStore {
    fn blocks_for(&self, driver_id: &str) -> Result<Vec<UnavailabilityBlock>, StoreError> {
        Ok(self
            .blocks
            .lock()
            .expect("unavailability store lock poisoned")
            .get(driver_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert(
        &self,
        block: UnavailabilityBlock,
        ignore_overlap: bool,
    ) -> Result<(), InsertBlockError> {
        // One lock spans check and insert, so the check never runs against a
        // stale read.
        let mut blocks = self
            .blocks
            .lock()
            .expect("unavailability store lock poisoned");
        let existing = blocks.entry(block.driver_id.clone()).or_default();

        if !ignore_overlap {
            let conflicts = overlap::find_overlaps(&block, existing);
            if !conflicts.is_empty() {
                return Err(InsertBlockError::Overlap(conflicts));
            }
        }
        // Edits replace the previous version of the same block
        existing.retain(|b| b.id != block.id);
        existing.push(block);
        Ok(())
    }
}
