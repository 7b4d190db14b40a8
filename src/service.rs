//! Dispatch service: operation-level orchestration over the stores.
//!
//! Each operation rebuilds its inputs from storage at call time. Matching
//! results are a snapshot for display; acceptance always re-evaluates
//! server-side for the acting driver, so a stale or tampered client ranking
//! cannot smuggle an ineligible driver past the gate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gate::{AcceptError, AcceptanceGate, GateDecision};
use crate::matching::{self, MatchingContext, RankedMatches, ScoreWeights, ScoredDriver};
use crate::models::{Appointment, ClientAccommodationProfile, DriverProfile, UnavailabilityBlock};
use crate::store::{AppointmentStore, InsertBlockError, StoreError, UnavailabilityStore};
use crate::validation::{self, ValidationError};

/// Driver and client lookup contract.
///
/// Kept separate from the appointment store so the matching engine can sit
/// in front of an existing user directory.
pub trait DriverDirectory: Send + Sync {
    /// The full active driver pool.
    fn drivers(&self) -> Result<Vec<DriverProfile>, StoreError>;

    /// A single driver's profile, if registered.
    fn driver(&self, driver_id: &str) -> Result<Option<DriverProfile>, StoreError>;

    /// The accommodation profile of the client booked on an appointment.
    fn client_for(&self, appointment_id: &str)
        -> Result<ClientAccommodationProfile, StoreError>;
}

/// Operation-level failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Field-level input problems, all reported together.
    #[error("invalid input: {}", .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),
    /// The submitted block conflicts with existing ones; carries the
    /// conflicting blocks for display.
    #[error("block overlaps {} existing block(s)", .0.len())]
    UnavailabilityOverlap(Vec<UnavailabilityBlock>),
    /// Another driver accepted first.
    #[error("ride was already accepted by another driver")]
    AlreadyAssigned,
    /// Strict mode refused an acceptance carrying critical warnings.
    #[error("driver does not meet hard requirements: {}", .0.join("; "))]
    HardGateRefused(Vec<String>),
    /// Critical warnings must be acknowledged before accepting.
    #[error("critical warnings must be acknowledged before accepting")]
    AcknowledgementRequired,
    #[error("{0} not found")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// One matching run's result, ready for display.
#[derive(Debug, Clone)]
pub struct MatchingResponse {
    pub appointment: Appointment,
    pub client: ClientAccommodationProfile,
    pub matches: RankedMatches,
    /// The requesting driver's own entry, when they asked for it.
    pub requesting_driver: Option<ScoredDriver>,
}

/// What an accepted ride came with.
#[derive(Debug, Clone)]
pub struct AcceptReceipt {
    /// Standard warnings that were in effect at acceptance time.
    pub standard_warnings: Vec<String>,
    /// Critical warnings the driver acknowledged (empty on a clean accept).
    pub acknowledged_warnings: Vec<String>,
}

/// The dispatch engine's public surface.
pub struct DispatchService {
    appointments: Arc<dyn AppointmentStore>,
    unavailability: Arc<dyn UnavailabilityStore>,
    directory: Arc<dyn DriverDirectory>,
    weights: ScoreWeights,
    /// When set, acceptance with unacknowledgeable hard-requirement failures
    /// is refused outright instead of being unlockable by acknowledgement.
    strict_hard_gate: bool,
}

impl DispatchService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        unavailability: Arc<dyn UnavailabilityStore>,
        directory: Arc<dyn DriverDirectory>,
    ) -> Self {
        Self {
            appointments,
            unavailability,
            directory,
            weights: ScoreWeights::default(),
            strict_hard_gate: false,
        }
    }

    /// Overrides the scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Refuses acceptance outright when hard requirements fail.
    pub fn with_strict_hard_gate(mut self) -> Self {
        self.strict_hard_gate = true;
        self
    }

    /// Scores and ranks the whole driver pool for an appointment.
    pub fn matching_drivers(
        &self,
        appointment_id: &str,
        requesting_driver: Option<&str>,
    ) -> Result<MatchingResponse, DispatchError> {
        let appointment = self.fetch_appointment(appointment_id)?;
        let client = self.directory.client_for(appointment_id)?;
        let drivers = self.directory.drivers()?;
        let context = self.build_context(&drivers, &appointment)?;

        let matches =
            matching::score_pool(&drivers, &client, &appointment, &context, &self.weights);
        info!(
            appointment_id,
            pool = drivers.len(),
            perfect = matches.perfect_matches.len(),
            "matching run complete"
        );

        let requesting_driver =
            requesting_driver.and_then(|id| matches.find(id).cloned());
        Ok(MatchingResponse {
            appointment,
            client,
            matches,
            requesting_driver,
        })
    }

    /// A driver accepts a ride.
    ///
    /// Warnings are recomputed here from current storage state; `acknowledged`
    /// is the driver's explicit confirmation of critical warnings.
    pub fn accept(
        &self,
        appointment_id: &str,
        driver_id: &str,
        acknowledged: bool,
    ) -> Result<AcceptReceipt, DispatchError> {
        let appointment = self.fetch_appointment(appointment_id)?;
        let client = self.directory.client_for(appointment_id)?;
        let driver = self
            .directory
            .driver(driver_id)?
            .ok_or_else(|| DispatchError::NotFound(format!("driver '{driver_id}'")))?;
        let pool = self.directory.drivers()?;
        let context = self.build_context(&pool, &appointment)?;

        let mut gate = AcceptanceGate::new(appointment_id, driver_id);
        let decision =
            gate.load_warnings(&driver, &client, &appointment, &context, &self.weights);

        if self.strict_hard_gate && decision == GateDecision::BlockedByCritical {
            warn!(appointment_id, driver_id, "acceptance refused by hard gate");
            return Err(DispatchError::HardGateRefused(
                gate.critical_warnings().to_vec(),
            ));
        }

        match gate.accept(self.appointments.as_ref(), acknowledged) {
            Ok(()) => {
                info!(appointment_id, driver_id, "ride accepted");
                Ok(AcceptReceipt {
                    standard_warnings: gate.standard_warnings().to_vec(),
                    acknowledged_warnings: gate.critical_warnings().to_vec(),
                })
            }
            Err(AcceptError::AlreadyAssigned) => {
                warn!(appointment_id, driver_id, "lost the acceptance race");
                Err(DispatchError::AlreadyAssigned)
            }
            Err(AcceptError::AcknowledgementRequired) => {
                Err(DispatchError::AcknowledgementRequired)
            }
            Err(AcceptError::Store(err)) => Err(DispatchError::Storage(err)),
            // Unreachable on a fresh gate, but never swallowed
            Err(AcceptError::WarningsNotLoaded | AcceptError::AlreadyResolved) => Err(
                DispatchError::Storage(StoreError::Backend("gate state out of order".into())),
            ),
        }
    }

    /// Staff-side direct assignment.
    ///
    /// Skips the warning workflow but goes through the same conditional
    /// write, so it cannot steal a ride another driver just accepted.
    pub fn reassign(&self, appointment_id: &str, driver_id: &str) -> Result<(), DispatchError> {
        self.directory
            .driver(driver_id)?
            .ok_or_else(|| DispatchError::NotFound(format!("driver '{driver_id}'")))?;
        match self
            .appointments
            .assign_if_unassigned(appointment_id, driver_id)
        {
            Ok(()) => {
                info!(appointment_id, driver_id, "ride reassigned by staff");
                Ok(())
            }
            Err(StoreError::AlreadyAssigned(_)) => Err(DispatchError::AlreadyAssigned),
            Err(StoreError::NotFound(id)) => {
                Err(DispatchError::NotFound(format!("appointment '{id}'")))
            }
            Err(err) => Err(DispatchError::Storage(err)),
        }
    }

    /// Records a driver's unavailability block.
    ///
    /// `ignore_overlap` forces the save after conflicts were shown to the
    /// driver once.
    pub fn create_unavailability(
        &self,
        block: UnavailabilityBlock,
        ignore_overlap: bool,
    ) -> Result<(), DispatchError> {
        if let Err(errors) = validation::validate_block(&block) {
            return Err(DispatchError::Validation(errors));
        }

        match self.unavailability.insert(block, ignore_overlap) {
            Ok(()) => Ok(()),
            Err(InsertBlockError::Overlap(conflicts)) => {
                warn!(conflicts = conflicts.len(), "unavailability overlap detected");
                Err(DispatchError::UnavailabilityOverlap(conflicts))
            }
            Err(InsertBlockError::Store(err)) => Err(DispatchError::Storage(err)),
        }
    }

    fn fetch_appointment(&self, appointment_id: &str) -> Result<Appointment, DispatchError> {
        match self.appointments.get(appointment_id) {
            Ok(record) => Ok(record.appointment),
            Err(StoreError::NotFound(id)) => {
                Err(DispatchError::NotFound(format!("appointment '{id}'")))
            }
            Err(err) => Err(DispatchError::Storage(err)),
        }
    }

    /// Assembles the read-only matching context for one appointment.
    ///
    /// Weekly ride counts cover accepted rides in the same ISO week as the
    /// appointment; concurrent-ride flags come from window overlap against
    /// every accepted assignment.
    fn build_context(
        &self,
        drivers: &[DriverProfile],
        appointment: &Appointment,
    ) -> Result<MatchingContext, DispatchError> {
        use chrono::Datelike;

        let mut context = MatchingContext::for_pool(drivers.len());
        for driver in drivers {
            let blocks = self.unavailability.blocks_for(&driver.id)?;
            if !blocks.is_empty() {
                context = context.with_unavailability(driver.id.clone(), blocks);
            }
        }

        let week = appointment.date.iso_week();
        let window = appointment.ride_window();
        let mut weekly: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
        for (driver_id, accepted) in self.appointments.accepted_assignments()? {
            if accepted.id == appointment.id {
                continue;
            }
            let accepted_week = accepted.date.iso_week();
            if (accepted_week.year(), accepted_week.week()) == (week.year(), week.week()) {
                *weekly.entry(driver_id.clone()).or_default() += 1;
            }
            if accepted.ride_window().overlaps(&window) {
                context = context.with_concurrent_ride(driver_id.clone());
            }
        }
        for (driver_id, count) in weekly {
            context = context.with_weekly_rides(driver_id, count);
        }

        debug!(
            appointment_id = appointment.id,
            pool = drivers.len(),
            "matching context assembled"
        );
        Ok(context)
    }
}
