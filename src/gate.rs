//! Ride acceptance gate.
//!
//! State machine guarding a driver's attempt to accept a ride:
//!
//! ```text
//! NotAttempted -> WarningsLoaded -> { BlockedByCritical
//!                                   | AllowedWithConfirmation
//!                                   | AllowedClean } -> Accepted | Cancelled
//! ```
//!
//! Loading warnings re-runs eligibility and scoring server-side for the
//! acting driver; a cached client-side ranking is never trusted. Critical
//! warnings block acceptance until explicitly acknowledged; standard
//! warnings are shown but do not block. The final transition delegates to
//! the store's conditional write, so at most one driver wins the ride.

use thiserror::Error;

use crate::matching::{self, MatchingContext, ScoreWeights};
use crate::models::{Appointment, ClientAccommodationProfile, DriverProfile};
use crate::store::{AppointmentStore, StoreError};

/// Classification of a loaded warning set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Critical warnings present; acceptance requires acknowledgement.
    BlockedByCritical,
    /// Only standard warnings; acceptance proceeds, warnings shown.
    AllowedWithConfirmation,
    /// No warnings at all.
    AllowedClean,
}

/// Gate lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// No evaluation has run yet.
    NotAttempted,
    /// Warnings evaluated and classified.
    WarningsLoaded(GateDecision),
    /// The conditional write succeeded; this driver has the ride.
    Accepted,
    /// The driver backed out.
    Cancelled,
}

/// Why an accept attempt was refused.
#[derive(Debug, Error)]
pub enum AcceptError {
    #[error("warnings have not been loaded for this attempt")]
    WarningsNotLoaded,
    #[error("critical warnings must be acknowledged before accepting")]
    AcknowledgementRequired,
    #[error("this ride was already accepted by another driver")]
    AlreadyAssigned,
    #[error("acceptance attempt is already resolved")]
    AlreadyResolved,
    #[error(transparent)]
    Store(StoreError),
}

/// One driver's acceptance attempt on one appointment.
#[derive(Debug)]
pub struct AcceptanceGate {
    appointment_id: String,
    driver_id: String,
    state: GateState,
    critical_warnings: Vec<String>,
    standard_warnings: Vec<String>,
}

impl AcceptanceGate {
    /// Starts an attempt in `NotAttempted`.
    pub fn new(appointment_id: impl Into<String>, driver_id: impl Into<String>) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            driver_id: driver_id.into(),
            state: GateState::NotAttempted,
            critical_warnings: Vec::new(),
            standard_warnings: Vec::new(),
        }
    }

    /// Evaluates eligibility and scoring for the acting driver, then
    /// classifies the result.
    pub fn load_warnings(
        &mut self,
        driver: &DriverProfile,
        client: &ClientAccommodationProfile,
        appointment: &Appointment,
        context: &MatchingContext,
        weights: &ScoreWeights,
    ) -> GateDecision {
        let eligibility = matching::eligibility::evaluate(driver, client, appointment);
        let breakdown = matching::scoring::score(driver, client, appointment, context, weights);

        self.critical_warnings = eligibility.critical_warnings;
        self.standard_warnings = matching::scoring::standard_warnings(
            driver,
            &breakdown,
            context.weekly_rides(&driver.id),
        );

        let decision = if !self.critical_warnings.is_empty() {
            GateDecision::BlockedByCritical
        } else if !self.standard_warnings.is_empty() {
            GateDecision::AllowedWithConfirmation
        } else {
            GateDecision::AllowedClean
        };
        self.state = GateState::WarningsLoaded(decision);
        decision
    }

    /// Attempts the atomic accept.
    ///
    /// `acknowledged` is the driver's explicit checkbox when the attempt is
    /// blocked by critical warnings; it is ignored otherwise.
    pub fn accept(
        &mut self,
        store: &dyn AppointmentStore,
        acknowledged: bool,
    ) -> Result<(), AcceptError> {
        let decision = match &self.state {
            GateState::NotAttempted => return Err(AcceptError::WarningsNotLoaded),
            GateState::Accepted | GateState::Cancelled => {
                return Err(AcceptError::AlreadyResolved)
            }
            GateState::WarningsLoaded(decision) => *decision,
        };

        if decision == GateDecision::BlockedByCritical && !acknowledged {
            return Err(AcceptError::AcknowledgementRequired);
        }

        match store.assign_if_unassigned(&self.appointment_id, &self.driver_id) {
            Ok(()) => {
                self.state = GateState::Accepted;
                Ok(())
            }
            Err(StoreError::AlreadyAssigned(_)) => Err(AcceptError::AlreadyAssigned),
            Err(other) => Err(AcceptError::Store(other)),
        }
    }

    /// Abandons the attempt.
    pub fn cancel(&mut self) {
        if self.state != GateState::Accepted {
            self.state = GateState::Cancelled;
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Critical warnings from the last load.
    pub fn critical_warnings(&self) -> &[String] {
        &self.critical_warnings
    }

    /// Standard warnings from the last load.
    pub fn standard_warnings(&self) -> &[String] {
        &self.standard_warnings
    }
}
