//! Input validation for unavailability blocks.
//!
//! Structural shape (recurring vs date range) is enforced by the type
//! system; what remains are field-level checks that must reject input
//! before the overlap detector runs. All detected issues are reported
//! together. A zero-length time range is a validation error here, never an
//! overlap case downstream.

use crate::models::{BlockKind, UnavailabilityBlock};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable, field-level description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A non-all-day block is missing its start or end time.
    MissingTimeRange,
    /// Time range is empty or inverted (start >= end).
    EmptyTimeRange,
    /// Date range ends before it starts.
    InvertedDateRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an unavailability block before overlap checking.
///
/// Checks:
/// 1. Date ranges run forward (`start_date <= end_date`)
/// 2. Non-all-day blocks carry both times
/// 3. Time ranges are non-empty (`start_time < end_time`)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_block(block: &UnavailabilityBlock) -> ValidationResult {
    let mut errors = Vec::new();

    if let BlockKind::DateRange {
        start_date,
        end_date,
    } = block.kind
    {
        if end_date < start_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedDateRange,
                format!("End date {end_date} is before start date {start_date}"),
            ));
        }
    }

    if !block.is_all_day {
        match (block.start_time, block.end_time) {
            (Some(start), Some(end)) => {
                if start >= end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyTimeRange,
                        format!("Time range {start}..{end} is empty"),
                    ));
                }
            }
            _ => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingTimeRange,
                    "Start and end times are required unless the block is all-day",
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
