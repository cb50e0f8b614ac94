//! Input validation for shift-assignment problems.
//!
//! Checks the structural integrity of a [`ShiftProblem`] before any model is
//! built. Detects:
//! - Duplicate shift or worker names
//! - Non-positive shift lengths and negative or non-finite hour budgets
//! - Preferences that are missing for a shift or that name an unknown shift
//! - Overlap groups naming unknown shifts (or the same shift twice)
//! - Conflict pairs naming unknown workers (or the same worker twice)
//!
//! Every issue is collected; nothing is silently skipped.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::models::ShiftProblem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same name.
    DuplicateId,
    /// A reference to a shift that is not in the catalog.
    UnknownShiftReference,
    /// A reference to a worker that is not in the roster.
    UnknownWorkerReference,
    /// A negative hour budget, length or headcount.
    NegativeValue,
    /// A value that is zero where positive is required, non-finite, or unparsable.
    InvalidValue,
    /// A worker has no preference recorded for a shift.
    MissingPreference,
    /// A preference label outside the fixed scale.
    InvalidPreference,
    /// A conflict pair naming the same worker twice.
    SelfConflict,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a shift-assignment problem.
///
/// Checks:
/// 1. No duplicate shift names, every shift length positive
/// 2. No duplicate worker names, every hour budget finite and non-negative
/// 3. Every worker rates exactly the catalog's shifts
/// 4. Every overlap group names known, distinct shifts
/// 5. Every conflict pair names two distinct known workers
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(problem: &ShiftProblem) -> ValidationResult {
    let mut errors = Vec::new();

    let mut shift_ids = HashSet::new();
    for shift in &problem.shifts {
        if !shift_ids.insert(shift.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift name: {}", shift.id),
            ));
        }
        if shift.length_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Shift '{}' has zero length", shift.id),
            ));
        }
    }

    let mut worker_ids = HashSet::new();
    for worker in &problem.workers {
        if !worker_ids.insert(worker.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker name: {}", worker.id),
            ));
        }

        if !worker.required_hours.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!(
                    "Worker '{}' has non-finite required hours {}",
                    worker.id, worker.required_hours
                ),
            ));
        } else if worker.required_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!(
                    "Worker '{}' has negative required hours {}",
                    worker.id, worker.required_hours
                ),
            ));
        }

        for shift in &problem.shifts {
            if worker.preference(&shift.id).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingPreference,
                    format!(
                        "Worker '{}' has no preference for shift '{}'",
                        worker.id, shift.id
                    ),
                ));
            }
        }
        for rated in worker.preferences.keys() {
            if !shift_ids.contains(rated.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownShiftReference,
                    format!(
                        "Worker '{}' rates unknown shift '{}'",
                        worker.id, rated
                    ),
                ));
            }
        }
    }

    for (g, group) in problem.overlap_groups.iter().enumerate() {
        let mut seen = HashSet::new();
        for id in &group.shift_ids {
            if !shift_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownShiftReference,
                    format!("Overlap group {} references unknown shift '{}'", g + 1, id),
                ));
            }
            if !seen.insert(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Overlap group {} lists shift '{}' twice", g + 1, id),
                ));
            }
        }
    }

    for pair in &problem.conflict_pairs {
        for id in [&pair.first, &pair.second] {
            if !worker_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownWorkerReference,
                    format!(
                        "Conflict pair ({}, {}) references unknown worker '{}'",
                        pair.first, pair.second, id
                    ),
                ));
            }
        }
        if pair.first == pair.second {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfConflict,
                format!("Worker '{}' is declared in conflict with themself", pair.first),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
