//! Failure taxonomy.
//!
//! Every run either produces a full report or fails with exactly one of
//! three kinds:
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `DataValidation` | Inputs are malformed or inconsistent (before any model exists) |
//! | `InfeasibleModel` | The constraint system admits no assignment |
//! | `Solver` | The engine fails, times out, reports unbounded, or returns a solution that breaks the model |
//!
//! There is no partial or best-effort schedule.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::milp::ConstraintFamily;
use crate::validation::ValidationError;

/// Top-level error of a scheduling run.
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("data validation failed with {} issue(s): {}", .0.len(), join_messages(.0))]
    DataValidation(Vec<ValidationError>),

    #[error("model is infeasible; suspected constraint families: {}", join_families(.suspected))]
    InfeasibleModel { suspected: Vec<ConstraintFamily> },

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}

/// Failures attributed to the solving engine or to the model it solved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("no solution found within the time limit of {0:?}")]
    TimedOut(Duration),

    #[error("engine reported the model unbounded (modeling bug: all variables are bounded)")]
    Unbounded,

    #[error("engine '{engine}' failed: {reason}")]
    Engine { engine: String, reason: String },

    #[error("solution has {actual} value(s) for {expected} model variable(s)")]
    IncompleteSolution { expected: usize, actual: usize },

    #[error("variable '{variable}' took non-integral value {value}")]
    NonIntegral { variable: String, value: f64 },

    #[error("solution violates {family} constraints: {detail}")]
    InvalidSolution {
        family: ConstraintFamily,
        detail: String,
    },
}

/// Coarse failure classification surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DataValidation,
    InfeasibleModel,
    Solver,
}

impl ShiftError {
    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShiftError::DataValidation(_) => ErrorKind::DataValidation,
            ShiftError::InfeasibleModel { .. } => ErrorKind::InfeasibleModel,
            ShiftError::Solver(_) => ErrorKind::Solver,
        }
    }

    /// Constraint families implicated, where known.
    pub fn suspected_families(&self) -> &[ConstraintFamily] {
        match self {
            ShiftError::InfeasibleModel { suspected } => suspected,
            _ => &[],
        }
    }
}

impl From<Vec<ValidationError>> for ShiftError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ShiftError::DataValidation(errors)
    }
}

pub(crate) fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_families(families: &[ConstraintFamily]) -> String {
    if families.is_empty() {
        return "none identified".to_string();
    }
    families
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_kinds() {
        let v = ShiftError::from(vec![ValidationError::new(
            ValidationErrorKind::DuplicateId,
            "Duplicate shift name: A",
        )]);
        assert_eq!(v.kind(), ErrorKind::DataValidation);
        assert!(v.to_string().contains("Duplicate shift name: A"));

        let i = ShiftError::InfeasibleModel {
            suspected: vec![ConstraintFamily::Headcount, ConstraintFamily::Disqualification],
        };
        assert_eq!(i.kind(), ErrorKind::InfeasibleModel);
        assert_eq!(i.suspected_families().len(), 2);
        assert!(i.to_string().contains("headcount"));

        let s = ShiftError::from(SolverError::TimedOut(Duration::from_secs(3)));
        assert_eq!(s.kind(), ErrorKind::Solver);
        assert!(s.suspected_families().is_empty());
    }

    #[test]
    fn test_empty_suspects_message() {
        let i = ShiftError::InfeasibleModel { suspected: vec![] };
        assert!(i.to_string().contains("none identified"));
    }
}
