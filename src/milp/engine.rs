//! Solving-engine seam.
//!
//! The builder and interpreter never talk to a concrete solver. An engine
//! receives an [`AssignmentModel`] and answers with a [`SolveOutcome`];
//! only [`SolveOutcome::Optimal`] leads to a schedule.

use std::time::Duration;

use super::model::AssignmentModel;

/// Options passed through to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Wall-clock budget for one solve. `None` waits indefinitely.
    ///
    /// The caller stops waiting once the budget elapses; engines without
    /// native cancellation (such as [`MicroLpEngine`](super::MicroLpEngine))
    /// abandon the running solve rather than cancel it, so its thread keeps
    /// working in the background until it finishes on its own.
    pub time_limit: Option<Duration>,
    /// Maximum distance of a binary value from 0 or 1 before it is rejected.
    pub integrality_tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: None,
            integrality_tolerance: 1e-6,
        }
    }
}

impl SolveOptions {
    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the integrality tolerance.
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }
}

/// Raw variable values of an optimal solution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    /// One value per model variable, indexed by [`VarId`](super::VarId).
    pub values: Vec<f64>,
    /// Objective value reported by the engine.
    pub objective_value: f64,
}

impl RawSolution {
    /// Wraps values and computes the objective from the model.
    pub fn from_values(model: &AssignmentModel, values: Vec<f64>) -> Self {
        let objective_value = model.objective_value(&values);
        Self {
            values,
            objective_value,
        }
    }
}

/// Why an engine produced no answer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineFailure {
    /// The time limit elapsed before a solution was proven optimal.
    TimedOut(Duration),
    /// Any other engine failure.
    Failed(String),
}

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Proven optimal; every variable has a value.
    Optimal(RawSolution),
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// The engine failed.
    Error(EngineFailure),
}

impl SolveOutcome {
    /// Whether a solution is available.
    pub fn is_solution_found(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }
}

/// A mixed-integer engine able to solve an [`AssignmentModel`].
pub trait SolvingEngine {
    /// Engine name, for logs and error messages.
    fn name(&self) -> &str;

    /// Solves the model to optimality.
    ///
    /// Must return [`SolveOutcome::Optimal`] only with a complete value
    /// vector, and must honor `options.time_limit` by returning
    /// [`EngineFailure::TimedOut`] rather than an unproven incumbent.
    fn solve(&self, model: &AssignmentModel, options: &SolveOptions) -> SolveOutcome;
}

impl<E: SolvingEngine + ?Sized> SolvingEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &AssignmentModel, options: &SolveOptions) -> SolveOutcome {
        (**self).solve(model, options)
    }
}
