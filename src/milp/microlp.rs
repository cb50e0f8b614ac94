//! Pure-Rust engine backed by `good_lp` with the `microlp` solver.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable as LpVariable,
};
use tracing::{debug, warn};

use super::engine::{EngineFailure, RawSolution, SolveOptions, SolveOutcome, SolvingEngine};
use super::model::{AssignmentModel, Comparison, VarDomain};

/// Branch-and-bound MILP engine (`microlp`), no native dependencies.
///
/// `microlp` has no built-in time limit; when one is requested the solve
/// runs on a dedicated thread and the caller stops waiting once the limit
/// elapses. The abandoned thread finishes in the background and its result
/// is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpEngine;

impl MicroLpEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SolvingEngine for MicroLpEngine {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, model: &AssignmentModel, options: &SolveOptions) -> SolveOutcome {
        let started = Instant::now();
        let outcome = match options.time_limit {
            None => solve_blocking(model),
            Some(limit) => {
                let (tx, rx) = mpsc::channel();
                let owned = model.clone();
                let spawned = thread::Builder::new()
                    .name("u-shift-microlp".into())
                    .spawn(move || {
                        // The receiver may have given up already.
                        let _ = tx.send(solve_blocking(&owned));
                    });
                if let Err(e) = spawned {
                    return SolveOutcome::Error(EngineFailure::Failed(format!(
                        "cannot spawn solver thread: {e}"
                    )));
                }
                match rx.recv_timeout(limit) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(?limit, "microlp did not finish within the time limit");
                        SolveOutcome::Error(EngineFailure::TimedOut(limit))
                    }
                    Err(RecvTimeoutError::Disconnected) => SolveOutcome::Error(
                        EngineFailure::Failed("solver thread ended without a result".into()),
                    ),
                }
            }
        };
        debug!(elapsed = ?started.elapsed(), found = outcome.is_solution_found(), "microlp finished");
        outcome
    }
}

fn solve_blocking(model: &AssignmentModel) -> SolveOutcome {
    // Constant rows never reach the backend.
    for c in model.constraints().iter().filter(|c| c.terms.is_empty()) {
        if !c.is_satisfied(&[], 1e-9) {
            debug!(family = %c.family, rhs = c.rhs, "constant constraint cannot hold");
            return SolveOutcome::Infeasible;
        }
    }
    if model.variable_count() == 0 {
        return SolveOutcome::Optimal(RawSolution::from_values(model, Vec::new()));
    }

    let mut vars = ProblemVariables::new();
    let lp_vars: Vec<LpVariable> = model
        .variables()
        .iter()
        .map(|v| {
            let def = match v.domain {
                VarDomain::Binary => variable().binary(),
                VarDomain::Continuous { min, max } => variable().min(min).max(max),
            };
            vars.add(def.name(v.name.clone()))
        })
        .collect();

    let linear = |terms: &[(super::VarId, f64)]| {
        terms
            .iter()
            .fold(Expression::from(0.0), |acc, &(v, coeff)| acc + coeff * lp_vars[v.0])
    };

    let mut problem = vars.maximise(linear(model.objective())).using(microlp);
    for c in model.constraints().iter().filter(|c| !c.terms.is_empty()) {
        let lhs = linear(&c.terms);
        let rhs = Expression::from(c.rhs);
        let constraint = match c.comparison {
            Comparison::Eq => good_lp::constraint::eq(lhs, rhs),
            Comparison::Le => good_lp::constraint::leq(lhs, rhs),
        };
        problem.add_constraint(constraint);
    }

    match problem.solve() {
        Ok(solution) => {
            let values = lp_vars.iter().map(|v| solution.value(*v)).collect();
            SolveOutcome::Optimal(RawSolution::from_values(model, values))
        }
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
        Err(e) => SolveOutcome::Error(EngineFailure::Failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{ConstraintFamily, ShiftModelBuilder};
    use crate::models::{OverlapGroup, Preference, Shift, ShiftProblem, Worker};
    use std::time::Duration;

    fn two_shift_problem() -> ShiftProblem {
        let shifts = vec![Shift::new("Morning", 4, 1), Shift::new("Evening", 4, 1)];
        let workers = vec![
            Worker::new("Ada", 8.0)
                .with_preference("Morning", Preference::Prefer)
                .with_preference("Evening", Preference::Dislike),
            Worker::new("Bo", 8.0)
                .with_preference("Morning", Preference::Neutral)
                .with_preference("Evening", Preference::Prefer),
        ];
        ShiftProblem::new(shifts, workers)
            .with_overlap_group(OverlapGroup::new(["Morning", "Evening"]))
    }

    #[test]
    fn test_solve_optimal() {
        let problem = two_shift_problem();
        let model = ShiftModelBuilder::new(&problem).build().unwrap();

        match MicroLpEngine::new().solve(&model, &SolveOptions::default()) {
            SolveOutcome::Optimal(sol) => {
                assert_eq!(sol.values.len(), model.variable_count());
                // Ada → Morning (5), Bo → Evening (5)
                assert!((sol.objective_value - 10.0).abs() < 1e-6);
                assert!(sol.values[model.assign_var(0, 0).0] > 0.5);
                assert!(sol.values[model.assign_var(1, 1).0] > 0.5);
                assert!((sol.values[model.hours_var(0).0] - 4.0).abs() < 1e-6);
                for c in model.constraints() {
                    assert!(c.is_satisfied(&sol.values, 1e-6));
                }
            }
            other => panic!("expected optimal, got {other:?}"),
        }
    }

    #[test]
    fn test_solve_with_time_limit() {
        let problem = two_shift_problem();
        let model = ShiftModelBuilder::new(&problem).build().unwrap();
        let options = SolveOptions::default().with_time_limit(Duration::from_secs(30));

        assert!(MicroLpEngine::new().solve(&model, &options).is_solution_found());
    }

    #[test]
    fn test_expired_time_limit_reports_timeout() {
        let names: Vec<String> = (0..12).map(|i| format!("S{i}")).collect();
        let shifts = names.iter().map(|n| Shift::new(n.as_str(), 2, 3)).collect();
        let workers = (0..15)
            .map(|i| {
                let pref = if i % 2 == 0 { Preference::Prefer } else { Preference::Dislike };
                Worker::new(format!("W{i}"), 8.0).with_preference_for_all(names.iter().cloned(), pref)
            })
            .collect();
        let problem = ShiftProblem::new(shifts, workers)
            .with_overlap_group(OverlapGroup::new(["S0", "S1", "S2"]));
        let model = ShiftModelBuilder::new(&problem).build().unwrap();
        let options = SolveOptions::default().with_time_limit(Duration::from_nanos(1));

        assert_eq!(
            MicroLpEngine::new().solve(&model, &options),
            SolveOutcome::Error(EngineFailure::TimedOut(Duration::from_nanos(1)))
        );
    }

    #[test]
    fn test_solve_infeasible() {
        let mut problem = two_shift_problem();
        problem.shifts[0].required_workers = 3;
        let model = ShiftModelBuilder::new(&problem).build().unwrap();

        assert_eq!(
            MicroLpEngine::new().solve(&model, &SolveOptions::default()),
            SolveOutcome::Infeasible
        );
    }

    #[test]
    fn test_constant_row_infeasible() {
        // No workers at all but a shift needing one.
        let problem = ShiftProblem::new(vec![Shift::new("Solo", 4, 1)], vec![]);
        let model = ShiftModelBuilder::new(&problem).build().unwrap();
        assert_eq!(model.constraints_in(ConstraintFamily::Headcount).count(), 1);

        assert_eq!(
            MicroLpEngine::new().solve(&model, &SolveOptions::default()),
            SolveOutcome::Infeasible
        );
    }

    #[test]
    fn test_empty_model() {
        let problem = ShiftProblem::default();
        let model = ShiftModelBuilder::new(&problem).build().unwrap();
        assert!(MicroLpEngine::new()
            .solve(&model, &SolveOptions::default())
            .is_solution_found());
    }
}
