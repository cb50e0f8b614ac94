//! Solution decoding and re-validation.

use tracing::{debug, warn};

use super::report::{PreferenceHistogram, ReportTotals, ScheduleReport, WorkerSummary};
use crate::error::SolverError;
use crate::milp::{AssignmentModel, ConstraintFamily, RawSolution, SolveOptions};
use crate::models::{Schedule, ShiftProblem, ShiftRoster};

/// Turns an engine's raw variable values into a [`ScheduleReport`].
///
/// Every invariant the model enforces is re-checked on the decoded
/// assignment. A violation means the engine or the model is broken, so it
/// is reported as a [`SolverError`] rather than passed on.
pub struct ResultInterpreter<'a> {
    problem: &'a ShiftProblem,
    model: &'a AssignmentModel,
    tolerance: f64,
}

impl<'a> ResultInterpreter<'a> {
    /// Creates an interpreter for a model built from `problem`.
    pub fn new(problem: &'a ShiftProblem, model: &'a AssignmentModel) -> Self {
        Self {
            problem,
            model,
            tolerance: SolveOptions::default().integrality_tolerance,
        }
    }

    /// Sets the integrality tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Decodes, re-validates and summarizes a solution.
    pub fn interpret(&self, solution: &RawSolution) -> Result<ScheduleReport, SolverError> {
        let assigned = self.decode(solution)?;
        self.verify(&assigned, &solution.values)?;

        let problem = self.problem;
        let mut schedule = Schedule::new();
        for (si, shift) in problem.shifts.iter().enumerate() {
            let mut roster = ShiftRoster::new(shift.id.clone());
            roster.worker_ids = problem
                .workers
                .iter()
                .enumerate()
                .filter(|(wi, _)| assigned[*wi][si])
                .map(|(_, w)| w.id.clone())
                .collect();
            schedule.add_roster(roster);
        }

        let mut histogram = PreferenceHistogram::new();
        let mut workers = Vec::with_capacity(problem.workers.len());
        for (wi, worker) in problem.workers.iter().enumerate() {
            let mut hours = 0u64;
            let mut score_sum = 0u64;
            let mut shift_count = 0usize;
            for (si, shift) in problem.shifts.iter().enumerate() {
                if assigned[wi][si] {
                    let score = worker.score(&shift.id);
                    histogram.record(score);
                    hours += u64::from(shift.length_hours);
                    score_sum += u64::from(score);
                    shift_count += 1;
                }
            }
            let average_preference_score = if shift_count == 0 {
                0.0
            } else {
                score_sum as f64 / shift_count as f64
            };
            workers.push(WorkerSummary {
                worker_id: worker.id.clone(),
                required_hours: worker.required_hours,
                assigned_hours: hours,
                shift_count,
                average_preference_score,
            });
        }

        let total_preference_score = histogram.weighted_sum();
        if (solution.objective_value - total_preference_score as f64).abs() > 1e-6 {
            warn!(
                engine = solution.objective_value,
                recomputed = total_preference_score,
                "engine objective differs from recomputed preference total"
            );
        }

        let mean_preference_score = if workers.is_empty() {
            0.0
        } else {
            workers
                .iter()
                .map(|w| w.average_preference_score)
                .sum::<f64>()
                / workers.len() as f64
        };
        let totals = ReportTotals {
            demanded_hours: problem.demanded_hours(),
            offered_hours: problem.offered_hours(),
            assigned_hours: workers.iter().map(|w| w.assigned_hours).sum(),
            total_preference_score,
            mean_preference_score,
            fully_booked_workers: workers.iter().filter(|w| w.is_fully_booked()).count(),
        };

        debug!(
            assignments = schedule.assignment_count(),
            total_preference_score, "interpreted solution"
        );

        Ok(ScheduleReport {
            schedule,
            histogram,
            workers,
            totals,
        })
    }

    /// Rounds every assignment variable to a boolean, rejecting fractional values.
    fn decode(&self, solution: &RawSolution) -> Result<Vec<Vec<bool>>, SolverError> {
        let model = self.model;
        // One x per (worker, shift) plus one h per worker.
        let expected = self.problem.workers.len() * (self.problem.shifts.len() + 1);
        let actual = solution.values.len();
        if actual != expected
            || model.variable_count() != expected
            || model.worker_count() != self.problem.workers.len()
            || model.shift_count() != self.problem.shifts.len()
        {
            return Err(SolverError::IncompleteSolution { expected, actual });
        }

        (0..model.worker_count())
            .map(|wi| {
                (0..model.shift_count())
                    .map(|si| {
                        let var = model.assign_var(wi, si);
                        let value = solution.values[var.0];
                        let rounded = value.round();
                        if (value - rounded).abs() > self.tolerance
                            || !(rounded == 0.0 || rounded == 1.0)
                        {
                            return Err(SolverError::NonIntegral {
                                variable: model.variable(var).name.clone(),
                                value,
                            });
                        }
                        Ok(rounded == 1.0)
                    })
                    .collect::<Result<Vec<bool>, SolverError>>()
            })
            .collect()
    }

    /// Re-checks the invariants of every family present in the model.
    fn verify(&self, assigned: &[Vec<bool>], values: &[f64]) -> Result<(), SolverError> {
        let problem = self.problem;
        let families = self.model.families();
        let violation = |family, detail: String| SolverError::InvalidSolution { family, detail };

        if families.contains(&ConstraintFamily::Headcount) {
            for (si, shift) in problem.shifts.iter().enumerate() {
                let staffed = assigned.iter().filter(|row| row[si]).count();
                if staffed != shift.required_workers as usize {
                    return Err(violation(
                        ConstraintFamily::Headcount,
                        format!(
                            "shift '{}' has {} worker(s), needs {}",
                            shift.id, staffed, shift.required_workers
                        ),
                    ));
                }
            }
        }

        for (wi, worker) in problem.workers.iter().enumerate() {
            let hours_value = values[self.model.hours_var(wi).0];
            let hours: u64 = problem
                .shifts
                .iter()
                .enumerate()
                .filter(|(si, _)| assigned[wi][*si])
                .map(|(_, s)| u64::from(s.length_hours))
                .sum();

            if families.contains(&ConstraintFamily::HoursBound) {
                if (hours_value - hours as f64).abs() > 1e-6 {
                    return Err(violation(
                        ConstraintFamily::HoursBound,
                        format!(
                            "worker '{}' hours variable is {} but assigned shifts total {}",
                            worker.id, hours_value, hours
                        ),
                    ));
                }
                if hours as f64 > worker.required_hours + 1e-6 {
                    return Err(violation(
                        ConstraintFamily::HoursBound,
                        format!(
                            "worker '{}' assigned {} hour(s), budget is {}",
                            worker.id, hours, worker.required_hours
                        ),
                    ));
                }
            }

            if families.contains(&ConstraintFamily::Disqualification) {
                if let Some(shift) = problem
                    .shifts
                    .iter()
                    .enumerate()
                    .find(|(si, s)| assigned[wi][*si] && !worker.accepts(&s.id))
                    .map(|(_, s)| s)
                {
                    return Err(violation(
                        ConstraintFamily::Disqualification,
                        format!(
                            "worker '{}' placed on '{}' despite a major conflict",
                            worker.id, shift.id
                        ),
                    ));
                }
            }
        }

        if families.contains(&ConstraintFamily::OverlapExclusivity) {
            let shift_index = problem.shift_index();
            for group in problem.overlap_groups.iter().filter(|g| g.is_effective()) {
                for (wi, worker) in problem.workers.iter().enumerate() {
                    let held = group
                        .shift_ids
                        .iter()
                        .filter_map(|id| shift_index.get(id.as_str()))
                        .filter(|&&si| assigned[wi][si])
                        .count();
                    if held > 1 {
                        return Err(violation(
                            ConstraintFamily::OverlapExclusivity,
                            format!(
                                "worker '{}' holds {} overlapping shifts of {:?}",
                                worker.id, held, group.shift_ids
                            ),
                        ));
                    }
                }
            }
        }

        if families.contains(&ConstraintFamily::ConflictExclusivity) {
            let worker_index = problem.worker_index();
            for pair in &problem.conflict_pairs {
                let (Some(&a), Some(&b)) = (
                    worker_index.get(pair.first.as_str()),
                    worker_index.get(pair.second.as_str()),
                ) else {
                    continue;
                };
                if let Some(shift) = problem
                    .shifts
                    .iter()
                    .enumerate()
                    .find(|(si, _)| assigned[a][*si] && assigned[b][*si])
                    .map(|(_, s)| s)
                {
                    return Err(violation(
                        ConstraintFamily::ConflictExclusivity,
                        format!(
                            "'{}' and '{}' share shift '{}'",
                            pair.first, pair.second, shift.id
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}
