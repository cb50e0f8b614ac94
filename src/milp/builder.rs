//! Integer-programming formulation of shift assignment.
//!
//! Translates a [`ShiftProblem`] into an [`AssignmentModel`]:
//!
//! ```text
//! maximize   Σ_w Σ_s pref[w,s] · x[w,s]
//! subject to Σ_w x[w,s] = required_workers[s]              ∀ s   (headcount)
//!            h[w] = Σ_s length[s] · x[w,s]                  ∀ w   (hours bound)
//!            0 ≤ h[w] ≤ required_hours[w]                   ∀ w
//!            x[w,s] = 0                   ∀ (w,s) with pref = 0   (disqualification)
//!            Σ_{s∈g} x[w,s] ≤ 1                           ∀ w, g  (overlap exclusivity)
//!            x[a,s] + x[b,s] ≤ 1                     ∀ (a,b), s  (conflict exclusivity)
//!            x[w,s] ∈ {0,1}
//! ```

use std::collections::HashSet;

use tracing::debug;

use super::model::{AssignmentModel, Comparison, ConstraintFamily, LinearConstraint};
use crate::error::ShiftError;
use crate::models::ShiftProblem;
use crate::validation::validate_input;

/// Builds an [`AssignmentModel`] from a shift problem.
///
/// # Example
/// ```
/// use u_shift::milp::ShiftModelBuilder;
/// use u_shift::models::{Preference, Shift, ShiftProblem, Worker};
///
/// let problem = ShiftProblem::new(
///     vec![Shift::new("Morning", 4, 1)],
///     vec![Worker::new("Ada", 4.0).with_preference("Morning", Preference::Prefer)],
/// );
/// let model = ShiftModelBuilder::new(&problem).build().unwrap();
/// assert_eq!(model.variable_count(), 2);
/// ```
pub struct ShiftModelBuilder<'a> {
    problem: &'a ShiftProblem,
    relaxed: Vec<ConstraintFamily>,
}

impl<'a> ShiftModelBuilder<'a> {
    /// Creates a builder for the given problem.
    pub fn new(problem: &'a ShiftProblem) -> Self {
        Self {
            problem,
            relaxed: Vec::new(),
        }
    }

    /// Omits one constraint family from the built model.
    ///
    /// Only for deliberate what-if runs on over-constrained inputs; a model
    /// built this way does not enforce the corresponding invariant.
    pub fn without_family(mut self, family: ConstraintFamily) -> Self {
        if !self.relaxed.contains(&family) {
            self.relaxed.push(family);
        }
        self
    }

    /// Families this builder will omit.
    pub fn relaxed_families(&self) -> &[ConstraintFamily] {
        &self.relaxed
    }

    fn emits(&self, family: ConstraintFamily) -> bool {
        !self.relaxed.contains(&family)
    }

    /// Validates the problem, then builds the model.
    ///
    /// Creates:
    /// - One binary `x[w,s]` per (worker, shift)
    /// - One continuous `h[w]` per worker with domain `[0, required_hours]`
    /// - Objective: total preference score of all assignments
    /// - The five constraint families, each emitted once
    ///
    /// # Errors
    /// [`ShiftError::DataValidation`] if the problem fails [`validate_input`].
    /// No partial model is produced.
    pub fn build(&self) -> Result<AssignmentModel, ShiftError> {
        validate_input(self.problem)?;

        let problem = self.problem;
        let shifts = &problem.shifts;
        let workers = &problem.workers;

        let assignment_names = workers
            .iter()
            .map(|w| {
                shifts
                    .iter()
                    .map(|s| format!("{}_{}", w.id, s.id))
                    .collect()
            })
            .collect();
        let hours = workers
            .iter()
            .map(|w| (format!("{}_hours", w.id), w.required_hours))
            .collect();
        let mut model =
            AssignmentModel::new("shift_assignment", shifts.len(), assignment_names, hours);

        // Objective: maximize total preference score
        for (wi, worker) in workers.iter().enumerate() {
            for (si, shift) in shifts.iter().enumerate() {
                let score = worker.score(&shift.id);
                if score > 0 {
                    model.set_objective_term(model.assign_var(wi, si), f64::from(score));
                }
            }
        }

        if self.emits(ConstraintFamily::Headcount) {
            for (si, shift) in shifts.iter().enumerate() {
                let terms = (0..workers.len())
                    .map(|wi| (model.assign_var(wi, si), 1.0))
                    .collect();
                model.add_constraint(LinearConstraint {
                    family: ConstraintFamily::Headcount,
                    terms,
                    comparison: Comparison::Eq,
                    rhs: f64::from(shift.required_workers),
                });
            }
        }

        // h[w] - Σ length[s]·x[w,s] = 0; the upper bound lives in h's domain.
        if self.emits(ConstraintFamily::HoursBound) {
            for wi in 0..workers.len() {
                let mut terms = vec![(model.hours_var(wi), 1.0)];
                terms.extend(
                    shifts
                        .iter()
                        .enumerate()
                        .map(|(si, s)| (model.assign_var(wi, si), -f64::from(s.length_hours))),
                );
                model.add_constraint(LinearConstraint {
                    family: ConstraintFamily::HoursBound,
                    terms,
                    comparison: Comparison::Eq,
                    rhs: 0.0,
                });
            }
        }

        if self.emits(ConstraintFamily::Disqualification) {
            for (wi, worker) in workers.iter().enumerate() {
                for (si, shift) in shifts.iter().enumerate() {
                    if !worker.accepts(&shift.id) {
                        model.add_constraint(LinearConstraint {
                            family: ConstraintFamily::Disqualification,
                            terms: vec![(model.assign_var(wi, si), 1.0)],
                            comparison: Comparison::Eq,
                            rhs: 0.0,
                        });
                    }
                }
            }
        }

        if self.emits(ConstraintFamily::OverlapExclusivity) {
            let shift_index = problem.shift_index();
            for group in problem.overlap_groups.iter().filter(|g| g.is_effective()) {
                // Validation guarantees every name resolves and appears once.
                let members: Vec<usize> = group
                    .shift_ids
                    .iter()
                    .filter_map(|id| shift_index.get(id.as_str()).copied())
                    .collect();
                for wi in 0..workers.len() {
                    model.add_constraint(LinearConstraint {
                        family: ConstraintFamily::OverlapExclusivity,
                        terms: members
                            .iter()
                            .map(|&si| (model.assign_var(wi, si), 1.0))
                            .collect(),
                        comparison: Comparison::Le,
                        rhs: 1.0,
                    });
                }
            }
        }

        if self.emits(ConstraintFamily::ConflictExclusivity) {
            let worker_index = problem.worker_index();
            let mut seen = HashSet::new();
            for pair in &problem.conflict_pairs {
                if !seen.insert(pair.normalized()) {
                    continue;
                }
                let (Some(&a), Some(&b)) = (
                    worker_index.get(pair.first.as_str()),
                    worker_index.get(pair.second.as_str()),
                ) else {
                    continue;
                };
                for si in 0..shifts.len() {
                    model.add_constraint(LinearConstraint {
                        family: ConstraintFamily::ConflictExclusivity,
                        terms: vec![(model.assign_var(a, si), 1.0), (model.assign_var(b, si), 1.0)],
                        comparison: Comparison::Le,
                        rhs: 1.0,
                    });
                }
            }
        }

        debug!(
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            relaxed = ?self.relaxed,
            "built assignment model"
        );

        Ok(model)
    }
}
