//! Solver-agnostic integer program.
//!
//! [`AssignmentModel`] is a plain data description of the shift-assignment
//! program: variables with domains, a linear objective to maximize, and
//! linear constraints tagged with the [`ConstraintFamily`] they belong to.
//! Any [`SolvingEngine`](super::SolvingEngine) can consume it.
//!
//! # Variable layout
//!
//! With `W` workers and `S` shifts:
//! - `x[w, s]` (binary) is variable `w * S + s`
//! - `h[w]` (continuous, `[0, required_hours[w]]`) is variable `W * S + w`

use serde::Serialize;
use std::fmt;

/// Index of a variable in an [`AssignmentModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(pub usize);

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VarDomain {
    /// 0 or 1.
    Binary,
    /// Any real in `[min, max]`.
    Continuous { min: f64, max: f64 },
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub domain: VarDomain,
}

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
}

/// Constraint families of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConstraintFamily {
    /// Every shift gets exactly its required headcount.
    Headcount,
    /// Hours variable equals assigned length and stays within the budget.
    HoursBound,
    /// No assignment on a Major Conflict.
    Disqualification,
    /// At most one shift per overlap group per worker.
    OverlapExclusivity,
    /// Conflicting workers never share a shift.
    ConflictExclusivity,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 5] = [
        ConstraintFamily::Headcount,
        ConstraintFamily::HoursBound,
        ConstraintFamily::Disqualification,
        ConstraintFamily::OverlapExclusivity,
        ConstraintFamily::ConflictExclusivity,
    ];
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintFamily::Headcount => "headcount",
            ConstraintFamily::HoursBound => "hours bound",
            ConstraintFamily::Disqualification => "disqualification",
            ConstraintFamily::OverlapExclusivity => "overlap exclusivity",
            ConstraintFamily::ConflictExclusivity => "conflict exclusivity",
        })
    }
}

/// `Σ coeff · var  (== | <=)  rhs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub terms: Vec<(VarId, f64)>,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side evaluated at the given variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether the values satisfy the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.comparison {
            Comparison::Eq => (lhs - self.rhs).abs() <= tolerance,
            Comparison::Le => lhs <= self.rhs + tolerance,
        }
    }
}

/// The shift-assignment integer program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentModel {
    pub name: String,
    worker_count: usize,
    shift_count: usize,
    variables: Vec<Variable>,
    objective: Vec<(VarId, f64)>,
    constraints: Vec<LinearConstraint>,
}

impl AssignmentModel {
    /// Creates a model with the assignment and hours variables already laid out.
    ///
    /// `assignment_names[w][s]` names `x[w, s]` and every row holds
    /// `shift_count` names; `hours` holds `(name, max)` per worker. The shift
    /// count is explicit so a roster without workers keeps its catalog size.
    pub(crate) fn new(
        name: impl Into<String>,
        shift_count: usize,
        assignment_names: Vec<Vec<String>>,
        hours: Vec<(String, f64)>,
    ) -> Self {
        let worker_count = assignment_names.len();
        debug_assert!(assignment_names.iter().all(|row| row.len() == shift_count));
        debug_assert_eq!(hours.len(), worker_count);

        let mut variables = Vec::with_capacity(worker_count * shift_count + hours.len());
        for row in assignment_names {
            variables.extend(row.into_iter().map(|name| Variable {
                name,
                domain: VarDomain::Binary,
            }));
        }
        variables.extend(hours.into_iter().map(|(name, max)| Variable {
            name,
            domain: VarDomain::Continuous { min: 0.0, max },
        }));

        Self {
            name: name.into(),
            worker_count,
            shift_count,
            variables,
            objective: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Variable `x[w, s]`.
    #[inline]
    pub fn assign_var(&self, worker: usize, shift: usize) -> VarId {
        debug_assert!(worker < self.worker_count && shift < self.shift_count);
        VarId(worker * self.shift_count + shift)
    }

    /// Variable `h[w]`.
    #[inline]
    pub fn hours_var(&self, worker: usize) -> VarId {
        debug_assert!(worker < self.worker_count);
        VarId(self.worker_count * self.shift_count + worker)
    }

    pub(crate) fn set_objective_term(&mut self, var: VarId, coeff: f64) {
        self.objective.push((var, coeff));
    }

    pub(crate) fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn shift_count(&self) -> usize {
        self.shift_count
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Objective terms (maximized).
    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    /// Objective evaluated at the given variable values.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints belonging to one family.
    pub fn constraints_in(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    /// Families that have at least one constraint in this model.
    pub fn families(&self) -> Vec<ConstraintFamily> {
        ConstraintFamily::ALL
            .into_iter()
            .filter(|f| self.constraints_in(*f).next().is_some())
            .collect()
    }
}
