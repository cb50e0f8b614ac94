//! Integer-programming formulation and solving.
//!
//! Bridges shift-assignment domain models to a mixed-integer engine.
//! [`ShiftModelBuilder`] turns a [`ShiftProblem`](crate::models::ShiftProblem)
//! into a solver-agnostic [`AssignmentModel`]; any [`SolvingEngine`] solves
//! it. [`MicroLpEngine`] is the bundled pure-Rust engine.
//!
//! # Reference
//! - Wolsey (2020), "Integer Programming", Ch. 1 (assignment formulations)
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"

mod builder;
mod diagnose;
mod engine;
mod microlp;
mod model;

pub use builder::ShiftModelBuilder;
pub use diagnose::diagnose_infeasibility;
pub use engine::{EngineFailure, RawSolution, SolveOptions, SolveOutcome, SolvingEngine};
pub use microlp::MicroLpEngine;
pub use model::{
    AssignmentModel, Comparison, ConstraintFamily, LinearConstraint, VarDomain, VarId, Variable,
};
