//! Preference-driven shift assignment.
//!
//! Turns a staffing problem (shifts with headcounts and lengths, workers with
//! hour budgets and per-shift preferences, overlapping shifts, incompatible
//! worker pairs) into a binary integer program, solves it, and interprets the
//! solution as a validated schedule with fairness metrics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Shift`, `Worker`, `Preference`,
//!   `OverlapGroup`, `ConflictPair`, `ShiftProblem`, `Schedule`
//! - **`validation`**: Input integrity checks (duplicate names, unknown
//!   references, missing preferences, negative values)
//! - **`loader`**: CSV survey tables and JSON documents to `ShiftProblem`
//! - **`milp`**: Model builder, engine seam, `microlp` engine, infeasibility
//!   diagnosis
//! - **`interpret`**: Solution decoding, re-validation, metrics
//! - **`scheduler`**: End-to-end pipeline
//! - **`render`**, **`config`**, **`logging`**, **`error`**: Ambient concerns
//!
//! # Example
//!
//! ```
//! use u_shift::models::{Preference, Shift, ShiftProblem, Worker};
//! use u_shift::ShiftScheduler;
//!
//! let problem = ShiftProblem::new(
//!     vec![Shift::new("Morning", 4, 1)],
//!     vec![
//!         Worker::new("Ada", 4.0).with_preference("Morning", Preference::Dislike),
//!         Worker::new("Bo", 4.0).with_preference("Morning", Preference::Prefer),
//!     ],
//! );
//! let report = ShiftScheduler::default().run(&problem).unwrap();
//! assert_eq!(report.schedule.workers_on("Morning"), ["Bo"]);
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Wolsey (1998), "Integer Programming"

pub mod config;
pub mod error;
pub mod interpret;
pub mod loader;
pub mod logging;
pub mod milp;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod validation;

pub use error::{ErrorKind, ShiftError, SolverError};
pub use scheduler::ShiftScheduler;
