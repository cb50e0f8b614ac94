//! Result interpretation and schedule metrics.
//!
//! Turns a solved [`AssignmentModel`](crate::milp::AssignmentModel) back into
//! domain terms and computes preference and hours statistics.
//!
//! # Report
//!
//! [`ScheduleReport`] carries the [`Schedule`](crate::models::Schedule), a
//! six-bucket [`PreferenceHistogram`], one [`WorkerSummary`] per worker and
//! run-wide [`ReportTotals`]. Ordering follows the input (catalog order for
//! shifts, roster order for workers), so reports are reproducible.

mod interpreter;
mod report;

pub use interpreter::ResultInterpreter;
pub use report::{PreferenceHistogram, ReportTotals, ScheduleReport, WorkerSummary};
