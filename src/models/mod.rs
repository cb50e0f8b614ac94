//! Shift-assignment domain models.
//!
//! Provides the data types for one scheduling run: the inputs (shifts,
//! workers with preferences, overlap groups, conflict pairs) and the
//! solved [`Schedule`].
//!
//! # Domain Mappings
//!
//! | u-shift | Campus desk | Clinic | Warehouse |
//! |---------|-------------|--------|-----------|
//! | Shift | Desk slot | Clinic session | Picking wave |
//! | Worker | Student staffer | Nurse | Picker |
//! | OverlapGroup | Same hour, two desks | Parallel sessions | Concurrent waves |
//! | ConflictPair | Roommates | Supervisor/trainee | Carpool partners |

mod constraint;
mod preference;
mod problem;
mod schedule;
mod shift;
mod worker;

pub use constraint::{ConflictPair, OverlapGroup};
pub use preference::{Preference, UnknownPreference, MAX_SCORE};
pub use problem::ShiftProblem;
pub use schedule::{Schedule, ShiftRoster};
pub use shift::Shift;
pub use worker::Worker;
