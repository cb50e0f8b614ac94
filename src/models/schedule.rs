//! Schedule (solution) model.
//!
//! A schedule lists, for every shift in catalog order, the workers placed
//! on it in roster order.

use serde::{Deserialize, Serialize};

/// A complete shift → workers assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// One entry per shift, in catalog order.
    pub shifts: Vec<ShiftRoster>,
}

/// Workers placed on one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRoster {
    /// Shift name.
    pub shift_id: String,
    /// Assigned workers, in roster order.
    pub worker_ids: Vec<String>,
}

impl ShiftRoster {
    /// Creates an empty roster for a shift.
    pub fn new(shift_id: impl Into<String>) -> Self {
        Self {
            shift_id: shift_id.into(),
            worker_ids: Vec::new(),
        }
    }

    /// Number of workers on the shift.
    #[inline]
    pub fn headcount(&self) -> usize {
        self.worker_ids.len()
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shift roster.
    pub fn add_roster(&mut self, roster: ShiftRoster) {
        self.shifts.push(roster);
    }

    /// Roster for a given shift.
    pub fn roster(&self, shift_id: &str) -> Option<&ShiftRoster> {
        self.shifts.iter().find(|r| r.shift_id == shift_id)
    }

    /// Workers on a shift (empty if the shift is unknown).
    pub fn workers_on(&self, shift_id: &str) -> &[String] {
        self.roster(shift_id)
            .map(|r| r.worker_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Shifts held by a worker, in catalog order.
    pub fn shifts_for(&self, worker_id: &str) -> Vec<&str> {
        self.shifts
            .iter()
            .filter(|r| r.worker_ids.iter().any(|w| w == worker_id))
            .map(|r| r.shift_id.as_str())
            .collect()
    }

    /// Whether the worker holds the shift.
    pub fn is_assigned(&self, worker_id: &str, shift_id: &str) -> bool {
        self.workers_on(shift_id).iter().any(|w| w == worker_id)
    }

    /// All (worker, shift) pairs in the schedule.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.shifts.iter().flat_map(|r| {
            r.worker_ids
                .iter()
                .map(move |w| (w.as_str(), r.shift_id.as_str()))
        })
    }

    /// Total number of (worker, shift) assignments.
    pub fn assignment_count(&self) -> usize {
        self.shifts.iter().map(ShiftRoster::headcount).sum()
    }
}
