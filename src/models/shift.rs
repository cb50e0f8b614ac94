//! Shift model.
//!
//! A shift is a named, fixed-length work window that recurs every planning
//! period and needs a fixed number of distinct workers.

use serde::{Deserialize, Serialize};

/// A shift to be staffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift name.
    pub id: String,
    /// Length of the shift in whole hours (must be positive).
    pub length_hours: u32,
    /// Number of distinct workers the shift needs.
    pub required_workers: u32,
}

impl Shift {
    /// Creates a shift with the given name, length and headcount.
    pub fn new(id: impl Into<String>, length_hours: u32, required_workers: u32) -> Self {
        Self {
            id: id.into(),
            length_hours,
            required_workers,
        }
    }

    /// Sets the headcount.
    pub fn with_required_workers(mut self, required_workers: u32) -> Self {
        self.required_workers = required_workers;
        self
    }

    /// Sets the shift length.
    pub fn with_length(mut self, length_hours: u32) -> Self {
        self.length_hours = length_hours;
        self
    }

    /// Labor hours this shift consumes when fully staffed.
    #[inline]
    pub fn demanded_hours(&self) -> u64 {
        u64::from(self.length_hours) * u64::from(self.required_workers)
    }
}
