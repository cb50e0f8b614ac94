//! Problem bundle.
//!
//! [`ShiftProblem`] is the normalized input of one scheduling run: the shift
//! catalog, the worker roster, overlap groups and conflict pairs. It is
//! built once, read by the model builder and interpreter, and never mutated
//! by them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ConflictPair, OverlapGroup, Shift, Worker};

/// A complete shift-assignment problem instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftProblem {
    /// Shift catalog. Order is preserved in reports.
    pub shifts: Vec<Shift>,
    /// Worker roster. Order is preserved in reports.
    pub workers: Vec<Worker>,
    /// Groups of mutually exclusive (time-overlapping) shifts.
    #[serde(default)]
    pub overlap_groups: Vec<OverlapGroup>,
    /// Workers who must not share a shift.
    #[serde(default)]
    pub conflict_pairs: Vec<ConflictPair>,
}

impl ShiftProblem {
    /// Creates a problem from a catalog and roster.
    pub fn new(shifts: Vec<Shift>, workers: Vec<Worker>) -> Self {
        Self {
            shifts,
            workers,
            overlap_groups: Vec::new(),
            conflict_pairs: Vec::new(),
        }
    }

    /// Adds an overlap group.
    pub fn with_overlap_group(mut self, group: OverlapGroup) -> Self {
        self.overlap_groups.push(group);
        self
    }

    /// Adds a conflict pair.
    pub fn with_conflict_pair(mut self, pair: ConflictPair) -> Self {
        self.conflict_pairs.push(pair);
        self
    }

    /// Looks up a shift by name.
    pub fn shift(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Looks up a worker by name.
    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Shift name → catalog position.
    pub fn shift_index(&self) -> HashMap<&str, usize> {
        self.shifts
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect()
    }

    /// Worker name → roster position.
    pub fn worker_index(&self) -> HashMap<&str, usize> {
        self.workers
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.as_str(), i))
            .collect()
    }

    /// Total labor hours demanded by all shifts.
    pub fn demanded_hours(&self) -> u64 {
        self.shifts.iter().map(Shift::demanded_hours).sum()
    }

    /// Total labor hours offered by all workers.
    pub fn offered_hours(&self) -> f64 {
        self.workers.iter().map(|w| w.required_hours).sum()
    }
}
