//! Side constraints between shifts and between workers.
//!
//! - [`OverlapGroup`]: shifts occupying the same wall-clock window. One
//!   worker may hold at most one shift of the group.
//! - [`ConflictPair`]: two workers who must never share a shift.

use serde::{Deserialize, Serialize};

/// Shifts that overlap in time.
///
/// A group with fewer than two distinct shifts constrains nothing and is
/// skipped by the model builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapGroup {
    /// Member shift names.
    pub shift_ids: Vec<String>,
}

impl OverlapGroup {
    /// Creates a group from shift names.
    pub fn new<I, S>(shift_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shift_ids: shift_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the group restricts anything.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.shift_ids.len() >= 2
    }

    /// Whether the group names the given shift.
    pub fn contains(&self, shift_id: &str) -> bool {
        self.shift_ids.iter().any(|s| s == shift_id)
    }
}

/// Two workers who must never be co-scheduled. Unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictPair {
    pub first: String,
    pub second: String,
}

impl ConflictPair {
    /// Creates a conflict pair.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Whether the pair names the given worker.
    pub fn involves(&self, worker_id: &str) -> bool {
        self.first == worker_id || self.second == worker_id
    }

    /// The pair with its names in lexical order, for orientation-free comparison.
    pub fn normalized(&self) -> (&str, &str) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }
}

impl PartialEq for ConflictPair {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for ConflictPair {}
