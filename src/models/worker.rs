//! Worker model.
//!
//! A worker offers an upper bound of labor hours and rates every shift in
//! the catalog on the [`Preference`] scale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Preference;

/// A worker who can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker name. Must match across roster and conflict lists.
    pub id: String,
    /// Maximum hours this worker may be assigned (upper bound, not a target).
    pub required_hours: f64,
    /// Preference per shift name. Should cover the whole shift catalog.
    #[serde(default)]
    pub preferences: BTreeMap<String, Preference>,
}

impl Worker {
    /// Creates a worker with no preferences recorded yet.
    pub fn new(id: impl Into<String>, required_hours: f64) -> Self {
        Self {
            id: id.into(),
            required_hours,
            preferences: BTreeMap::new(),
        }
    }

    /// Records a preference for one shift.
    pub fn with_preference(mut self, shift_id: impl Into<String>, preference: Preference) -> Self {
        self.preferences.insert(shift_id.into(), preference);
        self
    }

    /// Records the same preference for several shifts.
    pub fn with_preference_for_all<I, S>(mut self, shift_ids: I, preference: Preference) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in shift_ids {
            self.preferences.insert(id.into(), preference);
        }
        self
    }

    /// Preference for a shift, if one was recorded.
    pub fn preference(&self, shift_id: &str) -> Option<Preference> {
        self.preferences.get(shift_id).copied()
    }

    /// Point value for a shift. Unrated shifts score 0.
    pub fn score(&self, shift_id: &str) -> u8 {
        self.preference(shift_id).map(Preference::score).unwrap_or(0)
    }

    /// Whether the worker may ever be placed on the shift.
    pub fn accepts(&self, shift_id: &str) -> bool {
        self.score(shift_id) > 0
    }
}
