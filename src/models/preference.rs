//! Preference scale.
//!
//! Workers rate every shift on a fixed five-label ordinal scale. Each label
//! maps to a point value used as the objective coefficient of the
//! corresponding assignment variable.
//!
//! | Label | Points | Effect |
//! |-------|--------|--------|
//! | Prefer | 5 | |
//! | Neutral | 4 | |
//! | Dislike | 3 | |
//! | Minor Conflict | 2 | |
//! | Major Conflict | 0 | assignment forbidden |
//!
//! Point value 1 is unused by the scale but kept as a histogram bucket so
//! every report carries the same six buckets `0..=5`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest point value on the scale.
pub const MAX_SCORE: u8 = 5;

/// A worker's stated preference for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Preference {
    /// Absolute conflict. The worker is never assigned the shift.
    #[serde(rename = "Major Conflict")]
    MajorConflict,
    #[serde(rename = "Minor Conflict")]
    MinorConflict,
    Dislike,
    Neutral,
    Prefer,
}

impl Preference {
    /// All labels, lowest score first.
    pub const ALL: [Preference; 5] = [
        Preference::MajorConflict,
        Preference::MinorConflict,
        Preference::Dislike,
        Preference::Neutral,
        Preference::Prefer,
    ];

    /// Point value of this label.
    #[inline]
    pub fn score(self) -> u8 {
        match self {
            Preference::MajorConflict => 0,
            Preference::MinorConflict => 2,
            Preference::Dislike => 3,
            Preference::Neutral => 4,
            Preference::Prefer => 5,
        }
    }

    /// Whether this label forbids the assignment outright.
    #[inline]
    pub fn is_disqualifying(self) -> bool {
        self.score() == 0
    }

    /// Canonical label as it appears in form responses.
    pub fn label(self) -> &'static str {
        match self {
            Preference::MajorConflict => "Major Conflict",
            Preference::MinorConflict => "Minor Conflict",
            Preference::Dislike => "Dislike",
            Preference::Neutral => "Neutral",
            Preference::Prefer => "Prefer",
        }
    }

    /// Parses a form-response cell.
    ///
    /// A blank cell counts as `Major Conflict`. Any other text must match a
    /// canonical label exactly (surrounding whitespace ignored).
    pub fn from_cell(cell: &str) -> Result<Self, UnknownPreference> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Ok(Preference::MajorConflict);
        }
        trimmed.parse()
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A preference label outside the fixed scale.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference label '{0}'")]
pub struct UnknownPreference(pub String);

impl FromStr for Preference {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::ALL
            .into_iter()
            .find(|p| p.label() == s.trim())
            .ok_or_else(|| UnknownPreference(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        assert_eq!(Preference::Prefer.score(), 5);
        assert_eq!(Preference::Neutral.score(), 4);
        assert_eq!(Preference::Dislike.score(), 3);
        assert_eq!(Preference::MinorConflict.score(), 2);
        assert_eq!(Preference::MajorConflict.score(), 0);
        assert!(Preference::ALL.iter().all(|p| p.score() <= MAX_SCORE));
    }

    #[test]
    fn test_only_major_conflict_disqualifies() {
        let disqualifying: Vec<_> = Preference::ALL
            .into_iter()
            .filter(|p| p.is_disqualifying())
            .collect();
        assert_eq!(disqualifying, vec![Preference::MajorConflict]);
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(Preference::from_cell("Prefer"), Ok(Preference::Prefer));
        assert_eq!(
            Preference::from_cell("  Minor Conflict "),
            Ok(Preference::MinorConflict)
        );
        assert_eq!(Preference::from_cell(""), Ok(Preference::MajorConflict));
        assert_eq!(Preference::from_cell("   "), Ok(Preference::MajorConflict));
        assert!(Preference::from_cell("prefer").is_err());
        assert!(Preference::from_cell("Love it").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for p in Preference::ALL {
            assert_eq!(p.label().parse::<Preference>(), Ok(p));
            assert_eq!(p.to_string(), p.label());
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Preference::MinorConflict).unwrap();
        assert_eq!(json, "\"Minor Conflict\"");
        let back: Preference = serde_json::from_str("\"Major Conflict\"").unwrap();
        assert_eq!(back, Preference::MajorConflict);
    }
}
