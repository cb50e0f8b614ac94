//! Schedule report and fairness metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Preference histogram | Assignments realized at each score `0..=5` |
//! | Average preference (worker) | Mean score over the worker's assigned shifts, 0 if none |
//! | Mean preference | Mean of all workers' averages (unassigned workers count as 0) |
//! | Demanded hours | Σ length · headcount over shifts |
//! | Offered hours | Σ required hours over workers |
//! | Assigned hours | Σ assigned hours over workers |
//! | Total preference score | Σ score over all assignments (the objective value) |

use serde::Serialize;

use crate::models::{Schedule, MAX_SCORE};

const BUCKETS: usize = MAX_SCORE as usize + 1;

/// Count of assignments per realized preference score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceHistogram {
    counts: [usize; BUCKETS],
}

impl PreferenceHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one assignment at `score` (clamped to the scale).
    pub fn record(&mut self, score: u8) {
        self.counts[usize::from(score.min(MAX_SCORE))] += 1;
    }

    /// Assignments recorded at `score`.
    pub fn count(&self, score: u8) -> usize {
        self.counts.get(usize::from(score)).copied().unwrap_or(0)
    }

    /// `(score, count)` for every bucket, lowest score first.
    pub fn buckets(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        (0..=MAX_SCORE).map(|s| (s, self.count(s)))
    }

    /// Total number of recorded assignments.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Σ score · count.
    pub fn weighted_sum(&self) -> u64 {
        self.buckets().map(|(s, c)| u64::from(s) * c as u64).sum()
    }
}

/// Per-worker hours and preference outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSummary {
    pub worker_id: String,
    /// Hour budget (upper bound).
    pub required_hours: f64,
    /// Σ length of assigned shifts.
    pub assigned_hours: u64,
    /// Number of assigned shifts.
    pub shift_count: usize,
    /// Mean score over assigned shifts; 0 when no shift is assigned.
    pub average_preference_score: f64,
}

impl WorkerSummary {
    /// Whether the worker received exactly their hour budget.
    pub fn is_fully_booked(&self) -> bool {
        (self.assigned_hours as f64 - self.required_hours).abs() < 1e-9
    }
}

/// Run-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTotals {
    pub demanded_hours: u64,
    pub offered_hours: f64,
    pub assigned_hours: u64,
    pub total_preference_score: u64,
    /// Mean of every worker's average preference score (0 for an empty roster).
    pub mean_preference_score: f64,
    /// Workers whose assigned hours equal their budget.
    pub fully_booked_workers: usize,
}

/// Interpreted result of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub schedule: Schedule,
    pub histogram: PreferenceHistogram,
    /// One entry per worker, in roster order.
    pub workers: Vec<WorkerSummary>,
    pub totals: ReportTotals,
}

impl ScheduleReport {
    /// Summary for a given worker.
    pub fn worker(&self, worker_id: &str) -> Option<&WorkerSummary> {
        self.workers.iter().find(|w| w.worker_id == worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_basic() {
        let mut h = PreferenceHistogram::new();
        h.record(5);
        h.record(5);
        h.record(3);
        h.record(2);

        assert_eq!(h.count(5), 2);
        assert_eq!(h.count(3), 1);
        assert_eq!(h.count(0), 0);
        assert_eq!(h.total(), 4);
        assert_eq!(h.weighted_sum(), 15);
    }

    #[test]
    fn test_histogram_has_six_buckets() {
        let h = PreferenceHistogram::new();
        let buckets: Vec<_> = h.buckets().collect();
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0], (0, 0));
        assert_eq!(buckets[5], (5, 0));
        assert_eq!(h.count(9), 0);
    }

    #[test]
    fn test_histogram_clamps() {
        let mut h = PreferenceHistogram::new();
        h.record(42);
        assert_eq!(h.count(5), 1);
    }

    #[test]
    fn test_fully_booked() {
        let mut w = WorkerSummary {
            worker_id: "Ada".into(),
            required_hours: 8.0,
            assigned_hours: 8,
            shift_count: 2,
            average_preference_score: 4.5,
        };
        assert!(w.is_fully_booked());
        w.assigned_hours = 4;
        assert!(!w.is_fully_booked());
        w.required_hours = 4.5;
        assert!(!w.is_fully_booked());
    }
}
