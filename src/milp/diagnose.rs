//! Infeasibility diagnosis.
//!
//! When an engine proves a model infeasible, these necessary-condition
//! checks name the constraint families most likely responsible. They never
//! propose a fix and never alter the model.
//!
//! | Check | Implicates |
//! |-------|-----------|
//! | Shift needs more workers than rate it above Major Conflict | Headcount, Disqualification |
//! | Shift needs more workers than have budget for its length | Headcount, HoursBound |
//! | Total labor demand exceeds total offered hours | HoursBound |
//! | Overlap group demand exceeds distinct eligible workers | OverlapExclusivity |
//! | A greedily picked conflict-free crew for a shift falls short of its headcount | ConflictExclusivity |

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use super::model::ConstraintFamily;
use crate::models::{Shift, ShiftProblem, Worker};

fn eligible(worker: &Worker, shift: &Shift) -> bool {
    worker.accepts(&shift.id) && worker.required_hours + 1e-9 >= f64::from(shift.length_hours)
}

/// Size of a mutually compatible crew picked greedily from `pool`.
///
/// Repeatedly takes the worker with the fewest remaining conflicts and drops
/// their conflict partners. The result never exceeds the largest compatible
/// crew, so a shortfall is a hint rather than a proof.
fn greedy_compatible_count(pool: &[&str], problem: &ShiftProblem) -> usize {
    let in_pool: HashSet<&str> = pool.iter().copied().collect();
    let mut partners: HashMap<&str, HashSet<&str>> =
        pool.iter().map(|&w| (w, HashSet::new())).collect();
    for pair in &problem.conflict_pairs {
        let (a, b) = (pair.first.as_str(), pair.second.as_str());
        if a != b && in_pool.contains(a) && in_pool.contains(b) {
            partners.entry(a).or_default().insert(b);
            partners.entry(b).or_default().insert(a);
        }
    }

    let mut remaining: Vec<&str> = pool.to_vec();
    let mut picked = 0;
    while !remaining.is_empty() {
        let degree = |w: &str| {
            partners[w]
                .iter()
                .filter(|p| remaining.contains(*p))
                .count()
        };
        // Ties go to roster order.
        let Some(next) = remaining
            .iter()
            .copied()
            .min_by_key(|w| degree(w))
        else {
            break;
        };
        picked += 1;
        remaining.retain(|w| *w != next && !partners[next].contains(w));
    }
    picked
}

/// Suspected constraint families for an infeasible problem.
///
/// If no check fires, the infeasibility comes from an interaction between
/// families; every side-constraint family present in the problem is then
/// reported together with `Headcount`.
pub fn diagnose_infeasibility(problem: &ShiftProblem) -> Vec<ConstraintFamily> {
    let mut suspected = BTreeSet::new();

    for shift in &problem.shifts {
        let needed = shift.required_workers as usize;
        let willing = problem
            .workers
            .iter()
            .filter(|w| w.accepts(&shift.id))
            .count();
        let able = problem
            .workers
            .iter()
            .filter(|w| eligible(w, shift))
            .count();

        if willing < needed {
            debug!(shift = %shift.id, needed, willing, "too few workers without a major conflict");
            suspected.insert(ConstraintFamily::Headcount);
            suspected.insert(ConstraintFamily::Disqualification);
        }
        if able < needed && willing >= needed {
            debug!(shift = %shift.id, needed, able, "too few workers with enough hours");
            suspected.insert(ConstraintFamily::Headcount);
            suspected.insert(ConstraintFamily::HoursBound);
        }

        if able >= needed && !problem.conflict_pairs.is_empty() {
            let pool: Vec<&str> = problem
                .workers
                .iter()
                .filter(|w| eligible(w, shift))
                .map(|w| w.id.as_str())
                .collect();
            let compatible = greedy_compatible_count(&pool, problem);
            if compatible < needed {
                debug!(shift = %shift.id, needed, pool = pool.len(), compatible,
                    "conflict pairs shrink eligible pool");
                suspected.insert(ConstraintFamily::ConflictExclusivity);
            }
        }
    }

    let demanded = problem.demanded_hours() as f64;
    let offered = problem.offered_hours();
    if demanded > offered + 1e-9 {
        debug!(demanded, offered, "labor demand exceeds offered hours");
        suspected.insert(ConstraintFamily::HoursBound);
    }

    for group in problem.overlap_groups.iter().filter(|g| g.is_effective()) {
        let members: Vec<&Shift> = group
            .shift_ids
            .iter()
            .filter_map(|id| problem.shift(id))
            .collect();
        let demand: usize = members.iter().map(|s| s.required_workers as usize).sum();
        let pool = problem
            .workers
            .iter()
            .filter(|w| members.iter().any(|s| eligible(w, s)))
            .count();
        if demand > pool {
            debug!(group = ?group.shift_ids, demand, pool, "overlap group over-subscribed");
            suspected.insert(ConstraintFamily::OverlapExclusivity);
        }
    }

    if suspected.is_empty() {
        suspected.insert(ConstraintFamily::Headcount);
        suspected.insert(ConstraintFamily::HoursBound);
        if problem.overlap_groups.iter().any(|g| g.is_effective()) {
            suspected.insert(ConstraintFamily::OverlapExclusivity);
        }
        if !problem.conflict_pairs.is_empty() {
            suspected.insert(ConstraintFamily::ConflictExclusivity);
        }
        if problem
            .workers
            .iter()
            .any(|w| problem.shifts.iter().any(|s| !w.accepts(&s.id)))
        {
            suspected.insert(ConstraintFamily::Disqualification);
        }
    }

    suspected.into_iter().collect()
}
