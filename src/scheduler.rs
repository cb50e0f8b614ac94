//! End-to-end scheduling pipeline.
//!
//! ```text
//! ShiftProblem ─validate─▶ ShiftModelBuilder ─▶ SolvingEngine ─▶ ResultInterpreter ─▶ ScheduleReport
//! ```
//!
//! Each run is single-shot: the model and report belong to the call, and
//! the only potentially slow step is the engine call, bounded by the
//! optional time limit in [`SolveOptions`].

use std::time::Instant;

use tracing::{info, info_span, warn};

use crate::error::{ShiftError, SolverError};
use crate::interpret::{ResultInterpreter, ScheduleReport};
use crate::milp::{
    diagnose_infeasibility, EngineFailure, MicroLpEngine, ShiftModelBuilder, SolveOptions,
    SolveOutcome, SolvingEngine,
};
use crate::models::ShiftProblem;

/// Runs validation, model building, solving and interpretation.
///
/// # Example
/// ```
/// use u_shift::models::{OverlapGroup, Preference, Shift, ShiftProblem, Worker};
/// use u_shift::ShiftScheduler;
///
/// let shifts = vec![Shift::new("Morning", 4, 2), Shift::new("Evening", 4, 1)];
/// let workers = ["Ada", "Bo", "Cy"]
///     .into_iter()
///     .map(|n| Worker::new(n, 4.0).with_preference_for_all(["Morning", "Evening"], Preference::Prefer))
///     .collect();
/// let problem = ShiftProblem::new(shifts, workers)
///     .with_overlap_group(OverlapGroup::new(["Morning", "Evening"]));
///
/// let report = ShiftScheduler::default().run(&problem).unwrap();
/// assert_eq!(report.totals.total_preference_score, 15);
/// ```
pub struct ShiftScheduler<E> {
    engine: E,
    options: SolveOptions,
}

impl Default for ShiftScheduler<MicroLpEngine> {
    fn default() -> Self {
        Self::new(MicroLpEngine::new())
    }
}

impl<E: SolvingEngine> ShiftScheduler<E> {
    /// Creates a scheduler around an engine with default options.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            options: SolveOptions::default(),
        }
    }

    /// Sets the solve options.
    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Solves the problem with every constraint family enforced.
    ///
    /// # Errors
    /// - [`ShiftError::DataValidation`] before any model is built
    /// - [`ShiftError::InfeasibleModel`] with the suspected families
    /// - [`ShiftError::Solver`] on engine failure, timeout, unboundedness or
    ///   a solution that fails re-validation
    pub fn run(&self, problem: &ShiftProblem) -> Result<ScheduleReport, ShiftError> {
        self.run_with(problem, ShiftModelBuilder::new(problem))
    }

    /// Solves with a caller-configured builder (e.g. a deliberately relaxed one).
    pub fn run_with(
        &self,
        problem: &ShiftProblem,
        builder: ShiftModelBuilder<'_>,
    ) -> Result<ScheduleReport, ShiftError> {
        let span = info_span!("shift_schedule", engine = self.engine.name());
        let _enter = span.enter();

        let model = builder.build()?;
        info!(
            workers = model.worker_count(),
            shifts = model.shift_count(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "model built"
        );

        let started = Instant::now();
        let outcome = self.engine.solve(&model, &self.options);
        let elapsed = started.elapsed();

        match outcome {
            SolveOutcome::Optimal(solution) => {
                info!(?elapsed, objective = solution.objective_value, "optimal solution found");
                let report = ResultInterpreter::new(problem, &model)
                    .with_tolerance(self.options.integrality_tolerance)
                    .interpret(&solution)?;
                Ok(report)
            }
            SolveOutcome::Infeasible => {
                let mut suspected = diagnose_infeasibility(problem);
                suspected.retain(|f| !builder.relaxed_families().contains(f));
                warn!(?elapsed, ?suspected, "model is infeasible");
                Err(ShiftError::InfeasibleModel { suspected })
            }
            SolveOutcome::Unbounded => {
                warn!(?elapsed, "engine reported an unbounded model");
                Err(SolverError::Unbounded.into())
            }
            SolveOutcome::Error(EngineFailure::TimedOut(limit)) => {
                warn!(?limit, "solve timed out");
                Err(SolverError::TimedOut(limit).into())
            }
            SolveOutcome::Error(EngineFailure::Failed(reason)) => {
                warn!(?elapsed, %reason, "engine failed");
                Err(SolverError::Engine {
                    engine: self.engine.name().to_string(),
                    reason,
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::milp::{AssignmentModel, ConstraintFamily, RawSolution};
    use crate::models::{ConflictPair, OverlapGroup, Preference, Schedule, Shift, Worker};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::time::Duration;

    /// Engine returning a canned outcome.
    struct StubEngine(SolveOutcome);

    impl SolvingEngine for StubEngine {
        fn name(&self) -> &str {
            "stub"
        }

        fn solve(&self, _model: &AssignmentModel, _options: &SolveOptions) -> SolveOutcome {
            self.0.clone()
        }
    }

    fn all_prefer(names: &[&str], hours: f64, shifts: &[&str]) -> Vec<Worker> {
        names
            .iter()
            .map(|n| Worker::new(*n, hours).with_preference_for_all(shifts.iter().copied(), Preference::Prefer))
            .collect()
    }

    /// Checks every invariant of an accepted schedule against the problem.
    fn assert_invariants(problem: &ShiftProblem, report: &ScheduleReport) {
        let schedule: &Schedule = &report.schedule;
        for shift in &problem.shifts {
            assert_eq!(
                schedule.workers_on(&shift.id).len(),
                shift.required_workers as usize,
                "headcount of {}",
                shift.id
            );
        }
        for worker in &problem.workers {
            let held = schedule.shifts_for(&worker.id);
            let hours: u64 = held
                .iter()
                .map(|s| u64::from(problem.shift(s).unwrap().length_hours))
                .sum();
            let summary = report.worker(&worker.id).unwrap();
            assert_eq!(summary.assigned_hours, hours);
            assert!(hours as f64 <= worker.required_hours + 1e-9);
            for s in &held {
                assert!(worker.accepts(s), "{} placed on disqualified {}", worker.id, s);
            }
            for group in &problem.overlap_groups {
                assert!(held.iter().filter(|s| group.contains(s)).count() <= 1);
            }
        }
        for pair in &problem.conflict_pairs {
            for roster in &schedule.shifts {
                assert!(
                    !(roster.worker_ids.contains(&pair.first)
                        && roster.worker_ids.contains(&pair.second)),
                    "{} and {} share {}",
                    pair.first,
                    pair.second,
                    roster.shift_id
                );
            }
        }
        let objective: u64 = schedule
            .pairs()
            .map(|(w, s)| u64::from(problem.worker(w).unwrap().score(s)))
            .sum();
        assert_eq!(report.totals.total_preference_score, objective);
        assert_eq!(report.histogram.count(0), 0);
    }

    #[test]
    fn test_overlapping_morning_evening() {
        let shifts = vec![Shift::new("Morning", 4, 2), Shift::new("Evening", 4, 1)];
        let problem = ShiftProblem::new(shifts, all_prefer(&["Ada", "Bo", "Cy"], 4.0, &["Morning", "Evening"]))
            .with_overlap_group(OverlapGroup::new(["Morning", "Evening"]));

        let report = ShiftScheduler::default().run(&problem).unwrap();

        assert_eq!(report.schedule.workers_on("Morning").len(), 2);
        assert_eq!(report.schedule.workers_on("Evening").len(), 1);
        for w in ["Ada", "Bo", "Cy"] {
            assert_eq!(report.schedule.shifts_for(w).len(), 1);
        }
        assert_eq!(report.totals.total_preference_score, 15);
        assert_eq!(report.histogram.count(5), 3);
        assert_invariants(&problem, &report);
    }

    #[test]
    fn test_empty_roster_with_unstaffed_shift() {
        let problem = ShiftProblem::new(vec![Shift::new("Idle", 4, 0)], vec![]);

        let report = ShiftScheduler::default().run(&problem).unwrap();

        assert_eq!(report.schedule.shifts.len(), 1);
        assert!(report.schedule.workers_on("Idle").is_empty());
        assert!(report.workers.is_empty());
        assert_eq!(report.totals.total_preference_score, 0);
        assert_eq!(report.totals.mean_preference_score, 0.0);
    }

    #[test]
    fn test_empty_roster_cannot_staff_a_shift() {
        let problem = ShiftProblem::new(vec![Shift::new("Solo", 4, 1)], vec![]);

        let err = ShiftScheduler::default().run(&problem).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InfeasibleModel);
    }

    #[test]
    fn test_zero_hour_worker_gets_nothing() {
        let shifts = vec![Shift::new("Morning", 4, 1)];
        let mut workers = all_prefer(&["Ada"], 4.0, &["Morning"]);
        workers.push(Worker::new("Idle", 0.0).with_preference("Morning", Preference::Prefer));
        let problem = ShiftProblem::new(shifts, workers);

        let report = ShiftScheduler::default().run(&problem).unwrap();

        let idle = report.worker("Idle").unwrap();
        assert_eq!(idle.assigned_hours, 0);
        assert_eq!(idle.average_preference_score, 0.0);
        assert!(report.schedule.shifts_for("Idle").is_empty());
        assert_eq!(report.schedule.workers_on("Morning"), ["Ada"]);
    }

    #[test]
    fn test_headcount_beyond_available_workers_is_infeasible() {
        let shifts = vec![Shift::new("Rush", 4, 3)];
        let mut workers = all_prefer(&["Ada", "Bo"], 8.0, &["Rush"]);
        workers.push(Worker::new("Cy", 8.0).with_preference("Rush", Preference::MajorConflict));
        let problem = ShiftProblem::new(shifts, workers);

        let err = ShiftScheduler::default().run(&problem).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InfeasibleModel);
        assert!(err
            .suspected_families()
            .contains(&ConstraintFamily::Disqualification));
    }

    #[test]
    fn test_conflict_pair_never_shares_a_shift() {
        let names = ["Ada", "Bo", "Cy", "Di"];
        let shifts = vec![Shift::new("Morning", 4, 2), Shift::new("Evening", 4, 2)];
        let problem = ShiftProblem::new(shifts, all_prefer(&names, 8.0, &["Morning", "Evening"]))
            .with_conflict_pair(ConflictPair::new("Ada", "Bo"));

        let report = ShiftScheduler::default().run(&problem).unwrap();

        for roster in &report.schedule.shifts {
            assert!(!(roster.worker_ids.iter().any(|w| w == "Ada")
                && roster.worker_ids.iter().any(|w| w == "Bo")));
        }
        assert_eq!(report.totals.total_preference_score, 20);
        assert_invariants(&problem, &report);
    }

    #[test]
    fn test_conflict_pair_lowers_objective() {
        // Night prefers Ada and Bo together; the pair forces Cy (dislike) in.
        let shifts = vec![Shift::new("Night", 4, 2)];
        let workers = vec![
            Worker::new("Ada", 4.0).with_preference("Night", Preference::Prefer),
            Worker::new("Bo", 4.0).with_preference("Night", Preference::Prefer),
            Worker::new("Cy", 4.0).with_preference("Night", Preference::Dislike),
        ];
        let free = ShiftProblem::new(shifts, workers);
        let paired = free
            .clone()
            .with_conflict_pair(ConflictPair::new("Bo", "Ada"));

        let unconstrained = ShiftScheduler::default().run(&free).unwrap();
        let constrained = ShiftScheduler::default().run(&paired).unwrap();

        assert_eq!(unconstrained.totals.total_preference_score, 10);
        assert_eq!(constrained.totals.total_preference_score, 8);
        assert!(constrained.schedule.is_assigned("Cy", "Night"));
    }

    #[test]
    fn test_unknown_overlap_shift_fails_before_solving() {
        let shifts = vec![Shift::new("Morning", 4, 1)];
        let problem = ShiftProblem::new(shifts, all_prefer(&["Ada"], 4.0, &["Morning"]))
            .with_overlap_group(OverlapGroup::new(["Morning", "Brunch"]));

        // An engine that would panic proves no solve happens.
        struct Unreachable;
        impl SolvingEngine for Unreachable {
            fn name(&self) -> &str {
                "unreachable"
            }
            fn solve(&self, _: &AssignmentModel, _: &SolveOptions) -> SolveOutcome {
                panic!("solve must not be called");
            }
        }

        let err = ShiftScheduler::new(Unreachable).run(&problem).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataValidation);
    }

    #[test]
    fn test_engine_failures_map_to_solver_errors() {
        let problem = ShiftProblem::new(
            vec![Shift::new("Morning", 4, 1)],
            all_prefer(&["Ada"], 4.0, &["Morning"]),
        );

        let timed_out = ShiftScheduler::new(StubEngine(SolveOutcome::Error(
            EngineFailure::TimedOut(Duration::from_millis(10)),
        )))
        .run(&problem)
        .unwrap_err();
        assert!(matches!(timed_out, ShiftError::Solver(SolverError::TimedOut(_))));

        let unbounded = ShiftScheduler::new(StubEngine(SolveOutcome::Unbounded))
            .run(&problem)
            .unwrap_err();
        assert!(matches!(unbounded, ShiftError::Solver(SolverError::Unbounded)));

        let failed = ShiftScheduler::new(StubEngine(SolveOutcome::Error(EngineFailure::Failed(
            "license expired".into(),
        ))))
        .run(&problem)
        .unwrap_err();
        assert_eq!(failed.kind(), ErrorKind::Solver);
        assert!(failed.to_string().contains("license expired"));
    }

    #[test]
    fn test_bogus_optimal_is_rejected() {
        let problem = ShiftProblem::new(
            vec![Shift::new("Morning", 4, 1)],
            all_prefer(&["Ada"], 4.0, &["Morning"]),
        );
        // Claims optimal but leaves the shift empty.
        let engine = StubEngine(SolveOutcome::Optimal(RawSolution {
            values: vec![0.0, 0.0],
            objective_value: 5.0,
        }));

        let err = ShiftScheduler::new(engine).run(&problem).unwrap_err();
        assert!(matches!(
            err,
            ShiftError::Solver(SolverError::InvalidSolution {
                family: ConstraintFamily::Headcount,
                ..
            })
        ));
    }

    #[test]
    fn test_relaxed_run_is_explicit() {
        let shifts = vec![Shift::new("Night", 4, 2)];
        let problem = ShiftProblem::new(shifts, all_prefer(&["Ada", "Bo"], 4.0, &["Night"]))
            .with_conflict_pair(ConflictPair::new("Ada", "Bo"));
        let scheduler = ShiftScheduler::default();

        let err = scheduler.run(&problem).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InfeasibleModel);
        assert_eq!(
            err.suspected_families(),
            [ConstraintFamily::ConflictExclusivity]
        );

        let relaxed = ShiftModelBuilder::new(&problem)
            .without_family(ConstraintFamily::ConflictExclusivity);
        let report = scheduler.run_with(&problem, relaxed).unwrap();
        assert_eq!(report.schedule.workers_on("Night").len(), 2);
    }

    #[test]
    fn test_time_limit_pass_through() {
        let problem = ShiftProblem::new(
            vec![Shift::new("Morning", 4, 1)],
            all_prefer(&["Ada", "Bo"], 4.0, &["Morning"]),
        );
        let scheduler = ShiftScheduler::default()
            .with_options(SolveOptions::default().with_time_limit(Duration::from_secs(30)));
        assert_eq!(scheduler.options().time_limit, Some(Duration::from_secs(30)));
        assert!(scheduler.run(&problem).is_ok());
    }

    #[test]
    fn test_random_instances_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let shift_names = ["S1", "S2", "S3", "S4"];
        let worker_names = ["W1", "W2", "W3", "W4", "W5"];

        for _ in 0..20 {
            let shifts: Vec<Shift> = shift_names
                .iter()
                .map(|n| Shift::new(*n, rng.random_range(1..=6), rng.random_range(0..=2)))
                .collect();
            let workers: Vec<Worker> = worker_names
                .iter()
                .map(|n| {
                    let mut w = Worker::new(*n, f64::from(rng.random_range(0..=12u32)));
                    for s in &shift_names {
                        let p = Preference::ALL[rng.random_range(0..Preference::ALL.len())];
                        w = w.with_preference(*s, p);
                    }
                    w
                })
                .collect();
            let mut problem = ShiftProblem::new(shifts, workers)
                .with_overlap_group(OverlapGroup::new(["S1", "S2"]));
            if rng.random_bool(0.5) {
                problem = problem.with_conflict_pair(ConflictPair::new("W1", "W2"));
            }

            match ShiftScheduler::default().run(&problem) {
                Ok(report) => assert_invariants(&problem, &report),
                Err(err) => assert_eq!(err.kind(), ErrorKind::InfeasibleModel, "{err}"),
            }
        }
    }
}
