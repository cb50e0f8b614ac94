//! Report rendering for terminals and machines.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{ErrorKind, ShiftError};
use crate::interpret::ScheduleReport;
use crate::milp::ConstraintFamily;
use crate::validation::ValidationError;

/// Output format of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes a human-readable report.
///
/// Workers whose assigned hours equal their budget are marked with `*`.
pub fn render_text<W: Write>(report: &ScheduleReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "Schedule")?;
    for roster in &report.schedule.shifts {
        writeln!(out, "  {}:", roster.shift_id)?;
        if roster.worker_ids.is_empty() {
            writeln!(out, "    (nobody)")?;
        }
        for worker in &roster.worker_ids {
            writeln!(out, "    {worker}")?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Preference scores")?;
    for (score, count) in report.histogram.buckets() {
        writeln!(out, "  {score}: {count}")?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "  {:<24} {:>9} {:>9} {:>7} {:>6}",
        "Worker", "Required", "Assigned", "Shifts", "Score"
    )?;
    for w in &report.workers {
        let mark = if w.is_fully_booked() { '*' } else { ' ' };
        writeln!(
            out,
            "{mark} {:<24} {:>9} {:>9} {:>7} {:>6.2}",
            w.worker_id, w.required_hours, w.assigned_hours, w.shift_count, w.average_preference_score
        )?;
    }
    writeln!(out)?;

    let t = &report.totals;
    writeln!(out, "Hours demanded by shifts:   {}", t.demanded_hours)?;
    writeln!(out, "Hours offered by workers:   {}", t.offered_hours)?;
    writeln!(out, "Hours assigned:             {}", t.assigned_hours)?;
    writeln!(
        out,
        "Fully booked workers:       {}/{}",
        t.fully_booked_workers,
        report.workers.len()
    )?;
    writeln!(out, "Total preference score:     {}", t.total_preference_score)?;
    writeln!(out, "Mean preference score:      {:.2}", t.mean_preference_score)?;
    Ok(())
}

/// Writes the report as pretty JSON.
pub fn render_json<W: Write>(report: &ScheduleReport, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

#[derive(Serialize)]
struct FailureView<'a> {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "is_empty")]
    suspected: &'a [ConstraintFamily],
    #[serde(skip_serializing_if = "is_empty")]
    issues: &'a [ValidationError],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Writes a failure in the given format: its kind, message and, where
/// known, the suspected constraint families or validation issues.
pub fn render_failure<W: Write>(
    err: &ShiftError,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    let issues: &[ValidationError] = match err {
        ShiftError::DataValidation(issues) => issues,
        _ => &[],
    };

    match format {
        OutputFormat::Json => {
            let view = FailureView {
                kind: err.kind(),
                message: err.to_string(),
                suspected: err.suspected_families(),
                issues,
            };
            serde_json::to_writer_pretty(&mut *out, &view)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out, "error [{:?}]", err.kind())?;
            if issues.is_empty() {
                writeln!(out, "  {err}")?;
            }
            for issue in issues {
                writeln!(out, "  - {issue}")?;
            }
            for family in err.suspected_families() {
                writeln!(out, "  suspected: {family}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OverlapGroup, Preference, Shift, ShiftProblem, Worker};
    use crate::validation::ValidationErrorKind;
    use crate::ShiftScheduler;

    fn report() -> ScheduleReport {
        let shifts = vec![Shift::new("Morning", 4, 2), Shift::new("Evening", 4, 1)];
        let workers = vec![
            Worker::new("Ada", 4.0).with_preference_for_all(["Morning", "Evening"], Preference::Prefer),
            Worker::new("Bo", 4.0).with_preference_for_all(["Morning", "Evening"], Preference::Prefer),
            Worker::new("Cy", 8.0).with_preference_for_all(["Morning", "Evening"], Preference::Prefer),
        ];
        let problem = ShiftProblem::new(shifts, workers)
            .with_overlap_group(OverlapGroup::new(["Morning", "Evening"]));
        ShiftScheduler::default().run(&problem).unwrap()
    }

    #[test]
    fn test_text_report() {
        let mut out = Vec::new();
        render_text(&report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  Morning:"));
        assert!(text.contains("  5: 3"));
        assert!(text.contains("Total preference score:     15"));
        assert!(text.contains("Fully booked workers:       2/3"));
        let cy = text.lines().find(|l| l.contains("Cy")).unwrap();
        assert!(cy.starts_with(' '));
        let ada = text.lines().find(|l| l.contains("Ada") && l.contains("5.00")).unwrap();
        assert!(ada.starts_with('*'));
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        render_json(&report(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["totals"]["total_preference_score"], 15);
        assert_eq!(value["schedule"]["shifts"][0]["shift_id"], "Morning");
        assert_eq!(value["workers"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_failure_rendering() {
        let err = ShiftError::InfeasibleModel {
            suspected: vec![ConstraintFamily::Headcount, ConstraintFamily::ConflictExclusivity],
        };
        let mut out = Vec::new();
        render_failure(&err, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("error [InfeasibleModel]"));
        assert!(text.contains("suspected: conflict exclusivity"));

        let invalid = ShiftError::DataValidation(vec![ValidationError::new(
            ValidationErrorKind::SelfConflict,
            "Worker 'Ada' is declared in conflict with themself",
        )]);
        let mut out = Vec::new();
        render_failure(&invalid, OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "DataValidation");
        assert_eq!(value["issues"][0]["kind"], "SelfConflict");
        assert!(value.get("suspected").is_none());
    }
}
