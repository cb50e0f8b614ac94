//! Input normalization.
//!
//! Reads the tabular exports produced by a staffing survey (CSV) or a single
//! JSON document and normalizes them into a [`ShiftProblem`].
//!
//! # Tables
//!
//! | Table | Layout |
//! |-------|--------|
//! | Shift requirements | Header `Shift Name, <shift>...`; rows `Required number of people` and `Shift Length` |
//! | Form responses | Columns `Worker Name`, `Required Hours`, one column per shift; others ignored |
//! | Shift overlaps | Header row, then one group of shift names per row |
//! | Worker conflicts | Header row, then `<worker>, <conflicting worker>...` per row |
//!
//! Content problems are collected across the whole table and returned
//! together as [`LoadError::Invalid`]. Cross-reference checks (unknown shifts
//! in an overlap group, unknown workers in a conflict) are left to
//! [`validate_input`](crate::validation::validate_input).

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::error::Category;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{join_messages, ShiftError};
use crate::models::{ConflictPair, OverlapGroup, Preference, Shift, ShiftProblem, Worker};
use crate::validation::{ValidationError, ValidationErrorKind};

const SHIFT_NAME: &str = "Shift Name";
const REQUIRED_PEOPLE: &str = "Required number of people";
const SHIFT_LENGTH: &str = "Shift Length";
const WORKER_NAME: &str = "Worker Name";
const REQUIRED_HOURS: &str = "Required Hours";

/// Input loading errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON problem")]
    Json(#[from] serde_json::Error),

    #[error("input has {} issue(s): {}", .0.len(), join_messages(.0))]
    Invalid(Vec<ValidationError>),
}

impl LoadError {
    /// Splits content problems from unreadable input.
    ///
    /// Collected table issues, and JSON that parses but carries out-of-range
    /// or mistyped values (e.g. a negative `length_hours`), become
    /// [`ShiftError::DataValidation`]. I/O and syntax errors are returned
    /// unchanged.
    pub fn into_data_validation(self) -> Result<ShiftError, LoadError> {
        match self {
            LoadError::Invalid(issues) => Ok(ShiftError::DataValidation(issues)),
            LoadError::Json(e) if e.classify() == Category::Data => {
                Ok(ShiftError::DataValidation(vec![ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    format!("JSON problem has an invalid value: {e}"),
                )]))
            }
            other => Err(other),
        }
    }
}

/// Locations of the tabular inputs.
#[derive(Debug, Clone)]
pub struct TableSources {
    pub shifts: PathBuf,
    pub responses: PathBuf,
    pub overlaps: Option<PathBuf>,
    pub conflicts: Option<PathBuf>,
}

impl TableSources {
    pub fn new(shifts: impl Into<PathBuf>, responses: impl Into<PathBuf>) -> Self {
        Self {
            shifts: shifts.into(),
            responses: responses.into(),
            overlaps: None,
            conflicts: None,
        }
    }

    pub fn with_overlaps(mut self, path: impl Into<PathBuf>) -> Self {
        self.overlaps = Some(path.into());
        self
    }

    pub fn with_conflicts(mut self, path: impl Into<PathBuf>) -> Self {
        self.conflicts = Some(path.into());
        self
    }
}

/// Loads and normalizes every table into one problem.
pub fn load_tables(sources: &TableSources) -> Result<ShiftProblem, LoadError> {
    let shifts = load_shift_requirements(open(&sources.shifts)?)?;
    let workers = load_form_responses(open(&sources.responses)?, &shifts)?;
    let overlap_groups = match &sources.overlaps {
        Some(path) => load_overlaps(open(path)?)?,
        None => Vec::new(),
    };
    let conflict_pairs = match &sources.conflicts {
        Some(path) => load_conflicts(open(path)?)?,
        None => Vec::new(),
    };

    info!(
        shifts = shifts.len(),
        workers = workers.len(),
        overlap_groups = overlap_groups.len(),
        conflict_pairs = conflict_pairs.len(),
        "tables loaded"
    );

    Ok(ShiftProblem {
        shifts,
        workers,
        overlap_groups,
        conflict_pairs,
    })
}

/// Reads a whole problem from a JSON file.
pub fn load_problem_json(path: &Path) -> Result<ShiftProblem, LoadError> {
    let problem: ShiftProblem = serde_json::from_reader(open(path)?)?;
    info!(
        path = %path.display(),
        shifts = problem.shifts.len(),
        workers = problem.workers.len(),
        "problem loaded"
    );
    Ok(problem)
}

/// Parses the shift requirements table.
pub fn load_shift_requirements<R: Read>(reader: R) -> Result<Vec<Shift>, LoadError> {
    let rows = read_rows(reader)?;
    let mut errors = Vec::new();

    let Some(header) = rows.first() else {
        return Err(invalid("shift requirements table is empty"));
    };
    if !header
        .first()
        .is_some_and(|c| c.eq_ignore_ascii_case(SHIFT_NAME))
    {
        debug!(first_cell = ?header.first(), "unexpected shift table header");
    }

    let columns: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, name)| (i, name.as_str()))
        .collect();

    let row_named = |label: &str| {
        rows.iter()
            .skip(1)
            .find(|r| r.first().is_some_and(|c| c.eq_ignore_ascii_case(label)))
    };
    let required_row = row_named(REQUIRED_PEOPLE);
    let length_row = row_named(SHIFT_LENGTH);
    for (label, row) in [(REQUIRED_PEOPLE, required_row), (SHIFT_LENGTH, length_row)] {
        if row.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Shift requirements table has no '{label}' row"),
            ));
        }
    }

    let mut seen = HashSet::new();
    let mut shifts = Vec::with_capacity(columns.len());
    for (col, name) in columns {
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift name: {name}"),
            ));
            continue;
        }
        let required = required_row
            .and_then(|row| parse_whole(cell_at(row, col), name, REQUIRED_PEOPLE, &mut errors));
        let length = length_row
            .and_then(|row| parse_whole(cell_at(row, col), name, SHIFT_LENGTH, &mut errors));
        if let (Some(required), Some(length)) = (required, length) {
            shifts.push(Shift::new(name, length, required));
        }
    }

    finish(shifts, errors)
}

/// Parses the form responses table against the shift catalog.
pub fn load_form_responses<R: Read>(reader: R, shifts: &[Shift]) -> Result<Vec<Worker>, LoadError> {
    let rows = read_rows(reader)?;
    let mut errors = Vec::new();

    let Some(header) = rows.first() else {
        return Err(invalid("form responses table is empty"));
    };
    let column = |name: &str| header.iter().position(|h| h == name);

    let (Some(name_col), Some(hours_col)) = (column(WORKER_NAME), column(REQUIRED_HOURS)) else {
        return Err(invalid(format!(
            "form responses table needs '{WORKER_NAME}' and '{REQUIRED_HOURS}' columns"
        )));
    };

    let mut shift_cols = Vec::with_capacity(shifts.len());
    for shift in shifts {
        match column(&shift.id) {
            Some(col) => shift_cols.push((shift.id.as_str(), col)),
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingPreference,
                format!("Form responses have no column for shift '{}'", shift.id),
            )),
        }
    }

    let mut seen = HashSet::new();
    let mut workers = Vec::new();
    for (line, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(String::is_empty) {
            continue;
        }
        let cell = |col: usize| cell_at(row, col);

        let name = cell(name_col);
        if name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Response row {} has no worker name", line + 1),
            ));
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker name: {name}"),
            ));
            continue;
        }

        let hours = parse_hours(cell(hours_col), name, &mut errors);
        let mut worker = Worker::new(name, hours.unwrap_or(0.0));
        for &(shift_id, col) in &shift_cols {
            match Preference::from_cell(cell(col)) {
                Ok(p) => {
                    worker.preferences.insert(shift_id.to_string(), p);
                }
                Err(e) => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPreference,
                    format!("Worker '{name}' rates shift '{shift_id}' with {e}"),
                )),
            }
        }
        workers.push(worker);
    }

    finish(workers, errors)
}

/// Parses the shift overlaps table. Rows with fewer than two names are dropped.
pub fn load_overlaps<R: Read>(reader: R) -> Result<Vec<OverlapGroup>, LoadError> {
    let rows = read_rows(reader)?;
    let groups = rows
        .iter()
        .skip(1)
        .map(|row| OverlapGroup::new(row.iter().filter(|c| !c.is_empty()).map(String::as_str)))
        .filter(|g| {
            if !g.is_effective() {
                debug!(group = ?g.shift_ids, "dropping overlap group with fewer than two shifts");
            }
            g.is_effective()
        })
        .collect();
    Ok(groups)
}

/// Parses the worker conflicts table into pairs.
pub fn load_conflicts<R: Read>(reader: R) -> Result<Vec<ConflictPair>, LoadError> {
    let rows = read_rows(reader)?;
    let mut errors = Vec::new();
    let mut pairs = Vec::new();

    for (line, row) in rows.iter().enumerate().skip(1) {
        let mut cells = row.iter().map(String::as_str);
        let worker = cells.next().unwrap_or("");
        let others: Vec<&str> = cells.filter(|c| !c.is_empty()).collect();
        if worker.is_empty() {
            if !others.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    format!("Conflict row {} has no worker name", line + 1),
                ));
            }
            continue;
        }
        pairs.extend(others.into_iter().map(|other| ConflictPair::new(worker, other)));
    }

    finish(pairs, errors)
}

/// Trimmed cell text, or `""` past the end of a ragged row.
fn cell_at(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// All records, cells trimmed, ragged rows allowed.
fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| {
            record.map(|r| r.iter().map(|c| c.trim().to_string()).collect::<Vec<_>>())
        })
        .collect()
}

fn parse_whole(
    cell: &str,
    shift: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<u32> {
    let value: f64 = match cell.parse() {
        Ok(v) => v,
        Err(_) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Shift '{shift}' has unparsable {label} '{cell}'"),
            ));
            return None;
        }
    };
    if value < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("Shift '{shift}' has negative {label} {value}"),
        ));
        return None;
    }
    if !value.is_finite() || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidValue,
            format!("Shift '{shift}' has non-integral {label} {value}"),
        ));
        return None;
    }
    Some(value as u32)
}

fn parse_hours(cell: &str, worker: &str, errors: &mut Vec<ValidationError>) -> Option<f64> {
    match cell.parse::<f64>() {
        Ok(v) if !v.is_finite() => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Worker '{worker}' has non-finite required hours {v}"),
            ));
            None
        }
        Ok(v) if v < 0.0 => {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Worker '{worker}' has negative required hours {v}"),
            ));
            None
        }
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Worker '{worker}' has unparsable required hours '{cell}'"),
            ));
            None
        }
    }
}

fn invalid(message: impl Into<String>) -> LoadError {
    LoadError::Invalid(vec![ValidationError::new(
        ValidationErrorKind::InvalidValue,
        message,
    )])
}

fn finish<T>(items: Vec<T>, errors: Vec<ValidationError>) -> Result<Vec<T>, LoadError> {
    if errors.is_empty() {
        Ok(items)
    } else {
        Err(LoadError::Invalid(errors))
    }
}
