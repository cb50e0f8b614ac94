//! Run configuration.
//!
//! Read from an optional JSON file; every field has a default, and the CLI
//! may override individual fields.
//!
//! ```json
//! { "time_limit_secs": 30, "integrality_tolerance": 1e-6, "log_filter": "u_shift=debug" }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::milp::SolveOptions;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot open config {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Engine wall-clock budget in seconds; `None` waits indefinitely.
    pub time_limit_secs: Option<f64>,

    /// Distance from 0/1 within which a binary value is accepted.
    pub integrality_tolerance: f64,

    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            integrality_tolerance: SolveOptions::default().integrality_tolerance,
            log_filter: None,
        }
    }
}

impl SchedulerConfig {
    /// Loads and checks a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_reader(file)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects values no engine can honor.
    pub fn check(&self) -> Result<(), ConfigError> {
        if let Some(secs) = self.time_limit_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "time_limit_secs",
                    reason: format!("must be a positive number of seconds, got {secs}"),
                });
            }
        }
        if !(0.0..0.5).contains(&self.integrality_tolerance) {
            return Err(ConfigError::Invalid {
                field: "integrality_tolerance",
                reason: format!("must lie in [0, 0.5), got {}", self.integrality_tolerance),
            });
        }
        Ok(())
    }

    /// Engine options derived from this config.
    pub fn solve_options(&self) -> SolveOptions {
        let options =
            SolveOptions::default().with_integrality_tolerance(self.integrality_tolerance);
        match self.time_limit_secs {
            Some(secs) => options.with_time_limit(Duration::from_secs_f64(secs)),
            None => options,
        }
    }
}
