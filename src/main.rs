use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use u_shift::config::SchedulerConfig;
use u_shift::loader::{self, TableSources};
use u_shift::render::{self, OutputFormat};
use u_shift::{logging, ShiftError, ShiftScheduler};

#[derive(Parser)]
#[command(name = "u-shift")]
#[command(about = "Assign workers to shifts by maximizing stated preferences", long_about = None)]
struct Cli {
    /// Shift requirements table (CSV)
    #[arg(long, requires = "roster", required_unless_present = "problem")]
    shifts: Option<PathBuf>,

    /// Form responses table (CSV)
    #[arg(long, requires = "shifts")]
    roster: Option<PathBuf>,

    /// Shift overlaps table (CSV)
    #[arg(long, requires = "shifts")]
    overlaps: Option<PathBuf>,

    /// Worker conflicts table (CSV)
    #[arg(long, requires = "shifts")]
    conflicts: Option<PathBuf>,

    /// Whole problem as one JSON document
    #[arg(long, conflicts_with_all = ["shifts", "roster", "overlaps", "conflicts"])]
    problem: Option<PathBuf>,

    /// Run configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine time limit in seconds, overrides the config
    #[arg(long)]
    time_limit: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => SchedulerConfig::from_json_file(path)?,
        None => SchedulerConfig::default(),
    };
    if cli.time_limit.is_some() {
        config.time_limit_secs = cli.time_limit;
        config.check()?;
    }
    logging::init(config.log_filter.as_deref());

    let loaded = match (&cli.problem, &cli.shifts, &cli.roster) {
        (Some(path), _, _) => loader::load_problem_json(path),
        (None, Some(shifts), Some(roster)) => {
            let mut sources = TableSources::new(shifts, roster);
            sources.overlaps = cli.overlaps.clone();
            sources.conflicts = cli.conflicts.clone();
            loader::load_tables(&sources)
        }
        _ => anyhow::bail!("either --problem or both --shifts and --roster are required"),
    };
    let problem = match loaded {
        Ok(problem) => problem,
        Err(err) => match err.into_data_validation() {
            Ok(invalid) => return report_failure(&invalid, cli.format),
            Err(err) => return Err(anyhow::Error::new(err).context("cannot load input")),
        },
    };

    let scheduler = ShiftScheduler::default().with_options(config.solve_options());
    match scheduler.run(&problem) {
        Ok(report) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match cli.format {
                OutputFormat::Text => render::render_text(&report, &mut out)?,
                OutputFormat::Json => render::render_json(&report, &mut out)?,
            }
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_failure(&err, cli.format),
    }
}

/// Renders any taxonomy failure on stdout and exits non-zero.
fn report_failure(err: &ShiftError, format: OutputFormat) -> anyhow::Result<ExitCode> {
    warn!(kind = ?err.kind(), "run failed");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render_failure(err, format, &mut out)?;
    out.flush()?;
    Ok(ExitCode::FAILURE)
}
