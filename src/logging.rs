//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor a configured filter is set.
pub const DEFAULT_FILTER: &str = "info";

/// Initializes the global subscriber.
///
/// `RUST_LOG` wins over `filter`; `filter` wins over [`DEFAULT_FILTER`].
/// Logs go to stderr so rendered reports on stdout stay clean.
///
/// # Example
/// ```no_run
/// u_shift::logging::init(Some("u_shift=debug"));
/// ```
pub fn init(filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Verbose subscriber routed through the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
