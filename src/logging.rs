//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log filter:
//! 1. `--verbose` CLI flag (debug for this crate)
//! 2. `TASKDAG_LOG` environment variable (e.g. "info", "taskdag::layout=trace")
//! 3. default to `warn`
//!
//! Logs go to stderr so they never mix with command output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "TASKDAG_LOG";

/// Initialise the global logging subscriber.
///
/// Call once at startup.
pub fn init(verbose: bool) -> Result<()> {
    let filter = build_filter(verbose, std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn build_filter(verbose: bool, env_value: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("taskdag=debug");
    }

    env_value
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
