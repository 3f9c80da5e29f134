//! CLI command implementations for UNITS.

pub(crate) mod init_config;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod watch;

mod output;

use std::error::Error;
use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use units::SimConfig;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<units::Error> for CliError {
    fn from(e: units::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Log filter for a `-v` count. `RUST_LOG` takes precedence when set.
pub(crate) fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr log subscriber.
pub(crate) fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

/// Seed from the command line, or one derived from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        #[allow(clippy::cast_possible_truncation)]
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}

/// Load the config file if one was given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<SimConfig, CliError> {
    SimConfig::load_or_default(path).map_err(|e| match path {
        Some(p) => CliError::new(format!("Failed to load {}: {e}", p.display())),
        None => e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert_eq!(filter_for_verbosity(1), "info");
        assert_eq!(filter_for_verbosity(2), "debug");
        assert_eq!(filter_for_verbosity(9), "trace");
    }

    #[test]
    fn test_explicit_seed_kept() {
        assert_eq!(resolve_seed(Some(7)), 7);
    }

    #[test]
    fn test_missing_config_names_file() {
        let err = load_config(Some(Path::new("/nonexistent/units.ron"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/units.ron"));
    }
}
