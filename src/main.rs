//! UNITS CLI - Command-line interface for running and watching UNITS games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// UNITS - A deterministic space-strategy simulation
#[derive(Parser, Debug)]
#[command(name = "units")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single headless game between scripted players
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum simulated seconds (default: 300)
        #[arg(short, long, default_value = "300")]
        duration: f64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save a JSON snapshot of the final world
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Simulation config file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a game in real-time
    Watch {
        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Simulated seconds per real second (default: 1)
        #[arg(long, default_value = "1")]
        speed: f64,

        /// Simulation config file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run mass parallel games and aggregate statistics
    Tournament {
        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum simulated seconds per game (default: 300)
        #[arg(short, long, default_value = "300")]
        duration: f64,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Simulation config file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default simulation config
    InitConfig {
        /// Target directory (default: current directory)
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            seed,
            duration,
            format,
            snapshot,
            config,
            quiet,
        } => cli::run::execute(
            seed,
            duration,
            format,
            snapshot.as_deref(),
            config.as_deref(),
            quiet,
        ),

        Commands::Watch {
            seed,
            speed,
            config,
        } => cli::watch::execute(seed, speed, config.as_deref()),

        Commands::Tournament {
            games,
            seed,
            threads,
            duration,
            format,
            progress,
            config,
        } => cli::tournament::execute(
            games,
            seed,
            threads,
            duration,
            format,
            progress,
            config.as_deref(),
        ),

        Commands::InitConfig { dir } => cli::init_config::execute(&dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_tournament() {
        let args = Args::try_parse_from([
            "units",
            "-vv",
            "tournament",
            "--games",
            "8",
            "-j",
            "2",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Commands::Tournament {
                games,
                threads,
                format,
                ..
            } => {
                assert_eq!(games, 8);
                assert_eq!(threads, Some(2));
                assert_eq!(format, cli::TournamentFormat::Csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let args = Args::try_parse_from(["units", "run"]).unwrap();
        match args.command {
            Commands::Run {
                seed,
                duration,
                snapshot,
                ..
            } => {
                assert_eq!(seed, None);
                assert!((duration - 300.0).abs() < f64::EPSILON);
                assert!(snapshot.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["units", "run", "--format", "xml"]).is_err());
    }
}
