//! Tournament command implementation.

// Throughput figures are intentionally lossy
#![allow(clippy::cast_precision_loss)]

use std::path::Path;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use units::game::NUM_PLAYERS;
use units::tournament::{TournamentConfig, run_game};

use super::output::{
    JsonTournamentResult, TournamentStats, format_tournament_csv, format_tournament_text,
};
use super::run::player_names;
use super::{CliError, TournamentFormat, load_config, resolve_seed};

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or is invalid, or output
/// fails.
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    duration: f64,
    format: TournamentFormat,
    progress: bool,
    config: Option<&Path>,
) -> Result<(), CliError> {
    let sim = load_config(config)?;
    let config = TournamentConfig {
        max_game_time: duration,
        sim,
        ..TournamentConfig::default()
    };
    config.validate()?;
    let names = player_names();

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(e.to_string()))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each rayon worker folds into its own stats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(NUM_PLAYERS),
            |mut local_stats, i| {
                let game_seed = base_seed.wrapping_add(i);
                match run_game(game_seed, &config) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => {
                        tracing::warn!(seed = game_seed, "game failed: {e}");
                        local_stats.add_failure();
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(NUM_PLAYERS),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.1} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json =
                serde_json::to_string_pretty(&JsonTournamentResult::from_stats(&stats, &names))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &names));
        }
    }

    Ok(())
}
