//! Run command implementation.

use std::path::Path;

use units::game::invariants::check_invariants;
use units::game::{NUM_PLAYERS, Player};
use units::snapshot::WorldSnapshot;
use units::tournament::{TournamentConfig, play_game};

use super::output::{JsonGameResult, format_text};
use super::{CliError, OutputFormat, load_config, resolve_seed};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the game fails to run,
/// or the snapshot cannot be written.
pub(crate) fn execute(
    seed: Option<u64>,
    duration: f64,
    format: OutputFormat,
    snapshot: Option<&Path>,
    config: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let sim = load_config(config)?;
    let names = player_names();

    let config = TournamentConfig {
        max_game_time: duration,
        sim,
        ..TournamentConfig::default()
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running game with seed {seed}...");
        println!("Players: {}", names.join(", "));
        println!();
    }

    let (result, world) = play_game(seed, &config)?;

    if let Some(path) = snapshot {
        let violations = check_invariants(&world);
        for violation in &violations {
            tracing::warn!("{violation}");
        }
        WorldSnapshot::capture(&world).save(path)?;
        if !quiet && format == OutputFormat::Text {
            println!("Snapshot saved to: {}", path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result, &names));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::from_game_result(
                &result, &names,
            ))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Seat names in id order.
pub(crate) fn player_names() -> Vec<String> {
    (0u8..)
        .take(NUM_PLAYERS)
        .map(|id| Player::new(id, 0).name)
        .collect()
}
