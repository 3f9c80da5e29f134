//! Headless game runner.
//!
//! Provides a pure function interface: `(seed, config) -> GameResult`.
//!
//! Every seat is driven by the scripted AI, the world is stepped at a fixed
//! `dt` until one player remains or the time limit is reached, and the
//! outcome is summarised per player. Games share nothing, so callers can run
//! many of them in parallel.

use std::cmp::Ordering;

use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::game::{PlayerId, SimEvent, SimulationWorld};

/// Configuration for headless games.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentConfig {
    /// Simulated seconds before the game is called.
    pub max_game_time: f64,
    /// Fixed step per update.
    pub dt: f64,
    /// Simulation tuning.
    pub sim: SimConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            max_game_time: 600.0,
            dt: 0.1,
            sim: SimConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Reject settings no game can run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the step or time limit is not
    /// positive, or the simulation config fails validation.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !(self.max_game_time.is_finite() && self.max_game_time > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_game_time must be positive, got {}",
                self.max_game_time
            )));
        }
        self.sim.validate()
    }
}

/// Statistics for a single player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Planets held at the end.
    pub planets: u32,
    /// Units held at the end.
    pub units: f64,
    /// Most planets held at once.
    pub peak_planets: u32,
    /// Planets taken by attack.
    pub captures: u32,
    /// Attacks launched.
    pub attacks_launched: u32,
    /// Game time of elimination (None if survived).
    pub eliminated_at: Option<f64>,
    /// Final score.
    pub final_score: f64,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    /// The last player standing (None if the time limit was reached first).
    pub winner: Option<PlayerId>,
    /// Final scores for all players.
    pub scores: Vec<f64>,
    /// Simulated seconds played.
    pub game_time: f64,
    /// Per-player statistics.
    pub player_stats: Vec<PlayerStats>,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<PlayerId>,
    /// The seed used for this game.
    pub seed: u64,
}

impl GameResult {
    /// Winner, or the highest scorer when the game timed out.
    #[must_use]
    pub fn leader(&self) -> Option<PlayerId> {
        if self.winner.is_some() {
            return self.winner;
        }
        self.player_stats
            .iter()
            .filter(|s| s.eliminated_at.is_none())
            .max_by(|a, b| {
                a.final_score
                    .partial_cmp(&b.final_score)
                    .unwrap_or(Ordering::Equal)
            })
            .map(|s| s.player_id)
    }
}

/// Run a complete game.
///
/// # Arguments
///
/// * `seed` - Random seed for deterministic world generation
/// * `config` - Tournament configuration
///
/// # Errors
///
/// Returns an error if [`TournamentConfig::validate`] fails.
pub fn run_game(seed: u64, config: &TournamentConfig) -> Result<GameResult> {
    play_game(seed, config).map(|(result, _)| result)
}

/// Run a complete game and keep the final world for inspection.
///
/// # Errors
///
/// Same as [`run_game`].
pub fn play_game(seed: u64, config: &TournamentConfig) -> Result<(GameResult, SimulationWorld)> {
    config.validate()?;
    let mut sim = config.sim.clone();
    sim.ai.control_human = true;

    let mut world = SimulationWorld::new(seed, sim)?;
    let mut stats: Vec<PlayerStats> = world
        .players()
        .iter()
        .map(|p| PlayerStats {
            player_id: p.id,
            planets: p.planet_count,
            units: p.total_units,
            peak_planets: p.planet_count,
            captures: 0,
            attacks_launched: 0,
            eliminated_at: None,
            final_score: 0.0,
        })
        .collect();
    let mut elimination_order = Vec::new();

    while !world.is_game_over() && world.game_time() < config.max_game_time {
        world.update(config.dt);

        for (time, event) in world.drain_events() {
            match event {
                SimEvent::AttackLaunched { player, .. } => {
                    if let Some(s) = stats.get_mut(usize::from(player)) {
                        s.attacks_launched += 1;
                    }
                }
                SimEvent::PlanetCaptured { player, .. } => {
                    if let Some(s) = stats.get_mut(usize::from(player)) {
                        s.captures += 1;
                    }
                }
                SimEvent::PlayerEliminated { player } => {
                    if let Some(s) = stats.get_mut(usize::from(player)) {
                        s.eliminated_at = Some(time);
                    }
                    elimination_order.push(player);
                }
                _ => {}
            }
        }

        for (s, p) in stats.iter_mut().zip(world.players()) {
            s.peak_planets = s.peak_planets.max(p.planet_count);
        }
    }

    for (s, p) in stats.iter_mut().zip(world.players()) {
        s.planets = p.planet_count;
        s.units = p.total_units;
        s.final_score = world.score(p.id);
    }

    let result = GameResult {
        winner: world.winner(),
        scores: stats.iter().map(|s| s.final_score).collect(),
        game_time: world.game_time(),
        player_stats: stats,
        elimination_order,
        seed,
    };
    tracing::debug!(
        seed,
        winner = ?result.winner,
        game_time = result.game_time,
        "game finished"
    );
    Ok((result, world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::NUM_PLAYERS;

    fn short_config() -> TournamentConfig {
        TournamentConfig {
            max_game_time: 30.0,
            ..TournamentConfig::default()
        }
    }

    #[test]
    fn test_run_game_is_deterministic() {
        let a = run_game(12345, &short_config()).unwrap();
        let b = run_game(12345, &short_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_result_covers_every_seat() {
        let result = run_game(1, &short_config()).unwrap();
        assert_eq!(result.scores.len(), NUM_PLAYERS);
        assert_eq!(result.player_stats.len(), NUM_PLAYERS);
        assert_eq!(result.seed, 1);
        assert!(result.game_time <= 30.0 + 0.1 + 1e-9);
    }

    #[test]
    fn test_scripted_seats_attack() {
        let result = run_game(3, &short_config()).unwrap();
        assert!(result.player_stats.iter().any(|s| s.attacks_launched > 0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = short_config();
        config.sim.world.size = -1.0;
        assert!(run_game(0, &config).is_err());

        let config = TournamentConfig {
            dt: 0.0,
            ..short_config()
        };
        assert!(matches!(run_game(0, &config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_catches_time_limit() {
        assert!(TournamentConfig::default().validate().is_ok());
        let config = TournamentConfig {
            max_game_time: 0.0,
            ..TournamentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_game_time"));
    }

    #[test]
    fn test_leader_falls_back_to_score() {
        let result = GameResult {
            winner: None,
            scores: vec![10.0, 50.0],
            game_time: 1.0,
            player_stats: vec![
                PlayerStats {
                    player_id: 0,
                    planets: 1,
                    units: 0.0,
                    peak_planets: 1,
                    captures: 0,
                    attacks_launched: 0,
                    eliminated_at: None,
                    final_score: 10.0,
                },
                PlayerStats {
                    player_id: 1,
                    planets: 4,
                    units: 10.0,
                    peak_planets: 4,
                    captures: 3,
                    attacks_launched: 3,
                    eliminated_at: None,
                    final_score: 50.0,
                },
            ],
            elimination_order: Vec::new(),
            seed: 0,
        };
        assert_eq!(result.leader(), Some(1));
    }
}
