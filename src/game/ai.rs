//! Scripted opponents.
//!
//! Every AI tick each scripted player scores the planets within reach of its
//! strong planets and launches the best couple of attacks. Neutral planets
//! are rated by how empty and how close they are; enemy planets only when the
//! expected arrival beats the garrison by a safety margin.

use std::cmp::Ordering;

use crate::config::{AiConfig, CombatConfig};
use crate::game::combat::{arriving_units, launch_size};
use crate::game::{HUMAN_PLAYER, Planet, PlanetId, PlanetSize, PlayerId, SimulationWorld};

/// A scored attack option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Planet the attack would launch from.
    pub from: PlanetId,
    /// Planet it would hit.
    pub to: PlanetId,
    /// Higher is better.
    pub score: f64,
}

/// Score a neutral target at `dist` pixels.
#[must_use]
pub fn score_neutral(target: &Planet, dist: f64, config: &AiConfig) -> f64 {
    let mut score = (1.0 - target.fill_ratio()) * 100.0 + (1.0 - dist / config.scan_radius) * 50.0;
    if matches!(target.size, PlanetSize::Large | PlanetSize::Giant) {
        score += config.big_target_bonus;
    }
    score
}

/// Score an enemy target, or `None` if the attack is not safely winnable.
#[must_use]
pub fn score_enemy(
    source: &Planet,
    target: &Planet,
    dist: f64,
    is_home: bool,
    ai: &AiConfig,
    combat: &CombatConfig,
) -> Option<f64> {
    let arriving = arriving_units(launch_size(source.units, combat), dist, combat);
    let defense = target.defense_strength();
    if arriving <= defense * ai.safety_margin {
        return None;
    }

    let mut score = 50.0 + (arriving - defense) + (1.0 - dist / ai.scan_radius) * 50.0;
    if is_home {
        score += ai.home_bonus;
    }
    Some(score)
}

/// Rank every attack option for `player`, best first.
///
/// `homes` lists each seat's home planet so home raids can be preferred.
/// Ties keep scan order.
#[must_use]
pub fn rank_candidates(
    planets: &[Planet],
    homes: &[PlanetId],
    player: PlayerId,
    ai: &AiConfig,
    combat: &CombatConfig,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for source in planets
        .iter()
        .filter(|p| p.is_owned_by(player) && p.units >= ai.min_source_units)
    {
        for target in planets.iter().filter(|p| !p.is_owned_by(player)) {
            let dist = source.distance_to(target);
            if dist > ai.scan_radius {
                continue;
            }

            let score = match target.owner {
                None => Some(score_neutral(target, dist, ai)),
                Some(enemy) => {
                    let is_home = homes.get(usize::from(enemy)) == Some(&target.id);
                    score_enemy(source, target, dist, is_home, ai, combat)
                }
            };

            if let Some(score) = score {
                candidates.push(Candidate {
                    from: source.id,
                    to: target.id,
                    score,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates
}

/// Run one decision round for every scripted player.
pub fn run_ai(world: &mut SimulationWorld) {
    let ai = world.config().ai;
    let combat = world.config().combat;
    let homes: Vec<PlanetId> = world.players().iter().map(|p| p.home).collect();

    let seats: Vec<PlayerId> = world
        .players()
        .iter()
        .filter(|p| p.alive && (p.id != HUMAN_PLAYER || ai.control_human))
        .map(|p| p.id)
        .collect();

    for player in seats {
        if !world.planets().iter().any(|p| p.is_owned_by(player)) {
            world.eliminate_player(player);
            continue;
        }

        let ranked = rank_candidates(world.planets(), &homes, player, &ai, &combat);
        let mut launched = 0;
        for candidate in ranked {
            if launched == ai.attacks_per_tick {
                break;
            }
            let ready = world
                .planet(candidate.from)
                .is_some_and(|p| p.is_owned_by(player) && p.units >= ai.min_source_units);
            if !ready {
                continue;
            }
            tracing::trace!(
                player,
                from = candidate.from,
                to = candidate.to,
                score = candidate.score,
                "ai launch"
            );
            if world.launch_attack(candidate.from, candidate.to).is_some() {
                launched += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::game::Player;

    fn planet(id: u32, size: PlanetSize, x: f64, owner: Option<u8>, units: f64) -> Planet {
        let mut p = Planet::new(id, size, x, 0.0);
        p.owner = owner;
        p.units = units;
        p
    }

    #[test]
    fn test_neutral_score_prefers_empty_close_big() {
        let ai = AiConfig::default();
        let empty_close = planet(0, PlanetSize::Giant, 0.0, None, 0.0);
        let full_far = planet(1, PlanetSize::Small, 0.0, None, 100.0);

        let a = score_neutral(&empty_close, 0.0, &ai);
        let b = score_neutral(&full_far, 600.0, &ai);
        assert!((a - 180.0).abs() < 1e-9);
        assert!(b.abs() < 1e-9);
    }

    #[test]
    fn test_enemy_requires_safety_margin() {
        let ai = AiConfig::default();
        let combat = CombatConfig::default();
        let source = planet(0, PlanetSize::Giant, 0.0, Some(1), 100.0);
        // 50 sent at 0px all arrive; defense 40 * 1.2 = 48 is beaten
        let weak = planet(1, PlanetSize::Small, 0.0, Some(2), 40.0);
        // 42 * 1.2 = 50.4 is not
        let strong = planet(2, PlanetSize::Small, 0.0, Some(2), 42.0);

        let score = score_enemy(&source, &weak, 0.0, false, &ai, &combat).unwrap();
        assert!((score - 110.0).abs() < 1e-9);
        assert!(score_enemy(&source, &strong, 0.0, false, &ai, &combat).is_none());

        let home_score = score_enemy(&source, &weak, 0.0, true, &ai, &combat).unwrap();
        assert!((home_score - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_weak_planets_are_never_sources() {
        // 39 units is one short of the source threshold
        let planets = vec![
            planet(0, PlanetSize::Medium, 0.0, Some(1), 39.0),
            planet(1, PlanetSize::Small, 100.0, None, 0.0),
        ];
        let ranked = rank_candidates(
            &planets,
            &[0, 0, 0, 0],
            1,
            &AiConfig::default(),
            &CombatConfig::default(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_targets_beyond_radius_ignored() {
        let planets = vec![
            planet(0, PlanetSize::Medium, 0.0, Some(1), 100.0),
            planet(1, PlanetSize::Small, 601.0, None, 0.0),
            planet(2, PlanetSize::Small, 600.0, None, 0.0),
        ];
        let ranked = rank_candidates(
            &planets,
            &[0, 0, 0, 0],
            1,
            &AiConfig::default(),
            &CombatConfig::default(),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].to, 2);
    }

    #[test]
    fn test_ranking_is_descending() {
        let planets = vec![
            planet(0, PlanetSize::Medium, 0.0, Some(1), 100.0),
            planet(1, PlanetSize::Small, 500.0, None, 80.0),
            planet(2, PlanetSize::Small, 100.0, None, 0.0),
            planet(3, PlanetSize::Large, 300.0, None, 0.0),
        ];
        let ranked = rank_candidates(
            &planets,
            &[0, 0, 0, 0],
            1,
            &AiConfig::default(),
            &CombatConfig::default(),
        );
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(ranked[0].to, 3);
    }

    fn duel_world() -> SimulationWorld {
        let mut planets = vec![
            planet(0, PlanetSize::Giant, 0.0, Some(1), 400.0),
            planet(1, PlanetSize::Small, 100.0, None, 0.0),
            planet(2, PlanetSize::Small, 200.0, None, 0.0),
            planet(3, PlanetSize::Small, 300.0, None, 0.0),
            planet(4, PlanetSize::Giant, 3000.0, Some(0), 30.0),
        ];
        planets[0].connected = true;
        planets[4].connected = true;
        let players = vec![Player::new(0, 4), Player::new(1, 0)];
        SimulationWorld::from_parts(SimConfig::default(), planets, players).unwrap()
    }

    #[test]
    fn test_run_ai_launches_at_most_two() {
        let mut world = duel_world();
        run_ai(&mut world);
        assert_eq!(world.attacks().len(), 2);
        assert!(world.attacks().iter().all(|a| a.owner == 1 && a.from == 0));
    }

    #[test]
    fn test_run_ai_rechecks_source_units() {
        // 60 units: one launch leaves 30, below the source threshold
        let world = duel_world();
        let mut planets = world.planets().to_vec();
        planets[0].units = 60.0;

        let mut world =
            SimulationWorld::from_parts(SimConfig::default(), planets, world.players().to_vec())
                .unwrap();
        run_ai(&mut world);
        assert_eq!(world.attacks().len(), 1);
        assert!((world.planets()[0].units - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_human_seat_left_alone_by_default() {
        let mut planets = vec![
            planet(0, PlanetSize::Giant, 0.0, Some(0), 400.0),
            planet(1, PlanetSize::Small, 100.0, None, 0.0),
        ];
        planets[0].connected = true;
        let players = vec![Player::new(0, 0)];

        let mut world =
            SimulationWorld::from_parts(SimConfig::default(), planets.clone(), players.clone())
                .unwrap();
        run_ai(&mut world);
        assert!(world.attacks().is_empty());

        let mut config = SimConfig::default();
        config.ai.control_human = true;
        let mut world = SimulationWorld::from_parts(config, planets, players).unwrap();
        run_ai(&mut world);
        assert_eq!(world.attacks().len(), 1);
    }
}
