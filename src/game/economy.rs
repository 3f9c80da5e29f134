//! Stability and growth: the per-tick numeric model for owned planets.
//!
//! # Stability
//!
//! Each planet chases a target:
//!
//! ```text
//! target = 100 - distance_penalty * dist_home / distance_step
//!              - empire_penalty * max(0, planets - empire_threshold)
//! target = min(target, disconnected_cap)      if disconnected
//! ```
//!
//! Below target it recovers at `recovery_rate`; above target it decays at
//! `decay_rate`. At zero the planet goes neutral and loses most of its units.
//!
//! # Growth
//!
//! `base_rate * planet.growth_rate`, banded by stability, slowed by empire
//! size, and forced negative while disconnected.

use crate::config::{GrowthConfig, StabilityConfig};
use crate::game::{EventQueue, Planet, Player, SimEvent, distance};

/// Inputs that do not depend on the planet itself.
#[derive(Debug, Clone, Copy)]
pub struct EmpireContext {
    /// Position of the owner's home planet.
    pub home: (f64, f64),
    /// Planets the owner holds.
    pub planet_count: u32,
}

/// What a single planet tick did to ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetOutcome {
    /// Still owned.
    Held,
    /// Stability hit zero.
    Collapsed,
    /// Units hit zero.
    Depleted,
}

/// Stability the planet is moving towards.
#[must_use]
pub fn target_stability(
    planet: &Planet,
    empire: &EmpireContext,
    config: &StabilityConfig,
) -> f64 {
    let dist_home = distance(planet.x, planet.y, empire.home.0, empire.home.1);
    let excess = empire.planet_count.saturating_sub(config.empire_threshold);

    let mut target = 100.0
        - config.distance_penalty * dist_home / config.distance_step
        - config.empire_penalty * f64::from(excess);
    if !planet.connected {
        target = target.min(config.disconnected_cap);
    }
    target.clamp(0.0, 100.0)
}

/// Move `current` towards `target`: fast recovery, slow decay.
#[must_use]
pub fn step_stability(current: f64, target: f64, dt: f64, config: &StabilityConfig) -> f64 {
    let next = if current < target {
        (current + config.recovery_rate * dt).min(target)
    } else {
        (current - config.decay_rate * dt).max(target)
    };
    next.clamp(0.0, 100.0)
}

/// Multiplier for empires beyond the slow-growth threshold.
#[must_use]
pub fn empire_growth_factor(planet_count: u32, config: &GrowthConfig) -> f64 {
    let excess = planet_count.saturating_sub(config.slow_threshold);
    (1.0 - config.slow_penalty_per_planet * f64::from(excess)).max(config.min_factor)
}

/// Units per second for an owned planet.
#[must_use]
pub fn growth_per_second(planet: &Planet, planet_count: u32, config: &GrowthConfig) -> f64 {
    let nominal = config.base_rate * planet.growth_rate;

    let mut growth = if planet.stability < config.low_stability {
        -config.unstable_decay
    } else if planet.stability <= config.high_stability {
        nominal * config.mid_band_factor
    } else {
        nominal
    };

    if growth > 0.0 {
        growth *= empire_growth_factor(planet_count, config);
    }
    if !planet.connected {
        growth = growth.min(-config.disconnected_drain);
    }
    growth
}

/// Advance one owned planet by `dt` seconds.
pub fn tick_planet(
    planet: &mut Planet,
    empire: &EmpireContext,
    stability: &StabilityConfig,
    growth: &GrowthConfig,
    dt: f64,
) -> PlanetOutcome {
    let target = target_stability(planet, empire, stability);
    planet.stability = step_stability(planet.stability, target, dt, stability);

    if planet.stability <= 0.0 {
        planet.stability = 0.0;
        planet.set_units(planet.units * (1.0 - stability.collapse_unit_loss));
        planet.revert_to_neutral();
        return PlanetOutcome::Collapsed;
    }

    let rate = growth_per_second(planet, empire.planet_count, growth);
    planet.set_units(planet.units + rate * dt);

    if planet.units <= 0.0 {
        planet.revert_to_neutral();
        return PlanetOutcome::Depleted;
    }
    PlanetOutcome::Held
}

/// Apply stability and growth to every planet owned by a living player.
///
/// Neutral planets and planets of eliminated players are left untouched.
pub fn apply_stability_and_growth(
    planets: &mut [Planet],
    players: &[Player],
    stability: &StabilityConfig,
    growth: &GrowthConfig,
    dt: f64,
    now: f64,
    events: &mut EventQueue,
) {
    let contexts: Vec<Option<EmpireContext>> = players
        .iter()
        .map(|player| {
            let home = planets.get(player.home as usize)?;
            player.alive.then_some(EmpireContext {
                home: (home.x, home.y),
                planet_count: player.planet_count,
            })
        })
        .collect();

    for planet in planets.iter_mut() {
        let Some(owner) = planet.owner else {
            continue;
        };
        let Some(Some(empire)) = contexts.get(usize::from(owner)) else {
            continue;
        };

        match tick_planet(planet, empire, stability, growth, dt) {
            PlanetOutcome::Held => {}
            PlanetOutcome::Collapsed => events.push(
                now,
                SimEvent::PlanetCollapsed {
                    planet: planet.id,
                    player: owner,
                },
            ),
            PlanetOutcome::Depleted => events.push(
                now,
                SimEvent::PlanetDepleted {
                    planet: planet.id,
                    player: Some(owner),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlanetSize;

    fn owned_planet(x: f64, connected: bool) -> Planet {
        let mut planet = Planet::new(0, PlanetSize::Medium, x, 0.0);
        planet.owner = Some(0);
        planet.units = 50.0;
        planet.connected = connected;
        planet
    }

    fn empire(planet_count: u32) -> EmpireContext {
        EmpireContext {
            home: (0.0, 0.0),
            planet_count,
        }
    }

    #[test]
    fn test_target_at_home_is_full() {
        let planet = owned_planet(0.0, true);
        let target = target_stability(&planet, &empire(1), &StabilityConfig::default());
        assert!((target - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_distance_penalty() {
        // 3 stability per 200px: 1000px away costs 15
        let planet = owned_planet(1000.0, true);
        let target = target_stability(&planet, &empire(1), &StabilityConfig::default());
        assert!((target - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_empire_penalty() {
        // 13 planets with threshold 10 costs 9
        let planet = owned_planet(0.0, true);
        let target = target_stability(&planet, &empire(13), &StabilityConfig::default());
        assert!((target - 91.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_disconnected_cap() {
        let planet = owned_planet(0.0, false);
        let target = target_stability(&planet, &empire(1), &StabilityConfig::default());
        assert!((target - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_never_negative() {
        let planet = owned_planet(100_000.0, true);
        let target = target_stability(&planet, &empire(100), &StabilityConfig::default());
        assert!(target.abs() < 1e-9);
    }

    #[test]
    fn test_stability_recovers_faster_than_it_decays() {
        let config = StabilityConfig::default();
        assert!((step_stability(50.0, 100.0, 1.0, &config) - 55.0).abs() < 1e-9);
        assert!((step_stability(50.0, 0.0, 1.0, &config) - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_does_not_overshoot_target() {
        let config = StabilityConfig::default();
        assert!((step_stability(98.0, 100.0, 1.0, &config) - 100.0).abs() < 1e-9);
        assert!((step_stability(21.0, 20.0, 1.0, &config) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_disconnected_decay_scenario() {
        // Target 15 (disconnected), stability 80: after 5 seconds at 2/sec it is 70
        let config = StabilityConfig::default();
        let mut stability = 80.0;
        for _ in 0..50 {
            stability = step_stability(stability, 15.0, 0.1, &config);
        }
        assert!((stability - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_bands() {
        let config = GrowthConfig::default();
        let mut planet = owned_planet(0.0, true);

        planet.stability = 90.0;
        assert!((growth_per_second(&planet, 1, &config) - 1.0).abs() < 1e-9);

        planet.stability = 50.0;
        assert!((growth_per_second(&planet, 1, &config) - 0.3).abs() < 1e-9);

        planet.stability = 29.9;
        assert!((growth_per_second(&planet, 1, &config) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empire_growth_factor_floor() {
        let config = GrowthConfig::default();
        assert!((empire_growth_factor(8, &config) - 1.0).abs() < 1e-9);
        assert!((empire_growth_factor(12, &config) - 0.8).abs() < 1e-9);
        assert!((empire_growth_factor(200, &config) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_disconnected_growth_is_negative() {
        let config = GrowthConfig::default();
        let mut planet = owned_planet(0.0, false);
        planet.stability = 100.0;
        assert!(growth_per_second(&planet, 1, &config) < 0.0);
    }

    #[test]
    fn test_collapse_reverts_and_costs_units() {
        // 90 planets over the threshold drive the target to zero
        let mut planet = owned_planet(0.0, false);
        planet.stability = 0.5;
        planet.units = 100.0;

        let outcome = tick_planet(
            &mut planet,
            &empire(100),
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            1.0,
        );
        assert_eq!(outcome, PlanetOutcome::Collapsed);
        assert_eq!(planet.owner, None);
        assert!((planet.units - 30.0).abs() < 1e-9);
        assert!(planet.stability.abs() < f64::EPSILON);
    }

    #[test]
    fn test_depletion_reverts_to_neutral() {
        let mut planet = owned_planet(0.0, true);
        planet.stability = 10.0;
        planet.units = 0.05;

        let outcome = tick_planet(
            &mut planet,
            &empire(1),
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            0.1,
        );
        assert_eq!(outcome, PlanetOutcome::Depleted);
        assert_eq!(planet.owner, None);
        assert!(planet.units.abs() < f64::EPSILON);
    }

    #[test]
    fn test_units_capped_at_max() {
        let mut planet = owned_planet(0.0, true);
        planet.units = planet.max_units;

        tick_planet(
            &mut planet,
            &empire(1),
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            0.1,
        );
        assert!((planet.units - planet.max_units).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dead_player_planets_frozen() {
        let mut planets = vec![owned_planet(0.0, true)];
        planets[0].stability = 50.0;
        let mut player = Player::new(0, 0);
        player.eliminate();
        let mut events = EventQueue::default();

        apply_stability_and_growth(
            &mut planets,
            &[player],
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            0.1,
            0.0,
            &mut events,
        );
        assert!((planets[0].stability - 50.0).abs() < f64::EPSILON);
        assert!((planets[0].units - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_neutral_planets_do_not_grow() {
        let mut planet = Planet::new(0, PlanetSize::Giant, 0.0, 0.0);
        planet.units = 10.0;
        let mut planets = vec![planet];
        let mut events = EventQueue::default();

        apply_stability_and_growth(
            &mut planets,
            &[],
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            0.1,
            0.0,
            &mut events,
        );
        assert!((planets[0].units - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collapse_emits_event() {
        let mut planets = vec![owned_planet(0.0, false)];
        planets[0].stability = 0.1;
        let mut players = vec![Player::new(0, 0)];
        players[0].planet_count = 100;
        let mut events = EventQueue::default();

        apply_stability_and_growth(
            &mut planets,
            &players,
            &StabilityConfig::default(),
            &GrowthConfig::default(),
            0.1,
            3.0,
            &mut events,
        );
        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(
            drained[0].1,
            SimEvent::PlanetCollapsed { planet: 0, player: 0 }
        );
    }
}
