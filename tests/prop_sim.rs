//! Property-based tests for the simulation rules.
//!
//! Run with: cargo test --release prop_sim

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use units::config::{CombatConfig, WorldConfig};
use units::game::combat::{efficiency, launch_attack};
use units::game::invariants::check_invariants;
use units::game::supply::recompute_supply;
use units::game::{NUM_PLAYERS, Planet, PlanetSize, generate_world};
use units::{SimConfig, SimulationWorld};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// Efficiency stays within its floor and one for any distance.
    #[test]
    fn prop_efficiency_bounded(dist in 0.0f64..10_000.0) {
        let config = CombatConfig::default();
        let e = efficiency(dist, &config);
        prop_assert!(e >= config.min_efficiency);
        prop_assert!(e <= 1.0);
    }

    /// A launch never sends more than the garrison held.
    #[test]
    fn prop_launch_within_garrison(units in 0.0f64..200.0, dist in 0.0f64..2000.0) {
        let config = CombatConfig::default();
        let mut source = Planet::new(0, PlanetSize::Medium, 0.0, 0.0);
        source.owner = Some(0);
        source.units = units;
        let mut planets = vec![source, Planet::new(1, PlanetSize::Small, dist, 0.0)];

        match launch_attack(&mut planets, 0, 1, 0, &config) {
            Some(attack) => {
                prop_assert!(units >= config.min_launch_units);
                prop_assert!(attack.units >= 1.0);
                prop_assert!(attack.units <= units);
                prop_assert!((planets[0].units + attack.units - units).abs() < 1e-9);
                prop_assert!(attack.speed.is_finite());
            }
            None => prop_assert!((planets[0].units - units).abs() < f64::EPSILON),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random step sizes and launches never break the world invariants.
    #[test]
    fn prop_updates_keep_invariants(
        seed in any::<u64>(),
        steps in prop::collection::vec((-1.0f64..2.0, any::<u32>(), any::<u32>()), 1..200)
    ) {
        let mut world = SimulationWorld::new(seed, SimConfig::default()).unwrap();
        let count = u32::try_from(world.planets().len()).unwrap();

        for (step, (dt, from, to)) in steps.into_iter().enumerate() {
            world.launch_attack(from % count, to % count);
            world.update(dt);

            let violations = check_invariants(&world);
            prop_assert!(violations.is_empty(), "step {}: {:?}", step, violations);
        }
    }

    /// Supply recomputation is idempotent and never connects neutral planets.
    #[test]
    fn prop_supply_idempotent(
        seed in any::<u64>(),
        owners in prop::collection::vec(prop::option::of(0u8..4), 64),
        range in 0.0f64..800.0
    ) {
        let generated = generate_world(seed, &WorldConfig::default());
        let mut planets = generated.planets;
        let mut players = generated.players;
        let homes: Vec<u32> = players.iter().map(|p| p.home).collect();

        for (planet, owner) in planets.iter_mut().zip(owners) {
            if !homes.contains(&planet.id) {
                planet.owner = owner;
            }
        }

        recompute_supply(&mut planets, &mut players, range);
        let first: Vec<bool> = planets.iter().map(|p| p.connected).collect();
        recompute_supply(&mut planets, &mut players, range);
        let second: Vec<bool> = planets.iter().map(|p| p.connected).collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(players.iter().filter(|p| p.alive).count(), NUM_PLAYERS);
        for planet in &planets {
            prop_assert!(planet.owner.is_some() || !planet.connected);
        }
        for home in homes {
            prop_assert!(planets[home as usize].connected);
        }
    }
}
