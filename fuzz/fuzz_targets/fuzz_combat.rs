#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use units::config::CombatConfig;
use units::game::combat::{Attack, resolve_arrival};
use units::game::{EventQueue, Planet, PlanetSize};

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Units in flight.
    attack_units: u16,
    /// Defender garrison.
    defender_units: u16,
    /// Defender size class index.
    defender_size: u8,
    /// Whether the defender is neutral.
    defender_neutral: bool,
    /// Whether the attacker already owns the target.
    friendly: bool,
    /// Horizontal gap between the planets.
    gap: u16,
}

fuzz_target!(|input: CombatInput| {
    let size = PlanetSize::ALL[usize::from(input.defender_size) % PlanetSize::ALL.len()];

    let mut source = Planet::new(0, PlanetSize::Small, 0.0, 0.0);
    source.owner = Some(0);

    let mut target = Planet::new(1, size, f64::from(input.gap), 0.0);
    target.set_units(f64::from(input.defender_units));
    target.owner = if input.friendly {
        Some(0)
    } else if input.defender_neutral {
        None
    } else {
        Some(1)
    };

    let mut planets = vec![source, target];
    let attack = Attack {
        id: 0,
        owner: 0,
        from: 0,
        to: 1,
        units: f64::from(input.attack_units),
        progress: 1.0,
        speed: 1.0,
    };

    let before = planets[1].clone();
    let mut events = EventQueue::default();
    resolve_arrival(&mut planets, &attack, &CombatConfig::default(), 50.0, 0.0, &mut events);

    let after = &planets[1];
    assert!(after.units >= 0.0 && after.units <= after.max_units);
    assert!(after.owner.is_some() || !after.connected);
    if after.owner != before.owner && after.owner == Some(0) {
        assert!(after.units >= 1.0);
    }
    assert!(!events.is_empty());
});
