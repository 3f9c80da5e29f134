#![no_main]

//! Frame step fuzzer.
//!
//! Interleaves launch commands with updates of arbitrary length on a
//! generated world, then checks the world invariants.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use units::game::invariants::check_invariants;
use units::{SimConfig, SimulationWorld};

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    /// Send half a garrison.
    Launch { from: u8, to: u8 },
    /// Advance the clock by `millis` milliseconds.
    Step { millis: u16 },
    /// Advance by a raw float, including NaN and negatives.
    RawStep { dt: f64 },
}

/// Structured input for frame fuzzing.
#[derive(Arbitrary, Debug)]
struct TickInput {
    /// World seed.
    seed: u64,
    /// Let the script drive every seat.
    control_human: bool,
    /// Actions to apply in order.
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: TickInput| {
    let mut config = SimConfig::default();
    config.ai.control_human = input.control_human;
    let Ok(mut world) = SimulationWorld::new(input.seed, config) else {
        return;
    };
    let count = u32::try_from(world.planets().len()).unwrap_or(1).max(1);

    for action in input.actions.into_iter().take(2000) {
        match action {
            FuzzAction::Launch { from, to } => {
                world.launch_attack(u32::from(from) % count, u32::from(to) % count);
            }
            FuzzAction::Step { millis } => world.update(f64::from(millis) / 1000.0),
            FuzzAction::RawStep { dt } => world.update(dt),
        }
    }

    let violations = check_invariants(&world);
    assert!(violations.is_empty(), "{violations:?}");
});
