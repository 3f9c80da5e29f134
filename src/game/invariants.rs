//! World invariants - sanity checks that detect bugs.
//!
//! The simulation clamps every quantity it touches, so these should NEVER
//! trigger. If they do, a rule is writing state it should not.

use crate::game::SimulationWorld;

/// Tolerance when comparing cached unit totals against a fresh sum.
pub const AGGREGATE_TOLERANCE: f64 = 1e-6;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &SimulationWorld) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for planet in world.planets() {
        if !(0.0..=planet.max_units).contains(&planet.units) {
            violations.push(InvariantViolation {
                message: format!(
                    "Planet {} has units {} outside [0, {}]",
                    planet.id, planet.units, planet.max_units
                ),
            });
        }

        if !(0.0..=100.0).contains(&planet.stability) {
            violations.push(InvariantViolation {
                message: format!(
                    "Planet {} has stability {} outside [0, 100]",
                    planet.id, planet.stability
                ),
            });
        }

        if planet.owner.is_none() && planet.connected {
            violations.push(InvariantViolation {
                message: format!("Neutral planet {} is marked connected", planet.id),
            });
        }
    }

    for attack in world.attacks() {
        if !(0.0..1.0).contains(&attack.progress) {
            violations.push(InvariantViolation {
                message: format!(
                    "Attack {} in flight with progress {}",
                    attack.id, attack.progress
                ),
            });
        }
    }

    for player in world.players() {
        let mut count = 0u32;
        let mut units = 0.0;
        for planet in world.planets().iter().filter(|p| p.is_owned_by(player.id)) {
            count += 1;
            units += planet.units;
        }

        if count != player.planet_count {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {} planet count {} but owns {}",
                    player.id, player.planet_count, count
                ),
            });
        }
        if (units - player.total_units).abs() > AGGREGATE_TOLERANCE * units.max(1.0) {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {} unit total {} but holds {}",
                    player.id, player.total_units, units
                ),
            });
        }

        let owns_home = world
            .planet(player.home)
            .is_some_and(|home| home.is_owned_by(player.id));
        if player.alive && !owns_home {
            violations.push(InvariantViolation {
                message: format!(
                    "Alive player {} does not own home {}",
                    player.id, player.home
                ),
            });
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &SimulationWorld) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &SimulationWorld) {}
