//! Attacks in flight and combat resolution.
//!
//! Half of a planet's garrison is sent per launch. Units lose strength with
//! distance; on arrival they either reinforce a friendly planet or fight the
//! garrison, whose strength is scaled by the planet's defense multiplier.

use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::game::{EventQueue, Planet, PlanetId, PlayerId, SimEvent};

/// Shortest travel distance used for speed, so overlapping planets still take time.
const MIN_TRAVEL_DISTANCE: f64 = 1.0;

/// A group of units travelling between two planets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Monotonic identifier, also the resolution order.
    pub id: u64,
    /// Player that owned the source at launch.
    pub owner: PlayerId,
    /// Source planet.
    pub from: PlanetId,
    /// Destination planet.
    pub to: PlanetId,
    /// Units in flight, always integral.
    pub units: f64,
    /// Travel progress in `[0, 1)` while in flight.
    pub progress: f64,
    /// Progress per second.
    pub speed: f64,
}

impl Attack {
    /// Whether the attack has reached its destination.
    #[must_use]
    pub fn arrived(&self) -> bool {
        self.progress >= 1.0
    }

    /// Position along the straight line between two points.
    #[must_use]
    pub fn position(&self, from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
        let t = self.progress.clamp(0.0, 1.0);
        (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
    }
}

/// Fraction of units that survive a trip of `distance` pixels.
#[must_use]
pub fn efficiency(distance: f64, config: &CombatConfig) -> f64 {
    (1.0 - config.loss_per_100px * distance / 100.0).max(config.min_efficiency)
}

/// Units left after distance losses, rounded down.
#[must_use]
pub fn arriving_units(units: f64, distance: f64, config: &CombatConfig) -> f64 {
    (units * efficiency(distance, config)).floor()
}

/// Units a launch from a planet holding `units` would send.
#[must_use]
pub fn launch_size(units: f64, config: &CombatConfig) -> f64 {
    (units * config.launch_fraction).floor()
}

/// Take units off `from` and build the attack heading for `to`.
///
/// Returns `None` and leaves the planets untouched when the command is
/// invalid: same planet, unknown id, neutral source, or too few units.
pub fn launch_attack(
    planets: &mut [Planet],
    from: PlanetId,
    to: PlanetId,
    id: u64,
    config: &CombatConfig,
) -> Option<Attack> {
    if from == to {
        return None;
    }
    let target = planets.get(to as usize)?;
    let (tx, ty) = (target.x, target.y);

    let source = planets.get_mut(from as usize)?;
    let owner = source.owner?;
    if source.units < config.min_launch_units {
        return None;
    }

    let sent = launch_size(source.units, config);
    if sent <= 0.0 {
        return None;
    }
    source.set_units(source.units - sent);

    let dist = (tx - source.x).hypot(ty - source.y).max(MIN_TRAVEL_DISTANCE);
    Some(Attack {
        id,
        owner,
        from,
        to,
        units: sent,
        progress: 0.0,
        speed: config.attack_speed / dist,
    })
}

/// Apply an arrived attack to its destination.
pub fn resolve_arrival(
    planets: &mut [Planet],
    attack: &Attack,
    config: &CombatConfig,
    capture_stability: f64,
    now: f64,
    events: &mut EventQueue,
) {
    let Some(source) = planets.get(attack.from as usize) else {
        return;
    };
    let (sx, sy) = (source.x, source.y);
    let Some(target) = planets.get_mut(attack.to as usize) else {
        return;
    };

    let dist = (target.x - sx).hypot(target.y - sy);
    let arriving = arriving_units(attack.units, dist, config);

    if target.is_owned_by(attack.owner) {
        target.set_units(target.units + arriving);
        events.push(
            now,
            SimEvent::Reinforced {
                planet: target.id,
                player: attack.owner,
                units: arriving,
            },
        );
        return;
    }

    let previous = target.owner;
    let defense_strength = target.defense_strength();

    if arriving > defense_strength {
        target.owner = Some(attack.owner);
        target.set_units((arriving - defense_strength).floor().max(1.0));
        target.stability = capture_stability;
        target.connected = false;
        tracing::debug!(
            planet = target.id,
            player = attack.owner,
            ?previous,
            units = target.units,
            "planet captured"
        );
        events.push(
            now,
            SimEvent::PlanetCaptured {
                planet: target.id,
                player: attack.owner,
                previous,
            },
        );
        return;
    }

    let remaining = if target.defense > 0.0 {
        ((defense_strength - arriving) / target.defense).floor()
    } else {
        0.0
    };
    target.set_units(remaining);
    events.push(
        now,
        SimEvent::AttackRepelled {
            planet: target.id,
            attacker: attack.owner,
        },
    );

    if target.units <= 0.0 && previous.is_some() {
        target.revert_to_neutral();
        events.push(
            now,
            SimEvent::PlanetDepleted {
                planet: target.id,
                player: previous,
            },
        );
    }
}

/// Move every attack forward by `dt` and resolve the ones that arrive.
///
/// Attacks are processed in launch order, so two arrivals in the same tick
/// resolve first-launched-first.
pub fn advance_attacks(
    attacks: &mut Vec<Attack>,
    planets: &mut [Planet],
    config: &CombatConfig,
    capture_stability: f64,
    dt: f64,
    now: f64,
    events: &mut EventQueue,
) {
    attacks.retain_mut(|attack| {
        attack.progress += attack.speed * dt;
        if !attack.arrived() {
            return true;
        }
        resolve_arrival(planets, attack, config, capture_stability, now, events);
        false
    });
}
