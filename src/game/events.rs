//! Notifications emitted by the simulation.
//!
//! The world queues events as state changes happen; renderers and runners
//! drain them once per frame. The queue is bounded so a caller that never
//! drains cannot grow it without limit.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::{PlanetId, PlayerId};

/// Events kept before the oldest ones are discarded.
pub const MAX_PENDING_EVENTS: usize = 4096;

/// A single notable state change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// Units left a planet.
    AttackLaunched {
        /// Attack identifier.
        attack: u64,
        /// Launching player.
        player: PlayerId,
        /// Source planet.
        from: PlanetId,
        /// Destination planet.
        to: PlanetId,
        /// Units in flight.
        units: f64,
    },
    /// Units arrived at a friendly planet.
    Reinforced {
        /// Destination planet.
        planet: PlanetId,
        /// Owning player.
        player: PlayerId,
        /// Units that arrived after distance losses.
        units: f64,
    },
    /// An attack took a planet.
    PlanetCaptured {
        /// Captured planet.
        planet: PlanetId,
        /// New owner.
        player: PlayerId,
        /// Previous owner (None = neutral).
        previous: Option<PlayerId>,
    },
    /// An attack failed against the garrison.
    AttackRepelled {
        /// Defended planet.
        planet: PlanetId,
        /// Attacking player.
        attacker: PlayerId,
    },
    /// Stability reached zero and the planet went neutral.
    PlanetCollapsed {
        /// Lost planet.
        planet: PlanetId,
        /// Former owner.
        player: PlayerId,
    },
    /// The garrison reached zero and the planet went neutral.
    PlanetDepleted {
        /// Lost planet.
        planet: PlanetId,
        /// Former owner (None if it was already neutral).
        player: Option<PlayerId>,
    },
    /// A player lost its home planet.
    PlayerEliminated {
        /// Eliminated player.
        player: PlayerId,
    },
}

/// Bounded FIFO of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<(f64, SimEvent)>,
}

impl EventQueue {
    /// Queue an event stamped with the game time it happened at.
    pub fn push(&mut self, time: f64, event: SimEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        tracing::debug!(time, ?event, "sim event");
        self.events.push_back((time, event));
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<(f64, SimEvent)> {
        self.events.drain(..).collect()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_in_order() {
        let mut queue = EventQueue::default();
        queue.push(1.0, SimEvent::PlayerEliminated { player: 1 });
        queue.push(2.0, SimEvent::PlayerEliminated { player: 2 });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].1, SimEvent::PlayerEliminated { player: 1 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = EventQueue::default();
        for i in 0..(MAX_PENDING_EVENTS + 10) {
            #[allow(clippy::cast_precision_loss)]
            queue.push(i as f64, SimEvent::PlayerEliminated { player: 1 });
        }
        assert_eq!(queue.len(), MAX_PENDING_EVENTS);

        let drained = queue.drain();
        assert!((drained[0].0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = SimEvent::PlanetCaptured {
            planet: 4,
            player: 2,
            previous: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"planet_captured\""));
        assert!(json.contains("\"previous\":null"));
    }
}
