// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! UNITS: a deterministic simulation core for a real-time space strategy game.
//!
//! Four players start on home planets in the corners of a procedurally
//! generated field. Planets grow units, send half their garrison at other
//! planets, and hold only while connected to home through a supply network.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (run / watch / tournament)    │
//! ├─────────────────────────────────────┤
//! │   Tournament runner   │  Snapshots  │
//! ├─────────────────────────────────────┤
//! │         SimulationWorld             │
//! │  supply · economy · combat · ai     │
//! ├─────────────────────────────────────┤
//! │   World generator (seeded ChaCha)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! The world is single-threaded and advanced with [`SimulationWorld::update`].
//! Games run through [`tournament::run_game`] share nothing, so callers can
//! run many of them in parallel.

pub mod config;
pub mod error;
pub mod game;
pub mod snapshot;
pub mod tournament;

pub use config::SimConfig;
pub use error::{Error, Result};

// Re-export key game types at crate root for convenience
pub use game::{
    Attack, Planet, PlanetId, PlanetSize, Player, PlayerId, SimEvent, SimulationWorld,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_is_send() {
        fn assert_send<T: Send + Clone>() {}
        assert_send::<SimulationWorld>();
    }
}
