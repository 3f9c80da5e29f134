//! Game layer for UNITS.
//!
//! Implements the simulation rules:
//! - Planets with size classes, garrisons, and orbiting moons
//! - Players anchored to a home planet
//! - Supply network connectivity
//! - Stability and unit growth
//! - Attack travel and combat resolution
//! - Scripted opponents

pub mod ai;
pub mod combat;
pub mod economy;
mod events;
pub mod invariants;
mod planet;
mod player;
mod state;
pub mod supply;
pub mod worldgen;

pub use combat::Attack;
pub use events::{EventQueue, MAX_PENDING_EVENTS, SimEvent};
pub use planet::{Orbit, Planet, PlanetId, PlanetSize, distance};
pub use player::{HUMAN_PLAYER, NUM_PLAYERS, Player, PlayerId};
pub use state::SimulationWorld;
pub use worldgen::{GeneratedWorld, Star, generate_world};
