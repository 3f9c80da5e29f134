//! Flat, serializable views of a running world.
//!
//! Snapshots are for renderers and tooling: they carry everything needed to
//! draw a frame or inspect a game, as plain JSON with ids as integers and
//! neutral owners as `null`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::{PlanetId, PlanetSize, PlayerId, SimulationWorld};

/// One planet as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetSnapshot {
    /// Planet id.
    pub id: PlanetId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Size class.
    pub size: PlanetSize,
    /// Owner, `null` when neutral.
    pub owner: Option<PlayerId>,
    /// Garrison.
    pub units: f64,
    /// Garrison capacity.
    pub max_units: f64,
    /// Stability in `[0, 100]`.
    pub stability: f64,
    /// Supplied from home.
    pub connected: bool,
    /// Parent planet for moons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PlanetId>,
    /// Orbit angle in radians for moons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_angle: Option<f64>,
    /// Orbit radius for moons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_radius: Option<f64>,
    /// Angular speed for moons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit_speed: Option<f64>,
}

/// One player's standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display colour.
    pub color: String,
    /// Home planet.
    pub home: PlanetId,
    /// Planets owned.
    pub planet_count: u32,
    /// Units across owned planets.
    pub total_units: f64,
    /// Still in the game.
    pub alive: bool,
}

/// One attack in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSnapshot {
    /// Attack id.
    pub id: u64,
    /// Launching player.
    pub owner: PlayerId,
    /// Source planet.
    pub from: PlanetId,
    /// Destination planet.
    pub to: PlanetId,
    /// Units in flight.
    pub units: f64,
    /// Travel progress in `[0, 1)`.
    pub progress: f64,
    /// Current horizontal position.
    pub x: f64,
    /// Current vertical position.
    pub y: f64,
}

/// Complete state of a world at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Seed the world was generated from.
    pub seed: u64,
    /// Simulated seconds.
    pub game_time: f64,
    /// Sole survivor, if any.
    pub winner: Option<PlayerId>,
    /// All planets by id.
    pub planets: Vec<PlanetSnapshot>,
    /// All players by id.
    pub players: Vec<PlayerSnapshot>,
    /// Attacks in launch order.
    pub attacks: Vec<AttackSnapshot>,
}

impl WorldSnapshot {
    /// Capture the current state of `world`.
    #[must_use]
    pub fn capture(world: &SimulationWorld) -> Self {
        let planets = world
            .planets()
            .iter()
            .map(|p| PlanetSnapshot {
                id: p.id,
                x: p.x,
                y: p.y,
                radius: p.radius,
                size: p.size,
                owner: p.owner,
                units: p.units,
                max_units: p.max_units,
                stability: p.stability,
                connected: p.connected,
                parent_id: p.orbit.map(|o| o.parent),
                orbit_angle: p.orbit.map(|o| o.angle),
                orbit_radius: p.orbit.map(|o| o.radius),
                orbit_speed: p.orbit.map(|o| o.speed),
            })
            .collect();

        let players = world
            .players()
            .iter()
            .map(|p| PlayerSnapshot {
                id: p.id,
                name: p.name.clone(),
                color: p.color.clone(),
                home: p.home,
                planet_count: p.planet_count,
                total_units: p.total_units,
                alive: p.alive,
            })
            .collect();

        let attacks = world
            .attacks()
            .iter()
            .map(|a| {
                let (x, y) = world.attack_position(a).unwrap_or_default();
                AttackSnapshot {
                    id: a.id,
                    owner: a.owner,
                    from: a.from,
                    to: a.to,
                    units: a.units,
                    progress: a.progress,
                    x,
                    y,
                }
            })
            .collect();

        Self {
            seed: world.seed(),
            game_time: world.game_time(),
            winner: world.winner(),
            planets,
            players,
            attacks,
        }
    }

    /// Encode as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
