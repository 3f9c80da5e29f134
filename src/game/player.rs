//! Player state management.

use crate::game::PlanetId;

/// Unique identifier for a player. Seat 0 is the human.
pub type PlayerId = u8;

/// Seat of the human player.
pub const HUMAN_PLAYER: PlayerId = 0;

/// Number of seats in a game.
pub const NUM_PLAYERS: usize = 4;

/// Display names by seat.
const NAMES: [&str; NUM_PLAYERS] = ["You", "Crimson Dominion", "Azure Collective", "Verdant Swarm"];

/// Display colours by seat.
const COLORS: [&str; NUM_PLAYERS] = ["#00d4ff", "#ff4d4d", "#b36bff", "#5cff7a"];

/// State for a single player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Seat identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display colour as a hex string.
    pub color: String,
    /// Home planet. Losing it eliminates the player.
    pub home: PlanetId,
    /// Planets owned, rebuilt every tick.
    pub planet_count: u32,
    /// Units across owned planets, rebuilt every tick.
    pub total_units: f64,
    /// Whether the player still holds its home planet.
    pub alive: bool,
}

impl Player {
    /// Create a player for `id` anchored at `home`, with the seat's identity.
    #[must_use]
    pub fn new(id: PlayerId, home: PlanetId) -> Self {
        let seat = usize::from(id) % NUM_PLAYERS;
        Self {
            id,
            name: NAMES[seat].to_string(),
            color: COLORS[seat].to_string(),
            home,
            planet_count: 1,
            total_units: 0.0,
            alive: true,
        }
    }

    /// Whether this seat is driven by the script by default.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        self.id != HUMAN_PLAYER
    }

    /// Eliminate this player. Elimination is permanent.
    pub fn eliminate(&mut self) {
        self.alive = false;
    }
}
