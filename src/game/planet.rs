//! Planet and size-class types.

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Unique identifier for a planet. Doubles as its index in the world's arena.
pub type PlanetId = u32;

/// Size class of a planet. Each class has a fixed stat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetSize {
    /// Smallest class; also used for moons and home planets.
    Asteroid,
    /// Small planet.
    Small,
    /// Medium planet.
    Medium,
    /// Large planet, spawns a moon.
    Large,
    /// Giant planet, spawns a moon.
    Giant,
}

impl PlanetSize {
    /// All size classes in ascending order.
    pub const ALL: [PlanetSize; 5] = [
        PlanetSize::Asteroid,
        PlanetSize::Small,
        PlanetSize::Medium,
        PlanetSize::Large,
        PlanetSize::Giant,
    ];

    /// Drawn radius in pixels.
    #[must_use]
    pub const fn radius(self) -> f64 {
        match self {
            PlanetSize::Asteroid => 14.0,
            PlanetSize::Small => 22.0,
            PlanetSize::Medium => 32.0,
            PlanetSize::Large => 45.0,
            PlanetSize::Giant => 60.0,
        }
    }

    /// Unit capacity.
    #[must_use]
    pub const fn max_units(self) -> f64 {
        match self {
            PlanetSize::Asteroid => 60.0,
            PlanetSize::Small => 100.0,
            PlanetSize::Medium => 200.0,
            PlanetSize::Large => 350.0,
            PlanetSize::Giant => 600.0,
        }
    }

    /// Multiplier applied to the garrison when defending.
    #[must_use]
    pub const fn defense(self) -> f64 {
        match self {
            PlanetSize::Asteroid => 0.8,
            PlanetSize::Small => 1.0,
            PlanetSize::Medium => 1.2,
            PlanetSize::Large => 1.5,
            PlanetSize::Giant => 2.0,
        }
    }

    /// Multiplier applied to the base growth rate.
    #[must_use]
    pub const fn growth_rate(self) -> f64 {
        match self {
            PlanetSize::Asteroid => 0.6,
            PlanetSize::Small => 0.8,
            PlanetSize::Medium => 1.0,
            PlanetSize::Large => 1.3,
            PlanetSize::Giant => 1.6,
        }
    }

    /// Whether planets of this class get a moon at generation.
    #[must_use]
    pub const fn has_moon(self) -> bool {
        matches!(self, PlanetSize::Large | PlanetSize::Giant)
    }

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlanetSize::Asteroid => "asteroid",
            PlanetSize::Small => "small",
            PlanetSize::Medium => "medium",
            PlanetSize::Large => "large",
            PlanetSize::Giant => "giant",
        }
    }
}

/// Orbit of a moon around its parent planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Planet being orbited.
    pub parent: PlanetId,
    /// Current angle in radians.
    pub angle: f64,
    /// Distance from the parent's centre.
    pub radius: f64,
    /// Angular speed in radians per second (sign gives direction).
    pub speed: f64,
}

impl Orbit {
    /// Position on the orbit around a parent at `(px, py)`.
    #[must_use]
    pub fn position(&self, px: f64, py: f64) -> (f64, f64) {
        (
            px + self.radius * self.angle.cos(),
            py + self.radius * self.angle.sin(),
        )
    }

    /// Advance the orbit angle by `dt` seconds, kept within `[0, TAU)`.
    pub fn advance(&mut self, dt: f64) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(std::f64::consts::TAU);
    }
}

/// A planet in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    /// Identifier, equal to the planet's index in the arena.
    pub id: PlanetId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Size class.
    pub size: PlanetSize,
    /// Owning player (None = neutral).
    pub owner: Option<PlayerId>,
    /// Garrison, always within `[0, max_units]`.
    pub units: f64,
    /// Garrison capacity.
    pub max_units: f64,
    /// Defense multiplier.
    pub defense: f64,
    /// Growth multiplier.
    pub growth_rate: f64,
    /// Stability in `[0, 100]`.
    pub stability: f64,
    /// Whether a supply path to the owner's home exists.
    pub connected: bool,
    /// Present when this planet is a moon.
    pub orbit: Option<Orbit>,
}

impl Planet {
    /// Create a neutral, empty planet with the stats of `size`.
    #[must_use]
    pub fn new(id: PlanetId, size: PlanetSize, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            radius: size.radius(),
            size,
            owner: None,
            units: 0.0,
            max_units: size.max_units(),
            defense: size.defense(),
            growth_rate: size.growth_rate(),
            stability: 100.0,
            connected: false,
            orbit: None,
        }
    }

    /// Whether this planet is a moon.
    #[must_use]
    pub const fn is_moon(&self) -> bool {
        self.orbit.is_some()
    }

    /// Whether this planet is owned by `player`.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Garrison strength against an attacker.
    #[must_use]
    pub fn defense_strength(&self) -> f64 {
        self.units * self.defense
    }

    /// Fraction of capacity currently filled.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        if self.max_units > 0.0 {
            self.units / self.max_units
        } else {
            0.0
        }
    }

    /// Set the garrison, clamped to `[0, max_units]`.
    pub fn set_units(&mut self, units: f64) {
        self.units = units.clamp(0.0, self.max_units);
    }

    /// Drop ownership. The planet keeps its garrison.
    pub fn revert_to_neutral(&mut self) {
        self.owner = None;
        self.connected = false;
    }

    /// Distance between the centres of two planets.
    #[must_use]
    pub fn distance_to(&self, other: &Planet) -> f64 {
        distance(self.x, self.y, other.x, other.y)
    }
}

/// Euclidean distance between two points.
#[must_use]
#[inline]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_ordering() {
        assert!(PlanetSize::Asteroid < PlanetSize::Small);
        assert!(PlanetSize::Large < PlanetSize::Giant);
        let mut sorted = PlanetSize::ALL;
        sorted.sort();
        assert_eq!(sorted, PlanetSize::ALL);
    }

    #[test]
    fn test_stat_tables_grow_with_size() {
        for pair in PlanetSize::ALL.windows(2) {
            assert!(pair[0].radius() < pair[1].radius());
            assert!(pair[0].max_units() < pair[1].max_units());
            assert!(pair[0].growth_rate() < pair[1].growth_rate());
        }
    }

    #[test]
    fn test_only_large_and_giant_have_moons() {
        assert!(!PlanetSize::Asteroid.has_moon());
        assert!(!PlanetSize::Medium.has_moon());
        assert!(PlanetSize::Large.has_moon());
        assert!(PlanetSize::Giant.has_moon());
    }

    #[test]
    fn test_new_planet_uses_size_stats() {
        let planet = Planet::new(3, PlanetSize::Giant, 10.0, 20.0);
        assert_eq!(planet.id, 3);
        assert_eq!(planet.owner, None);
        assert!((planet.max_units - 600.0).abs() < f64::EPSILON);
        assert!((planet.defense - 2.0).abs() < f64::EPSILON);
        assert!(!planet.connected);
        assert!(!planet.is_moon());
    }

    #[test]
    fn test_set_units_clamps() {
        let mut planet = Planet::new(0, PlanetSize::Asteroid, 0.0, 0.0);
        planet.set_units(1000.0);
        assert!((planet.units - planet.max_units).abs() < f64::EPSILON);
        planet.set_units(-5.0);
        assert!(planet.units.abs() < f64::EPSILON);
    }

    #[test]
    fn test_revert_to_neutral_clears_connection() {
        let mut planet = Planet::new(0, PlanetSize::Small, 0.0, 0.0);
        planet.owner = Some(1);
        planet.connected = true;
        planet.units = 12.0;

        planet.revert_to_neutral();
        assert_eq!(planet.owner, None);
        assert!(!planet.connected);
        assert!((planet.units - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance() {
        assert!((distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-12);
        let a = Planet::new(0, PlanetSize::Small, 100.0, 100.0);
        let b = Planet::new(1, PlanetSize::Small, 100.0, 200.0);
        assert!((a.distance_to(&b) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_orbit_position_and_wrap() {
        let mut orbit = Orbit {
            parent: 0,
            angle: 0.0,
            radius: 50.0,
            speed: std::f64::consts::PI,
        };
        let (x, y) = orbit.position(100.0, 100.0);
        assert!((x - 150.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);

        orbit.advance(3.0);
        assert!(orbit.angle >= 0.0 && orbit.angle < std::f64::consts::TAU);
        assert!((orbit.angle - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_serialized_size_is_lowercase() {
        let json = serde_json::to_string(&PlanetSize::Large).unwrap();
        assert_eq!(json, "\"large\"");
        assert_eq!(PlanetSize::Large.name(), "large");
    }
}
