//! Seeded world generation.
//!
//! Produces the starting topology: primary planets placed by rejection
//! sampling, one moon per large or giant planet, cosmetic background stars,
//! and a home planet for each seat near its corner of the field.

// World generation uses intentional casts for counts and RNG ranges
#![allow(clippy::cast_precision_loss)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::WorldConfig;
use crate::game::{NUM_PLAYERS, Orbit, Planet, PlanetId, PlanetSize, Player, PlayerId, distance};

/// A cosmetic background star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Brightness in `[0, 1]`.
    pub brightness: f64,
    /// Drawn size in pixels.
    pub size: f64,
}

/// Everything world generation produces.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    /// Planets, indexed by id.
    pub planets: Vec<Planet>,
    /// One player per seat, ordered by id.
    pub players: Vec<Player>,
    /// Background stars.
    pub stars: Vec<Star>,
}

/// Generate a complete world from a seed.
///
/// Deterministic for a given `(seed, config)`. Planets that cannot be placed
/// within the attempt budget are skipped, so the planet count may fall short
/// of the configured total.
#[must_use]
pub fn generate_world(seed: u64, config: &WorldConfig) -> GeneratedWorld {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut planets = place_planets(config, &mut rng);
    let primaries = planets.len();
    spawn_moons(&mut planets, config, &mut rng);
    let stars = generate_stars(config, &mut rng);
    let players = assign_homes(&mut planets, config);

    tracing::info!(
        seed,
        primaries,
        moons = planets.len() - primaries,
        requested = config.planet_counts.total(),
        "world generated"
    );

    GeneratedWorld {
        planets,
        players,
        stars,
    }
}

/// Size classes in generation order with their requested counts.
fn generation_plan(config: &WorldConfig) -> [(PlanetSize, u32); 5] {
    let counts = config.planet_counts;
    [
        (PlanetSize::Asteroid, counts.asteroid),
        (PlanetSize::Small, counts.small),
        (PlanetSize::Medium, counts.medium),
        (PlanetSize::Large, counts.large),
        (PlanetSize::Giant, counts.giant),
    ]
}

/// Place primary planets with a minimum edge-to-edge separation.
fn place_planets(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Vec<Planet> {
    let mut planets: Vec<Planet> = Vec::with_capacity(config.planet_counts.total() as usize);
    let lo = config.edge_margin;
    let hi = config.size - config.edge_margin;

    for (size, count) in generation_plan(config) {
        for _ in 0..count {
            let radius = size.radius();
            let spot = (0..config.placement_attempts).find_map(|_| {
                let x = rng.random_range(lo..hi);
                let y = rng.random_range(lo..hi);
                let clear = planets.iter().all(|other| {
                    distance(x, y, other.x, other.y)
                        > radius + other.radius + config.separation_margin
                });
                clear.then_some((x, y))
            });

            let Some((x, y)) = spot else {
                tracing::debug!(size = size.name(), "no free slot, planet skipped");
                continue;
            };

            let mut planet = Planet::new(next_id(&planets), size, x, y);
            let fill = rng.random_range(config.neutral_fill_min..=config.neutral_fill_max);
            planet.units = (planet.max_units * fill).floor();
            planets.push(planet);
        }
    }

    planets
}

/// Give every large and giant planet one asteroid-class moon.
fn spawn_moons(planets: &mut Vec<Planet>, config: &WorldConfig, rng: &mut ChaCha8Rng) {
    let parents: Vec<(PlanetId, f64, f64, f64)> = planets
        .iter()
        .filter(|p| p.size.has_moon())
        .map(|p| (p.id, p.x, p.y, p.radius))
        .collect();

    for (parent, px, py, parent_radius) in parents {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let orbit = Orbit {
            parent,
            angle: rng.random_range(0.0..std::f64::consts::TAU),
            radius: parent_radius + rng.random_range(config.moon_orbit_min..=config.moon_orbit_max),
            speed: direction * rng.random_range(config.moon_speed_min..=config.moon_speed_max),
        };
        let (x, y) = orbit.position(px, py);

        let mut moon = Planet::new(next_id(planets), PlanetSize::Asteroid, x, y);
        let fill = rng.random_range(config.neutral_fill_min..=config.neutral_fill_max);
        moon.units = (moon.max_units * fill).floor();
        moon.orbit = Some(orbit);
        planets.push(moon);
    }
}

/// Scatter background stars over the field.
fn generate_stars(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Vec<Star> {
    (0..config.star_count)
        .map(|_| {
            let brightness: f64 = rng.random::<f64>().powi(2);
            Star {
                x: rng.random_range(0.0..config.size),
                y: rng.random_range(0.0..config.size),
                brightness,
                size: 0.5 + brightness * 1.5,
            }
        })
        .collect()
}

/// Corner anchor for each seat: top-left, top-right, bottom-left, bottom-right.
#[must_use]
pub fn corner_anchors(config: &WorldConfig) -> [(f64, f64); NUM_PLAYERS] {
    let near = config.corner_inset;
    let far = config.size - config.corner_inset;
    [(near, near), (far, near), (near, far), (far, far)]
}

/// Bind every seat to a home planet near its corner.
///
/// Prefers the nearest unclaimed asteroid within a quarter of the field,
/// then the nearest unclaimed small planet or asteroid anywhere. If the world
/// has neither, a fresh asteroid is created at the anchor.
fn assign_homes(planets: &mut Vec<Planet>, config: &WorldConfig) -> Vec<Player> {
    let search_radius = config.size / 4.0;
    let mut players = Vec::with_capacity(NUM_PLAYERS);

    for (seat, (ax, ay)) in corner_anchors(config).into_iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let player_id = seat as PlayerId;

        let unclaimed = |p: &&Planet| p.owner.is_none() && !p.is_moon();
        let nearest = |candidates: Vec<&Planet>| {
            candidates
                .into_iter()
                .min_by(|a, b| {
                    distance(ax, ay, a.x, a.y).total_cmp(&distance(ax, ay, b.x, b.y))
                })
                .map(|p| p.id)
        };

        let home = nearest(
            planets
                .iter()
                .filter(unclaimed)
                .filter(|p| p.size == PlanetSize::Asteroid)
                .filter(|p| distance(ax, ay, p.x, p.y) <= search_radius)
                .collect(),
        )
        .or_else(|| {
            nearest(
                planets
                    .iter()
                    .filter(unclaimed)
                    .filter(|p| p.size <= PlanetSize::Small)
                    .collect(),
            )
        })
        .unwrap_or_else(|| {
            tracing::debug!(player_id, "no home candidate, creating one at anchor");
            let id = next_id(planets);
            planets.push(Planet::new(id, PlanetSize::Asteroid, ax, ay));
            id
        });

        let planet = &mut planets[home as usize];
        planet.owner = Some(player_id);
        planet.units = config.home_start_units.min(planet.max_units);
        planet.stability = 100.0;
        planet.connected = true;

        let mut player = Player::new(player_id, home);
        player.total_units = planet.units;
        players.push(player);
    }

    players
}

/// Next id in the arena (ids are dense and monotonically increasing).
fn next_id(planets: &[Planet]) -> PlanetId {
    #[allow(clippy::cast_possible_truncation)]
    let id = planets.len() as PlanetId;
    id
}
