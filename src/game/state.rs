//! The simulation world: every piece of mutable game state and the frame step.

use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::game::ai::run_ai;
use crate::game::combat::{self, Attack};
use crate::game::economy::apply_stability_and_growth;
use crate::game::supply::recompute_supply;
use crate::game::worldgen::{Star, generate_world};
use crate::game::{EventQueue, Planet, PlanetId, Player, PlayerId, SimEvent};

/// A running game.
///
/// Owns the planet arena, players, attacks in flight, and the game clock.
/// All cross references are [`PlanetId`] lookups into the arena.
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    config: SimConfig,
    seed: u64,
    planets: Vec<Planet>,
    players: Vec<Player>,
    attacks: Vec<Attack>,
    stars: Vec<Star>,
    game_time: f64,
    last_supply: f64,
    last_ai: f64,
    next_attack_id: u64,
    events: EventQueue,
}

impl SimulationWorld {
    /// Generate a fresh world from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(seed: u64, config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut world = Self {
            config,
            seed,
            planets: Vec::new(),
            players: Vec::new(),
            attacks: Vec::new(),
            stars: Vec::new(),
            game_time: 0.0,
            last_supply: 0.0,
            last_ai: 0.0,
            next_attack_id: 0,
            events: EventQueue::default(),
        };
        world.init_game();
        Ok(world)
    }

    /// Build a world from hand-made planets and players.
    ///
    /// Planet and player ids must equal their indices, and every home and
    /// moon parent must exist. No stars are generated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation, or
    /// [`Error::InvalidWorld`] describing the first broken reference.
    pub fn from_parts(config: SimConfig, planets: Vec<Planet>, players: Vec<Player>) -> Result<Self> {
        config.validate()?;
        for (index, planet) in planets.iter().enumerate() {
            if planet.id as usize != index {
                return Err(Error::InvalidWorld(format!(
                    "planet at index {index} has id {}",
                    planet.id
                )));
            }
            if let Some(orbit) = &planet.orbit
                && orbit.parent as usize >= planets.len()
            {
                return Err(Error::InvalidWorld(format!(
                    "moon {} orbits unknown planet {}",
                    planet.id, orbit.parent
                )));
            }
        }
        for (index, player) in players.iter().enumerate() {
            if usize::from(player.id) != index {
                return Err(Error::InvalidWorld(format!(
                    "player at index {index} has id {}",
                    player.id
                )));
            }
            if player.home as usize >= planets.len() {
                return Err(Error::InvalidWorld(format!(
                    "player {} has unknown home {}",
                    player.id, player.home
                )));
            }
        }

        let mut world = Self {
            config,
            seed: 0,
            planets,
            players,
            attacks: Vec::new(),
            stars: Vec::new(),
            game_time: 0.0,
            last_supply: 0.0,
            last_ai: 0.0,
            next_attack_id: 0,
            events: EventQueue::default(),
        };
        world.recompute_aggregates();
        world.events.clear();
        recompute_supply(&mut world.planets, &mut world.players, world.config.supply.range);
        Ok(world)
    }

    /// Throw away all state and generate the world again from the seed.
    pub fn init_game(&mut self) {
        let generated = generate_world(self.seed, &self.config.world);
        self.planets = generated.planets;
        self.players = generated.players;
        self.stars = generated.stars;
        self.attacks.clear();
        self.events.clear();
        self.game_time = 0.0;
        self.last_supply = 0.0;
        self.last_ai = 0.0;
        self.next_attack_id = 0;

        recompute_supply(&mut self.planets, &mut self.players, self.config.supply.range);
        self.recompute_aggregates();
        self.events.clear();
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative or NaN steps count as zero; long steps are clamped to
    /// `simulation.max_dt`.
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_nan() || dt <= 0.0 {
            0.0
        } else {
            dt.min(self.config.simulation.max_dt)
        };
        self.game_time += dt;
        let now = self.game_time;

        self.advance_orbits(dt);

        apply_stability_and_growth(
            &mut self.planets,
            &self.players,
            &self.config.stability,
            &self.config.growth,
            dt,
            now,
            &mut self.events,
        );

        combat::advance_attacks(
            &mut self.attacks,
            &mut self.planets,
            &self.config.combat,
            self.config.stability.capture_stability,
            dt,
            now,
            &mut self.events,
        );

        self.recompute_aggregates();

        if now - self.last_supply >= self.config.supply.interval {
            self.last_supply = now;
            let lost =
                recompute_supply(&mut self.planets, &mut self.players, self.config.supply.range);
            for id in lost {
                self.record_elimination(id);
            }
        }

        if now - self.last_ai >= self.config.ai.interval {
            self.last_ai = now;
            run_ai(self);
        }
    }

    /// Send half the garrison of `from` towards `to`.
    ///
    /// Returns the attack id, or `None` when the command was ignored: same
    /// planet, unknown ids, neutral source, an eliminated owner, or fewer
    /// than two units.
    pub fn launch_attack(&mut self, from: PlanetId, to: PlanetId) -> Option<u64> {
        let owner = self.planet(from)?.owner?;
        if !self.player(owner).is_some_and(|p| p.alive) {
            return None;
        }

        let attack = combat::launch_attack(
            &mut self.planets,
            from,
            to,
            self.next_attack_id,
            &self.config.combat,
        )?;
        self.next_attack_id += 1;
        if let Some(player) = self.players.get_mut(usize::from(owner)) {
            player.total_units -= attack.units;
        }

        self.events.push(
            self.game_time,
            SimEvent::AttackLaunched {
                attack: attack.id,
                player: attack.owner,
                from,
                to,
                units: attack.units,
            },
        );
        let id = attack.id;
        self.attacks.push(attack);
        Some(id)
    }

    /// Mark a player eliminated, emitting an event on the transition.
    pub(crate) fn eliminate_player(&mut self, id: PlayerId) {
        if let Some(player) = self.players.get_mut(usize::from(id))
            && player.alive
        {
            player.eliminate();
            self.record_elimination(id);
        }
    }

    /// Log and emit the event for a player that was just eliminated.
    fn record_elimination(&mut self, id: PlayerId) {
        tracing::debug!(player = id, time = self.game_time, "player eliminated");
        self.events
            .push(self.game_time, SimEvent::PlayerEliminated { player: id });
    }

    /// Rebuild per-player counts and liveness from the planet arena.
    fn recompute_aggregates(&mut self) {
        for player in &mut self.players {
            player.planet_count = 0;
            player.total_units = 0.0;
        }
        for planet in &self.planets {
            if let Some(player) = planet
                .owner
                .and_then(|owner| self.players.get_mut(usize::from(owner)))
            {
                player.planet_count += 1;
                player.total_units += planet.units;
            }
        }

        let lost: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.alive)
            .filter(|p| {
                self.planets
                    .get(p.home as usize)
                    .is_none_or(|home| !home.is_owned_by(p.id))
            })
            .map(|p| p.id)
            .collect();
        for id in lost {
            self.eliminate_player(id);
        }
    }

    fn advance_orbits(&mut self, dt: f64) {
        for index in 0..self.planets.len() {
            let Some(mut orbit) = self.planets[index].orbit else {
                continue;
            };
            orbit.advance(dt);
            let Some(parent) = self.planets.get(orbit.parent as usize) else {
                continue;
            };
            let (x, y) = orbit.position(parent.x, parent.y);

            let moon = &mut self.planets[index];
            moon.orbit = Some(orbit);
            moon.x = x;
            moon.y = y;
        }
    }

    /// All planets, indexed by id.
    #[must_use]
    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// Look up a planet.
    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id as usize)
    }

    /// All players, indexed by id.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Attacks in flight, in launch order.
    #[must_use]
    pub fn attacks(&self) -> &[Attack] {
        &self.attacks
    }

    /// Current position of an attack in flight.
    #[must_use]
    pub fn attack_position(&self, attack: &Attack) -> Option<(f64, f64)> {
        let from = self.planet(attack.from)?;
        let to = self.planet(attack.to)?;
        Some(attack.position((from.x, from.y), (to.x, to.y)))
    }

    /// Background stars.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Seconds of simulated time since the last init.
    #[must_use]
    pub const fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Seed the world was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Distance between two planets' centres.
    #[must_use]
    pub fn distance(&self, a: PlanetId, b: PlanetId) -> Option<f64> {
        Some(self.planet(a)?.distance_to(self.planet(b)?))
    }

    /// The last player standing, if exactly one remains.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let mut alive = self.players.iter().filter(|p| p.alive);
        match (alive.next(), alive.next()) {
            (Some(player), None) => Some(player.id),
            _ => None,
        }
    }

    /// Whether at most one player is still alive.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.players.iter().filter(|p| p.alive).count() <= 1
    }

    /// Ranking score: ten points per planet plus every unit held.
    #[must_use]
    pub fn score(&self, id: PlayerId) -> f64 {
        self.player(id)
            .map_or(0.0, |p| f64::from(p.planet_count) * 10.0 + p.total_units)
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<(f64, SimEvent)> {
        self.events.drain()
    }

    #[cfg(test)]
    pub(crate) fn planets_mut(&mut self) -> &mut [Planet] {
        &mut self.planets
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
}
