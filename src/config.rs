//! Simulation tuning with defaults and RON persistence.
//!
//! Every constant the simulation uses lives here so balance changes never
//! touch game code. Sections use `#[serde(default)]`, so a config file only
//! needs the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default file name written by `init-config`.
pub const CONFIG_FILE_NAME: &str = "units.ron";

/// Top-level simulation configuration.
// Large enough that moves and explicit clones read better than implicit copies
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// World generation.
    pub world: WorldConfig,
    /// Supply network.
    pub supply: SupplyConfig,
    /// Stability model.
    pub stability: StabilityConfig,
    /// Unit growth model.
    pub growth: GrowthConfig,
    /// Attack travel and combat.
    pub combat: CombatConfig,
    /// Scripted opponents.
    pub ai: AiConfig,
    /// Frame stepping.
    pub simulation: SimulationConfig,
}

/// Number of planets to generate per size class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanetCounts {
    /// Asteroid-class planets.
    pub asteroid: u32,
    /// Small planets.
    pub small: u32,
    /// Medium planets.
    pub medium: u32,
    /// Large planets (each gets a moon).
    pub large: u32,
    /// Giant planets (each gets a moon).
    pub giant: u32,
}

impl Default for PlanetCounts {
    fn default() -> Self {
        Self {
            asteroid: 30,
            small: 25,
            medium: 15,
            large: 7,
            giant: 3,
        }
    }
}

impl PlanetCounts {
    /// Total number of primary planets requested.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.asteroid + self.small + self.medium + self.large + self.giant
    }
}

/// World generation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square field in pixels.
    pub size: f64,
    /// Planets per size class.
    pub planet_counts: PlanetCounts,
    /// Extra gap required between two planet edges.
    pub separation_margin: f64,
    /// Placement attempts before a planet is dropped.
    pub placement_attempts: u32,
    /// Planets are kept this far from the field edges.
    pub edge_margin: f64,
    /// Lower bound of a neutral planet's starting fill ratio.
    pub neutral_fill_min: f64,
    /// Upper bound of a neutral planet's starting fill ratio.
    pub neutral_fill_max: f64,
    /// Minimum gap between a parent's surface and its moon's orbit.
    pub moon_orbit_min: f64,
    /// Maximum gap between a parent's surface and its moon's orbit.
    pub moon_orbit_max: f64,
    /// Slowest moon angular speed, radians per second.
    pub moon_speed_min: f64,
    /// Fastest moon angular speed, radians per second.
    pub moon_speed_max: f64,
    /// Cosmetic background stars.
    pub star_count: u32,
    /// Distance of each corner anchor from both field edges.
    pub corner_inset: f64,
    /// Units on each home planet at game start.
    pub home_start_units: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 4000.0,
            planet_counts: PlanetCounts::default(),
            separation_margin: 50.0,
            placement_attempts: 100,
            edge_margin: 100.0,
            neutral_fill_min: 0.1,
            neutral_fill_max: 0.4,
            moon_orbit_min: 30.0,
            moon_orbit_max: 60.0,
            moon_speed_min: 0.1,
            moon_speed_max: 0.4,
            star_count: 400,
            corner_inset: 300.0,
            home_start_units: 30.0,
        }
    }
}

/// Supply network settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupplyConfig {
    /// Maximum hop distance between two connected planets.
    pub range: f64,
    /// Seconds of game time between recomputations.
    pub interval: f64,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            range: 350.0,
            interval: 2.0,
        }
    }
}

/// Stability model settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StabilityConfig {
    /// Stability lost per `distance_step` pixels from home.
    pub distance_penalty: f64,
    /// Distance unit for `distance_penalty`.
    pub distance_step: f64,
    /// Target stability ceiling for disconnected planets.
    pub disconnected_cap: f64,
    /// Planet count above which the empire-size penalty applies.
    pub empire_threshold: u32,
    /// Stability lost per planet above `empire_threshold`.
    pub empire_penalty: f64,
    /// Stability gained per second while below target.
    pub recovery_rate: f64,
    /// Stability lost per second while above target.
    pub decay_rate: f64,
    /// Fraction of units lost when stability collapses.
    pub collapse_unit_loss: f64,
    /// Stability of a freshly conquered planet.
    pub capture_stability: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            distance_penalty: 3.0,
            distance_step: 200.0,
            disconnected_cap: 20.0,
            empire_threshold: 10,
            empire_penalty: 3.0,
            recovery_rate: 5.0,
            decay_rate: 2.0,
            collapse_unit_loss: 0.7,
            capture_stability: 50.0,
        }
    }
}

/// Unit growth settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowthConfig {
    /// Units per second before planet and penalty multipliers.
    pub base_rate: f64,
    /// Below this stability the planet bleeds units.
    pub low_stability: f64,
    /// Above this stability growth runs at full rate.
    pub high_stability: f64,
    /// Units lost per second below `low_stability`.
    pub unstable_decay: f64,
    /// Growth multiplier between the two stability bands.
    pub mid_band_factor: f64,
    /// Planet count above which growth slows.
    pub slow_threshold: u32,
    /// Growth multiplier lost per planet above `slow_threshold`.
    pub slow_penalty_per_planet: f64,
    /// Floor for the empire-size growth multiplier.
    pub min_factor: f64,
    /// Units lost per second at minimum while disconnected.
    pub disconnected_drain: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            base_rate: 1.0,
            low_stability: 30.0,
            high_stability: 70.0,
            unstable_decay: 1.0,
            mid_band_factor: 0.3,
            slow_threshold: 8,
            slow_penalty_per_planet: 0.05,
            min_factor: 0.1,
            disconnected_drain: 0.5,
        }
    }
}

/// Attack and combat settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombatConfig {
    /// Attack travel speed in pixels per second.
    pub attack_speed: f64,
    /// Fraction of the source's units committed per launch.
    pub launch_fraction: f64,
    /// Minimum units a source needs to launch.
    pub min_launch_units: f64,
    /// Efficiency lost per 100 pixels travelled.
    pub loss_per_100px: f64,
    /// Efficiency floor for very long attacks.
    pub min_efficiency: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_speed: 150.0,
            launch_fraction: 0.5,
            min_launch_units: 2.0,
            loss_per_100px: 0.05,
            min_efficiency: 0.2,
        }
    }
}

/// Scripted opponent settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds of game time between decisions.
    pub interval: f64,
    /// Units a planet needs before it may attack.
    pub min_source_units: f64,
    /// Targets further than this from the source are ignored.
    pub scan_radius: f64,
    /// Attacks issued per player per decision.
    pub attacks_per_tick: usize,
    /// Required ratio of arriving units to enemy defense strength.
    pub safety_margin: f64,
    /// Bonus for neutral large and giant targets.
    pub big_target_bonus: f64,
    /// Bonus for attacking an enemy home planet.
    pub home_bonus: f64,
    /// Let the script drive the human seat as well (headless runs).
    pub control_human: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            interval: 2.0,
            min_source_units: 40.0,
            scan_radius: 600.0,
            attacks_per_tick: 2,
            safety_margin: 1.2,
            big_target_bonus: 30.0,
            home_bonus: 100.0,
            control_human: false,
        }
    }
}

/// Frame stepping settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Largest step `update` will take, in seconds.
    pub max_dt: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { max_dt: 0.1 }
    }
}

impl SimConfig {
    /// Load and validate a config from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = ron::from_str(&contents)?;
        config.validate()?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Write this config as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Reject values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("world.size", self.world.size),
            ("world.placement_attempts", f64::from(self.world.placement_attempts)),
            ("supply.range", self.supply.range),
            ("supply.interval", self.supply.interval),
            ("stability.distance_step", self.stability.distance_step),
            ("combat.attack_speed", self.combat.attack_speed),
            ("ai.interval", self.ai.interval),
            ("ai.scan_radius", self.ai.scan_radius),
            ("simulation.max_dt", self.simulation.max_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("world.separation_margin", self.world.separation_margin),
            ("world.edge_margin", self.world.edge_margin),
            ("world.corner_inset", self.world.corner_inset),
            ("world.moon_orbit_min", self.world.moon_orbit_min),
            ("world.moon_orbit_max", self.world.moon_orbit_max),
            ("world.moon_speed_min", self.world.moon_speed_min),
            ("world.moon_speed_max", self.world.moon_speed_max),
            ("world.home_start_units", self.world.home_start_units),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let fractions = [
            ("world.neutral_fill_min", self.world.neutral_fill_min),
            ("world.neutral_fill_max", self.world.neutral_fill_max),
            ("stability.collapse_unit_loss", self.stability.collapse_unit_loss),
            ("growth.mid_band_factor", self.growth.mid_band_factor),
            ("growth.min_factor", self.growth.min_factor),
            ("combat.launch_fraction", self.combat.launch_fraction),
            ("combat.min_efficiency", self.combat.min_efficiency),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.world.neutral_fill_min > self.world.neutral_fill_max {
            return Err(Error::InvalidConfig(
                "world.neutral_fill_min exceeds world.neutral_fill_max".to_string(),
            ));
        }
        if self.world.moon_orbit_min > self.world.moon_orbit_max
            || self.world.moon_speed_min > self.world.moon_speed_max
        {
            return Err(Error::InvalidConfig(
                "moon orbit ranges must have min <= max".to_string(),
            ));
        }
        if self.world.corner_inset * 2.0 >= self.world.size
            || self.world.edge_margin * 2.0 >= self.world.size
        {
            return Err(Error::InvalidConfig(
                "world.corner_inset and world.edge_margin must fit inside world.size".to_string(),
            ));
        }
        if self.growth.low_stability > self.growth.high_stability {
            return Err(Error::InvalidConfig(
                "growth.low_stability exceeds growth.high_stability".to_string(),
            ));
        }
        Ok(())
    }
}
