//! Tuning configuration for worlds and the entities spawned into them.
//!
//! Every struct deserializes with `#[serde(default)]`, so a caller can load a
//! partial JSON/TOML document and get the stock values for anything it omits.
//! Defaults reproduce the stock tank game: a 100x100 world, 1-unit tanks with
//! 100 health firing 10-damage shells every 60 ticks.
//!
//! # Example
//!
//! ```
//! use tanks_core::config::{GameConfig, TankConfig};
//!
//! let config = GameConfig {
//!     tank: TankConfig { reload_time: 30, ..TankConfig::default() },
//!     ..GameConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.world.width, 100.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of undrained events a world keeps.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// World dimensions, id-generation seed and event log size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the playable rectangle.
    pub width: f32,
    /// Height of the playable rectangle.
    pub height: f32,
    /// Seed for the entity id generator.
    pub seed: u64,
    /// Most events kept between drains. Older events are dropped first;
    /// `0` turns event recording off.
    pub event_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            seed: 0,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl WorldConfig {
    /// Checks that both dimensions are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWorldSize`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidWorldSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Tank chassis, drive and gun tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Collision radius.
    pub size: f32,
    /// Speed cap enforced after every acceleration.
    pub max_speed: f32,
    /// Velocity gained per unit of drive input.
    pub acceleration: f32,
    /// Fraction of velocity lost each tick.
    pub friction: f32,
    /// Impulse applied to this tank when it collides with another tank.
    pub repel_force: f32,
    /// Starting health.
    pub health: i32,
    /// Radians turned per tick at full track differential.
    pub rotation_speed: f32,
    /// Speed of fired shells, in units per tick.
    pub shell_velocity: f32,
    /// Ticks between shots.
    pub reload_time: u32,
    /// Keep tanks inside the world instead of letting them drive out.
    pub clamp_to_world: bool,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            max_speed: 3.0,
            acceleration: 0.3,
            friction: 0.1,
            repel_force: 0.5,
            health: 100,
            rotation_speed: 0.1,
            shell_velocity: 10.0,
            reload_time: 60,
            clamp_to_world: false,
        }
    }
}

impl TankConfig {
    /// Validates every numeric field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("size", self.size)?;
        non_negative("max_speed", self.max_speed)?;
        non_negative("acceleration", self.acceleration)?;
        non_negative("repel_force", self.repel_force)?;
        non_negative("rotation_speed", self.rotation_speed)?;
        non_negative("shell_velocity", self.shell_velocity)?;
        friction_in_range(self.friction)?;
        if self.health <= 0 {
            return Err(ConfigError::NonPositiveHealth(self.health));
        }
        Ok(())
    }
}

/// Shell tuning. Speed comes from the firing tank's `shell_velocity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Collision radius.
    pub size: f32,
    /// Damage dealt to a health-capable entity on hit.
    pub damage: i32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            size: 0.2,
            damage: 10,
        }
    }
}

impl ShellConfig {
    /// Validates size and damage.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("shell size", self.size)?;
        if self.damage < 0 {
            return Err(ConfigError::NegativeDamage(self.damage));
        }
        Ok(())
    }
}

/// Autonomous bot controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Distance at which the bot stops closing in and starts shooting.
    pub attack_range: f32,
    /// Maximum radians the bot turns toward its target per tick.
    pub rotation_speed: f32,
    /// Ticks between nearest-tank searches.
    pub update_target_interval: u32,
    /// Largest facing error, in radians, at which the bot fires.
    pub aim_tolerance: f32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            attack_range: 20.0,
            rotation_speed: 0.1,
            update_target_interval: 10,
            aim_tolerance: 0.1,
        }
    }
}

impl BotConfig {
    /// Validates ranges and the refresh interval.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("attack_range", self.attack_range)?;
        non_negative("bot rotation_speed", self.rotation_speed)?;
        non_negative("aim_tolerance", self.aim_tolerance)?;
        if self.update_target_interval == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }
}

/// Complete tuning for a world and everything spawned into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World bounds and seed.
    pub world: WorldConfig,
    /// Tank tuning, shared by player tanks and bots.
    pub tank: TankConfig,
    /// Shell tuning.
    pub shell: ShellConfig,
    /// Bot controller tuning.
    pub bot: BotConfig,
}

impl GameConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.tank.validate()?;
        self.shell.validate()?;
        self.bot.validate()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn friction_in_range(friction: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&friction) {
        Ok(())
    } else {
        Err(ConfigError::FrictionOutOfRange(friction))
    }
}
