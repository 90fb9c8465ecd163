//! Capability components and the concrete bundles entity types are built from.
//!
//! Capabilities are plain data with the arithmetic that belongs to them:
//! - [`Body`]: position and collision radius (every entity has one)
//! - [`Movement`]: velocity, speed cap, acceleration and friction
//! - [`Repulsion`]: collision response strength
//! - [`Damage`]: payload dealt on hit
//! - [`Health`]: hit points; depletion means removal
//!
//! Concrete entity types ([`TankComponents`], [`BotComponents`],
//! [`ShellComponents`], [`PropComponents`]) hold the capabilities they need.
//! Which capabilities a bundle carries is summarised by [`Capabilities`].

use std::f32::consts::TAU;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{BotConfig, ShellConfig, TankConfig};
use crate::entity::EntityId;

// =============================================================================
// Capability Set
// =============================================================================

bitflags! {
    /// Set of capabilities an entity carries.
    ///
    /// Used for cheap "is this entity X-capable" checks without matching on
    /// the concrete entity type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Has velocity and integrates it every tick.
        const MOVEMENT = 1 << 0;
        /// Reacts to collisions with other repellable entities.
        const REPULSION = 1 << 1;
        /// Deals damage on hit.
        const DAMAGE = 1 << 2;
        /// Can take damage and be destroyed by it.
        const HEALTH = 1 << 3;
        /// Accepts track and fire commands.
        const STEERING = 1 << 4;
        /// Runs the autonomous targeting controller.
        const TARGETING = 1 << 5;
    }
}

// =============================================================================
// Body
// =============================================================================

/// Position and circular collision radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the entity in world coordinates.
    pub position: Vec2,
    /// Collision radius, never negative.
    pub size: f32,
}

impl Body {
    /// Creates a body, clamping a negative radius to zero.
    #[must_use]
    pub fn new(position: Vec2, size: f32) -> Self {
        Self {
            position,
            size: size.max(0.0),
        }
    }

    /// Distance between the two centres.
    #[must_use]
    pub fn distance_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position)
    }

    /// Returns `true` if the two collision circles strictly overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.distance_to(other) < self.size + other.size
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

// =============================================================================
// Movement
// =============================================================================

/// Velocity with a speed cap, per-impulse gain and per-tick friction.
///
/// # Invariants
///
/// After [`accelerate`](Self::accelerate), `velocity.length() <= max_speed`
/// (up to float rounding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Displacement applied to the position each tick.
    pub velocity: Vec2,
    /// Speed cap.
    pub max_speed: f32,
    /// Velocity gained per unit of direction passed to `accelerate`.
    pub acceleration: f32,
    /// Fraction of velocity lost each tick, in `[0, 1]`.
    pub friction: f32,
}

impl Movement {
    /// Creates a resting movement component.
    #[must_use]
    pub fn new(max_speed: f32, acceleration: f32, friction: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            max_speed: max_speed.max(0.0),
            acceleration,
            friction: friction.clamp(0.0, 1.0),
        }
    }

    /// Creates a component that keeps a fixed velocity forever.
    ///
    /// Zero acceleration and friction; the speed cap equals the initial speed.
    #[must_use]
    pub fn ballistic(velocity: Vec2) -> Self {
        Self {
            velocity,
            max_speed: velocity.length(),
            acceleration: 0.0,
            friction: 0.0,
        }
    }

    /// Adds `direction * acceleration` to the velocity, then rescales it down
    /// to `max_speed` if it exceeds the cap.
    ///
    /// Non-finite directions are ignored.
    pub fn accelerate(&mut self, direction: Vec2) {
        if !direction.is_finite() {
            return;
        }
        self.velocity += direction * self.acceleration;

        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }
    }

    /// Moves `position` by the velocity, then decays the velocity by friction.
    pub fn integrate(&mut self, position: &mut Vec2) {
        *position += self.velocity;
        self.velocity *= 1.0 - self.friction;
    }

    /// Zeroes the velocity.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(5.0, 0.5, 0.1)
    }
}

// =============================================================================
// Repulsion, Damage, Health
// =============================================================================

/// Collision response strength. Zero means "hard stop".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Repulsion {
    /// Impulse magnitude this entity receives when pushed apart.
    pub repel_force: f32,
}

impl Repulsion {
    /// Creates a repulsion component, clamping negative forces to zero.
    #[must_use]
    pub fn new(repel_force: f32) -> Self {
        Self {
            repel_force: repel_force.max(0.0),
        }
    }

    /// Returns `true` if collisions stop both parties outright.
    #[must_use]
    pub fn is_hard_stop(&self) -> bool {
        self.repel_force == 0.0
    }
}

/// Damage payload delivered on hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    /// Hit points removed from the target.
    pub amount: i32,
}

impl Default for Damage {
    fn default() -> Self {
        Self { amount: 10 }
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Remaining hit points; the entity is removed once this reaches zero.
    pub health: i32,
}

impl Health {
    /// Creates a health component.
    #[must_use]
    pub const fn new(health: i32) -> Self {
        Self { health }
    }

    /// Subtracts `amount` and returns `true` if health is now depleted.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_depleted()
    }

    /// Returns `true` once health has reached zero or below.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

// =============================================================================
// Tank State
// =============================================================================

/// Facing, track inputs and gun state of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankState {
    /// Facing in radians, kept in `[0, 2π)` by [`steer`](Self::steer).
    pub angle: f32,
    /// Radians turned per tick at full track differential.
    pub rotation_speed: f32,
    /// Left track input in `[-1, 1]`.
    pub left_track: f32,
    /// Right track input in `[-1, 1]`.
    pub right_track: f32,
    /// Speed of fired shells.
    pub shell_velocity: f32,
    /// Ticks between shots.
    pub reload_time: u32,
    /// Ticks left until the next shot is allowed.
    pub reload_timer: u32,
    /// Clamp into the world on boundary contact.
    pub clamp_to_world: bool,
}

impl TankState {
    /// Creates a stationary, loaded tank facing +X.
    #[must_use]
    pub fn from_config(config: &TankConfig) -> Self {
        Self {
            angle: 0.0,
            rotation_speed: config.rotation_speed,
            left_track: 0.0,
            right_track: 0.0,
            shell_velocity: config.shell_velocity,
            reload_time: config.reload_time,
            reload_timer: 0,
            clamp_to_world: config.clamp_to_world,
        }
    }

    /// Sets both track inputs, clamped to `[-1, 1]`. NaN becomes `0`.
    pub fn set_tracks(&mut self, left: f32, right: f32) {
        self.left_track = clamp_track(left);
        self.right_track = clamp_track(right);
    }

    /// Counts the reload timer down by one tick.
    pub fn tick_reload(&mut self) {
        self.reload_timer = self.reload_timer.saturating_sub(1);
    }

    /// Returns `true` if the gun is loaded.
    #[must_use]
    pub const fn can_fire(&self) -> bool {
        self.reload_timer == 0
    }

    /// Starts the reload countdown after a shot.
    pub fn start_reload(&mut self) {
        self.reload_timer = self.reload_time;
    }

    /// Turns by the track differential and returns the drive direction.
    ///
    /// The returned vector is the unit facing scaled by the mean track input,
    /// ready to be passed to [`Movement::accelerate`].
    pub fn steer(&mut self) -> Vec2 {
        let rotation = (self.right_track - self.left_track) * self.rotation_speed;
        self.turn(rotation);

        let forward_speed = (self.left_track + self.right_track) / 2.0;
        self.facing() * forward_speed
    }

    /// Adds `delta` radians to the facing, wrapping into `[0, 2π)`.
    pub fn turn(&mut self, delta: f32) {
        self.angle = wrap_angle(self.angle + delta);
    }

    /// Unit vector along the facing.
    #[must_use]
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Where a shell fired now would appear, given the hull radius.
    #[must_use]
    pub fn muzzle(&self, body: &Body) -> Vec2 {
        body.position + self.facing() * (body.size + 0.5)
    }
}

impl Default for TankState {
    fn default() -> Self {
        Self::from_config(&TankConfig::default())
    }
}

fn clamp_track(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

// =============================================================================
// Targeting State
// =============================================================================

/// Cached target and refresh cadence of an autonomous bot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetingState {
    /// Tank currently being pursued. Weak: the id may no longer be live.
    pub target: Option<EntityId>,
    /// Distance at which the bot stops closing in and starts shooting.
    pub attack_range: f32,
    /// Maximum radians turned toward the target per tick.
    pub rotation_speed: f32,
    /// Ticks between nearest-tank searches.
    pub update_target_interval: u32,
    /// Ticks since the last search.
    pub ticks_since_target_update: u32,
    /// Largest facing error at which the bot fires.
    pub aim_tolerance: f32,
}

impl TargetingState {
    /// Creates an idle targeting state.
    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            target: None,
            attack_range: config.attack_range,
            rotation_speed: config.rotation_speed,
            update_target_interval: config.update_target_interval,
            ticks_since_target_update: 0,
            aim_tolerance: config.aim_tolerance,
        }
    }

    /// Advances the refresh counter; returns `true` when a new search is due.
    pub fn refresh_due(&mut self) -> bool {
        self.ticks_since_target_update += 1;
        if self.ticks_since_target_update >= self.update_target_interval {
            self.ticks_since_target_update = 0;
            true
        } else {
            false
        }
    }
}

impl Default for TargetingState {
    fn default() -> Self {
        Self::from_config(&BotConfig::default())
    }
}

// =============================================================================
// Entity Bundles
// =============================================================================

/// Components of a player-controlled tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankComponents {
    /// Position and hull radius.
    pub body: Body,
    /// Drive physics.
    pub movement: Movement,
    /// Collision response.
    pub repulsion: Repulsion,
    /// Hit points.
    pub health: Health,
    /// Facing, tracks and gun.
    pub tank: TankState,
}

impl TankComponents {
    /// Creates a tank at `position` from tuning values.
    #[must_use]
    pub fn from_config(position: Vec2, config: &TankConfig) -> Self {
        Self {
            body: Body::new(position, config.size),
            movement: Movement::new(config.max_speed, config.acceleration, config.friction),
            repulsion: Repulsion::new(config.repel_force),
            health: Health::new(config.health),
            tank: TankState::from_config(config),
        }
    }

    /// Creates a tank at `position` with stock tuning.
    #[must_use]
    pub fn at_position(position: Vec2) -> Self {
        Self::from_config(position, &TankConfig::default())
    }
}

/// Components of an autonomous tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotComponents {
    /// The tank being driven.
    pub tank: TankComponents,
    /// Target cache and refresh cadence.
    pub targeting: TargetingState,
}

impl BotComponents {
    /// Creates a bot at `position` from tuning values.
    ///
    /// The bot's turn rate toward its target comes from `bot`; the track
    /// differential turn rate comes from `tank`.
    #[must_use]
    pub fn from_config(position: Vec2, tank: &TankConfig, bot: &BotConfig) -> Self {
        Self {
            tank: TankComponents::from_config(position, tank),
            targeting: TargetingState::from_config(bot),
        }
    }

    /// Creates a bot at `position` with stock tuning.
    #[must_use]
    pub fn at_position(position: Vec2) -> Self {
        Self::from_config(position, &TankConfig::default(), &BotConfig::default())
    }
}

/// Components of an in-flight shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellComponents {
    /// Position and radius.
    pub body: Body,
    /// Fixed ballistic velocity.
    pub movement: Movement,
    /// Payload.
    pub damage: Damage,
    /// Tank that fired this shell; never hit by it.
    pub creator: EntityId,
}

impl ShellComponents {
    /// Creates a shell at `position` travelling along `angle` at `speed`.
    #[must_use]
    pub fn fired(
        position: Vec2,
        angle: f32,
        speed: f32,
        creator: EntityId,
        config: &ShellConfig,
    ) -> Self {
        Self {
            body: Body::new(position, config.size),
            movement: Movement::ballistic(Vec2::from_angle(angle) * speed),
            damage: Damage {
                amount: config.damage,
            },
            creator,
        }
    }
}

/// Components of a static obstacle: a body and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropComponents {
    /// Position and radius.
    pub body: Body,
}

impl PropComponents {
    /// Creates a prop at `position` with radius `size`.
    #[must_use]
    pub fn new(position: Vec2, size: f32) -> Self {
        Self {
            body: Body::new(position, size),
        }
    }
}
