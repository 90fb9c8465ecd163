//! Entity types for the tank simulation.
//!
//! - [`EntityId`]: unique identifier, stable for the lifetime of the entity
//! - [`EntityTag`]: type classification (tank, bot, shell, prop)
//! - [`EntityInner`]: type-safe storage for the components of each type
//! - [`Entity`]: the complete entity container held by the world
//!
//! # Capabilities
//!
//! Behaviour is attached through capabilities rather than through the entity
//! type. [`EntityInner`] hands out trait objects for each capability it
//! carries (`as_movable`, `as_repellable`, `as_damaging`, `as_damageable`),
//! and [`Capabilities`] summarises the set as bitflags.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tanks_core::entity::{Capabilities, Entity, EntityId, EntityInner, EntityTag};
//! use tanks_core::entity::components::TankComponents;
//!
//! let tank = Entity::new(
//!     EntityId::new(42),
//!     EntityInner::Tank(TankComponents::at_position(Vec2::new(10.0, 10.0))),
//! );
//!
//! assert_eq!(tank.id().as_u64(), 42);
//! assert_eq!(tank.tag(), EntityTag::Tank);
//! assert!(tank.capabilities().contains(Capabilities::HEALTH | Capabilities::STEERING));
//! ```

pub mod capability;
pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use capability::{Damageable, Damaging, Movable, Positioned, Repellable};
pub use components::{
    Body, BotComponents, Capabilities, Damage, Health, Movement, PropComponents, Repulsion,
    ShellComponents, TankComponents, TankState, TargetingState,
};

/// Unique identifier for an entity.
///
/// Ids are drawn from the world's seeded generator and never reused while the
/// entity is live. Ordering is numeric and carries no meaning beyond
/// determinism; iteration order is insertion order, not id order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity type classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Externally driven tank
    Tank,
    /// Tank driven by the built-in targeting controller
    Bot,
    /// In-flight shell
    Shell,
    /// Static obstacle with only a body
    Prop,
}

impl EntityTag {
    /// Returns `true` for entities that accept track and fire commands.
    #[must_use]
    pub const fn is_tank(self) -> bool {
        matches!(self, Self::Tank | Self::Bot)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank => write!(f, "Tank"),
            Self::Bot => write!(f, "Bot"),
            Self::Shell => write!(f, "Shell"),
            Self::Prop => write!(f, "Prop"),
        }
    }
}

/// Type-safe storage for entity-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Tank components (body, drive, repulsion, health, gun)
    Tank(TankComponents),
    /// Tank components plus targeting state
    Bot(BotComponents),
    /// Shell components (body, ballistic drive, damage, creator)
    Shell(ShellComponents),
    /// Prop components (body only)
    Prop(PropComponents),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Tank(_) => EntityTag::Tank,
            Self::Bot(_) => EntityTag::Bot,
            Self::Shell(_) => EntityTag::Shell,
            Self::Prop(_) => EntityTag::Prop,
        }
    }

    /// Returns the capability set of this entity type.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        let tank = Capabilities::MOVEMENT
            | Capabilities::REPULSION
            | Capabilities::HEALTH
            | Capabilities::STEERING;
        match self {
            Self::Tank(_) => tank,
            Self::Bot(_) => tank | Capabilities::TARGETING,
            Self::Shell(_) => Capabilities::MOVEMENT | Capabilities::DAMAGE,
            Self::Prop(_) => Capabilities::empty(),
        }
    }

    /// Position and radius. Every entity has a body.
    #[must_use]
    pub fn body(&self) -> &Body {
        self.as_positioned().body()
    }

    /// Mutable position and radius.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        self.as_positioned_mut().body_mut()
    }

    fn as_positioned(&self) -> &dyn Positioned {
        match self {
            Self::Tank(c) => c,
            Self::Bot(c) => c,
            Self::Shell(c) => c,
            Self::Prop(c) => c,
        }
    }

    fn as_positioned_mut(&mut self) -> &mut dyn Positioned {
        match self {
            Self::Tank(c) => c,
            Self::Bot(c) => c,
            Self::Shell(c) => c,
            Self::Prop(c) => c,
        }
    }

    /// Movement capability, if any.
    #[must_use]
    pub fn as_movable(&self) -> Option<&dyn Movable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(c) => Some(c),
            Self::Prop(_) => None,
        }
    }

    /// Mutable movement capability, if any.
    #[must_use]
    pub fn as_movable_mut(&mut self) -> Option<&mut dyn Movable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(c) => Some(c),
            Self::Prop(_) => None,
        }
    }

    /// Repulsion capability, if any.
    #[must_use]
    pub fn as_repellable(&self) -> Option<&dyn Repellable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(_) | Self::Prop(_) => None,
        }
    }

    /// Mutable repulsion capability, if any.
    #[must_use]
    pub fn as_repellable_mut(&mut self) -> Option<&mut dyn Repellable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(_) | Self::Prop(_) => None,
        }
    }

    /// Damage capability, if any.
    #[must_use]
    pub fn as_damaging(&self) -> Option<&dyn Damaging> {
        match self {
            Self::Shell(c) => Some(c),
            _ => None,
        }
    }

    /// Health capability, if any.
    #[must_use]
    pub fn as_damageable(&self) -> Option<&dyn Damageable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(_) | Self::Prop(_) => None,
        }
    }

    /// Mutable health capability, if any.
    #[must_use]
    pub fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(c),
            Self::Shell(_) | Self::Prop(_) => None,
        }
    }

    /// Tank components of a tank or bot.
    #[must_use]
    pub const fn as_tank(&self) -> Option<&TankComponents> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(&c.tank),
            _ => None,
        }
    }

    /// Mutable tank components of a tank or bot.
    #[must_use]
    pub fn as_tank_mut(&mut self) -> Option<&mut TankComponents> {
        match self {
            Self::Tank(c) => Some(c),
            Self::Bot(c) => Some(&mut c.tank),
            _ => None,
        }
    }

    /// Returns the bot components, if this is a bot.
    #[must_use]
    pub const fn as_bot(&self) -> Option<&BotComponents> {
        match self {
            Self::Bot(c) => Some(c),
            _ => None,
        }
    }

    /// Returns mutable bot components, if this is a bot.
    #[must_use]
    pub fn as_bot_mut(&mut self) -> Option<&mut BotComponents> {
        match self {
            Self::Bot(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the shell components, if this is a shell.
    #[must_use]
    pub const fn as_shell(&self) -> Option<&ShellComponents> {
        match self {
            Self::Shell(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the prop components, if this is a prop.
    #[must_use]
    pub const fn as_prop(&self) -> Option<&PropComponents> {
        match self {
            Self::Prop(c) => Some(c),
            _ => None,
        }
    }
}

/// A complete entity in the tank simulation.
///
/// # Invariants
///
/// - The `EntityId` is unique among live entities of a world
/// - Once `removed` is set the entity is never ticked or collided again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
    removed: bool,
}

impl Entity {
    /// Creates a live entity.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self {
            id,
            inner,
            removed: false,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns the capability set.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    /// Returns a reference to the entity's inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the entity's inner component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Position and radius.
    #[must_use]
    pub fn body(&self) -> &Body {
        self.inner.body()
    }

    /// Current centre.
    #[must_use]
    pub fn position(&self) -> glam::Vec2 {
        self.inner.body().position
    }

    /// Movement component, if the entity moves.
    #[must_use]
    pub fn movement(&self) -> Option<&Movement> {
        self.inner.as_movable().map(Movable::movement)
    }

    /// Mutable movement component, if the entity moves.
    #[must_use]
    pub fn movement_mut(&mut self) -> Option<&mut Movement> {
        self.inner.as_movable_mut().map(Movable::movement_mut)
    }

    /// Repulsion component, if the entity is pushed apart on contact.
    #[must_use]
    pub fn repulsion(&self) -> Option<&Repulsion> {
        self.inner.as_repellable().map(Repellable::repulsion)
    }

    /// Damage payload, if the entity deals damage.
    #[must_use]
    pub fn damage(&self) -> Option<&Damage> {
        self.inner.as_damaging().map(Damaging::damage)
    }

    /// Health component, if the entity can be damaged.
    #[must_use]
    pub fn health(&self) -> Option<&Health> {
        self.inner.as_damageable().map(Damageable::health)
    }

    /// Mutable health component, if the entity can be damaged.
    #[must_use]
    pub fn health_mut(&mut self) -> Option<&mut Health> {
        self.inner.as_damageable_mut().map(Damageable::health_mut)
    }

    /// Returns `true` once the world has removed this entity.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.removed
    }

    /// Removal hook: drops controller state and marks the entity removed.
    ///
    /// Bots forget their target and every tank releases its tracks.
    /// Calling it again has no further effect.
    pub fn on_remove(&mut self) {
        if self.removed {
            return;
        }
        if let Some(bot) = self.inner.as_bot_mut() {
            bot.targeting.target = None;
        }
        if let Some(tank) = self.inner.as_tank_mut() {
            tank.tank.set_tracks(0.0, 0.0);
        }
        self.removed = true;
    }

    /// Returns `true` if this entity is a tank or bot.
    #[must_use]
    pub const fn is_tank(&self) -> bool {
        self.tag().is_tank()
    }

    /// Returns `true` if this entity is a shell.
    #[must_use]
    pub const fn is_shell(&self) -> bool {
        matches!(self.tag(), EntityTag::Shell)
    }

    /// Tank components of a tank or bot, `None` otherwise.
    #[must_use]
    pub const fn as_tank(&self) -> Option<&TankComponents> {
        self.inner.as_tank()
    }

    /// Mutable tank components of a tank or bot, `None` otherwise.
    #[must_use]
    pub fn as_tank_mut(&mut self) -> Option<&mut TankComponents> {
        self.inner.as_tank_mut()
    }

    /// Bot components if this is a bot, `None` otherwise.
    #[must_use]
    pub const fn as_bot(&self) -> Option<&BotComponents> {
        self.inner.as_bot()
    }

    /// Shell components if this is a shell, `None` otherwise.
    #[must_use]
    pub const fn as_shell(&self) -> Option<&ShellComponents> {
        self.inner.as_shell()
    }
}
