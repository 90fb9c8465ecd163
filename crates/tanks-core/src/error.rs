//! Error types for the caller-facing surface of the simulation.
//!
//! Nothing inside a tick returns an error: illegal states are clamped and
//! guarded. These enums only describe mistakes made by the code driving the
//! world (bad tuning values, unknown entity ids, duplicate ids).

use thiserror::Error;

use crate::entity::{EntityId, EntityTag};
use crate::output::Command;

/// Invalid tuning value found by a `validate()` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// World dimensions must be strictly positive and finite.
    #[error("world dimensions must be positive and finite, got {width}x{height}")]
    InvalidWorldSize {
        /// Configured width
        width: f32,
        /// Configured height
        height: f32,
    },
    /// A value that must be non-negative and finite was not.
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative {
        /// Name of the offending field
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// Friction must lie in `[0, 1]`.
    #[error("friction must be within [0, 1], got {0}")]
    FrictionOutOfRange(f32),
    /// Health must start positive.
    #[error("initial health must be positive, got {0}")]
    NonPositiveHealth(i32),
    /// Damage must not be negative.
    #[error("damage must not be negative, got {0}")]
    NegativeDamage(i32),
    /// The bot target refresh interval must be at least one tick.
    #[error("target refresh interval must be at least 1 tick")]
    ZeroRefreshInterval,
}

/// Errors returned to callers of [`World`](crate::world::World) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// An entity with this id is already live in the world.
    #[error("entity {0} already exists")]
    DuplicateId(EntityId),
    /// The entity has already been removed and cannot come back.
    #[error("entity {0} was removed and cannot be re-added")]
    Removed(EntityId),
    /// No live entity has this id.
    #[error("entity {0} not found")]
    UnknownEntity(EntityId),
    /// The entity exists but cannot receive tank commands.
    #[error("entity {id} is a {tag}, not a tank")]
    NotATank {
        /// Entity the command was addressed to
        id: EntityId,
        /// Its actual type
        tag: EntityTag,
    },
    /// The command is internal to the bot controller.
    #[error("entity {id} cannot be sent {command:?}; steer with track inputs")]
    UnsupportedCommand {
        /// Entity the command was addressed to
        id: EntityId,
        /// The rejected command
        command: Command,
    },
    /// The world configuration failed validation.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
