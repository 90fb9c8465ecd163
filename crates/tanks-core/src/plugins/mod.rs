//! Per-entity behaviour plugins.
//!
//! - [`SteeringPlugin`]: reload countdown, tracked steering and fire gating
//!   for tanks and bots
//! - [`TargetingPlugin`]: the autonomous bot controller
//!
//! Plugins hold no state of their own. State lives in the entity's components
//! and the world passes in whatever a plugin needs, in a fixed order each tick:
//! reload, targeting (bots only), then steering.

mod steering;
mod targeting;

pub use steering::SteeringPlugin;
pub use targeting::{normalize_angle, TargetingPlugin};

use crate::entity::EntityId;

/// Context passed to a plugin invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginContext {
    /// Entity the plugin is running for.
    pub entity_id: EntityId,
    /// Ticks completed before this one.
    pub tick: u64,
}

impl PluginContext {
    /// Creates a context for `entity_id` at `tick`.
    #[must_use]
    pub const fn new(entity_id: EntityId, tick: u64) -> Self {
        Self { entity_id, tick }
    }
}
