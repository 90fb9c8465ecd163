//! Collision resolvers.
//!
//! A resolver reacts to one entity's collision with another. Collisions are
//! asymmetric: when A's scan finds B, only A's resolver runs; B reacts in its
//! own scan, if it still overlaps A by then.
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: repulsion between repellable entities, plus velocity
//!   integration and boundary handling
//! - [`CombatResolver`]: shell hits and damage
//!
//! # Invariants
//!
//! - Resolvers re-fetch both entities by id and do nothing if either is gone
//! - Every removal goes through [`remove_entity`], which records the reason

mod combat;
mod physics;

pub use combat::CombatResolver;
pub use physics::PhysicsResolver;

use tracing::debug;

use crate::entity::{Capabilities, EntityId};
use crate::manager::EntityManager;
use crate::output::{Event, RemovalReason};

/// Reaction of an entity to overlapping another.
///
/// # Example
///
/// ```
/// use tanks_core::entity::EntityId;
/// use tanks_core::manager::EntityManager;
/// use tanks_core::output::Event;
/// use tanks_core::resolver::CollisionResolver;
///
/// struct Ignore;
///
/// impl CollisionResolver for Ignore {
///     fn resolve(
///         &self,
///         _entity: EntityId,
///         _other: EntityId,
///         _entities: &mut EntityManager,
///         _events: &mut Vec<Event>,
///     ) {
///     }
/// }
/// ```
pub trait CollisionResolver {
    /// Handles `entity` overlapping `other`.
    fn resolve(
        &self,
        entity: EntityId,
        other: EntityId,
        entities: &mut EntityManager,
        events: &mut Vec<Event>,
    );
}

/// Picks the resolver for an entity from its capabilities.
///
/// Damage dealers resolve as combat, repellable entities as physics, and
/// anything else has no collision reaction.
#[must_use]
pub fn resolver_for(capabilities: Capabilities) -> Option<&'static dyn CollisionResolver> {
    if capabilities.contains(Capabilities::DAMAGE) {
        Some(&CombatResolver)
    } else if capabilities.contains(Capabilities::REPULSION) {
        Some(&PhysicsResolver)
    } else {
        None
    }
}

/// Removes an entity and records why. A no-op for ids that are not live.
///
/// Returns `true` if the entity was live.
pub fn remove_entity(
    entities: &mut EntityManager,
    events: &mut Vec<Event>,
    id: EntityId,
    reason: RemovalReason,
) -> bool {
    if entities.remove(id).is_none() {
        return false;
    }
    debug!(entity_id = %id, %reason, "removed from world");
    events.push(Event::Removed { entity: id, reason });
    true
}
