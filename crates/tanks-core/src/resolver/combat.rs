//! Combat resolver for shell hits.
//!
//! The `CombatResolver` runs when a damage-dealing entity (a shell) overlaps
//! something:
//! - The shell's own creator is never hit
//! - A health-capable target takes the damage and is removed once depleted
//! - The shell is spent on any hit, with or without damage dealt
//!
//! # Destruction Handling
//!
//! Unlike a deferred cleanup phase, removal is immediate: a destroyed target
//! is gone before the next entity scans, so it can neither be hit twice nor
//! tick later in the same pass.

use tracing::{debug, info};

use crate::entity::{Entity, EntityId};
use crate::manager::EntityManager;
use crate::output::{Event, RemovalReason};

use super::{remove_entity, CollisionResolver};

/// Resolver for damage dealt on contact.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use tanks_core::world::World;
///
/// let mut world = World::default();
/// let shooter = world.spawn_tank(Vec2::new(20.0, 50.0));
/// let target = world.spawn_tank(Vec2::new(31.0, 50.0));
///
/// // The shell appears at x = 21.5 and lands at x = 31.5 after one tick
/// world.shoot(shooter).unwrap();
/// world.tick();
/// world.tick();
///
/// assert_eq!(world.get(target).unwrap().health().unwrap().health, 90);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CollisionResolver for CombatResolver {
    fn resolve(
        &self,
        entity: EntityId,
        other: EntityId,
        entities: &mut EntityManager,
        events: &mut Vec<Event>,
    ) {
        let Some(source) = entities.get(entity) else {
            return;
        };
        let Some(damage) = source.damage().map(|d| d.amount) else {
            return;
        };
        if source.as_shell().map(|shell| shell.creator) == Some(other) {
            return;
        }
        if !entities.contains(other) {
            return;
        }

        let hit = entities
            .get_mut(other)
            .and_then(Entity::health_mut)
            .map(|health| {
                let depleted = health.take_damage(damage);
                (health.health, depleted)
            });

        if let Some((remaining_health, depleted)) = hit {
            debug!(
                shell_id = %entity,
                victim_id = %other,
                damage,
                remaining_health,
                "hit"
            );
            events.push(Event::Hit {
                shell: entity,
                target: other,
                damage,
                remaining_health,
            });

            if depleted {
                info!(victim_id = %other, shell_id = %entity, "destroyed");
                remove_entity(entities, events, other, RemovalReason::Destroyed);
            }
        }

        remove_entity(entities, events, entity, RemovalReason::Expended);
    }
}

// =============================================================================
// Tests
// =============================================================================
