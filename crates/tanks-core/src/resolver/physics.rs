//! Physics resolver: repulsion, integration and world bounds.
//!
//! The `PhysicsResolver` handles:
//! - Repulsion: pushing two overlapping repellable entities apart
//! - Integration: `position += velocity`, then friction, once per tick
//! - Boundary tests and the optional clamp that keeps tanks inside the world
//!
//! # Repulsion
//!
//! The push direction is the unit vector from the other entity to this one.
//! Each side accelerates by its own `repel_force` along that direction (this
//! one outward, the other inward toward its own side), so unequal forces give
//! unequal impulses. If either force is zero both entities stop dead. Exactly
//! coincident centres have no direction and are skipped.

use glam::Vec2;
use tracing::trace;

use crate::entity::components::{Body, TankComponents};
use crate::entity::EntityId;
use crate::manager::EntityManager;
use crate::output::Event;

use super::CollisionResolver;

/// Resolver for repulsion and movement.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use tanks_core::entity::components::Body;
/// use tanks_core::resolver::PhysicsResolver;
///
/// let inside = Body::new(Vec2::new(50.0, 50.0), 1.0);
/// let edge = Body::new(Vec2::new(1.0, 50.0), 1.0);
///
/// assert!(!PhysicsResolver::touches_boundary(&inside, 100.0, 100.0));
/// assert!(PhysicsResolver::touches_boundary(&edge, 100.0, 100.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Moves a movable entity by its velocity and applies friction.
    ///
    /// Does nothing for missing or immovable entities.
    pub fn integrate(entities: &mut EntityManager, id: EntityId) {
        if let Some(movable) = entities
            .get_mut(id)
            .and_then(|entity| entity.inner_mut().as_movable_mut())
        {
            movable.integrate();
        }
    }

    /// Returns `true` if the collision circle touches or crosses an edge of
    /// the `width` x `height` world.
    #[must_use]
    pub fn touches_boundary(body: &Body, width: f32, height: f32) -> bool {
        let Vec2 { x, y } = body.position;
        let size = body.size;
        x <= size || x >= width - size || y <= size || y >= height - size
    }

    /// Pulls a tank back inside the world and cancels outward velocity.
    ///
    /// The centre is clamped into `[size, width - size] x [size, height - size]`.
    /// A world narrower than the tank pins it to the far edge.
    pub fn clamp_to_world(tank: &mut TankComponents, width: f32, height: f32) {
        let size = tank.body.size;
        let position = &mut tank.body.position;
        let velocity = &mut tank.movement.velocity;

        if position.x <= size && velocity.x < 0.0 {
            velocity.x = 0.0;
        }
        if position.x >= width - size && velocity.x > 0.0 {
            velocity.x = 0.0;
        }
        if position.y <= size && velocity.y < 0.0 {
            velocity.y = 0.0;
        }
        if position.y >= height - size && velocity.y > 0.0 {
            velocity.y = 0.0;
        }

        position.x = position.x.max(size).min(width - size);
        position.y = position.y.max(size).min(height - size);
    }
}

impl CollisionResolver for PhysicsResolver {
    fn resolve(
        &self,
        entity: EntityId,
        other: EntityId,
        entities: &mut EntityManager,
        events: &mut Vec<Event>,
    ) {
        let (Some(a), Some(b)) = (entities.get(entity), entities.get(other)) else {
            return;
        };
        // Repulsion only acts between two repellable entities
        let (Some(force_a), Some(force_b)) = (a.repulsion().copied(), b.repulsion().copied())
        else {
            return;
        };

        let offset = a.position() - b.position();
        let distance = offset.length();
        if distance == 0.0 {
            return;
        }

        if force_a.is_hard_stop() || force_b.is_hard_stop() {
            for id in [entity, other] {
                if let Some(movement) = entities.get_mut(id).and_then(|e| e.movement_mut()) {
                    movement.stop();
                }
            }
            trace!(entity_id = %entity, other_id = %other, "hard stop");
        } else {
            let normal = offset / distance;
            if let Some(movable) = entities
                .get_mut(entity)
                .and_then(|e| e.inner_mut().as_movable_mut())
            {
                movable.accelerate(normal * force_a.repel_force);
            }
            if let Some(movable) = entities
                .get_mut(other)
                .and_then(|e| e.inner_mut().as_movable_mut())
            {
                movable.accelerate(-normal * force_b.repel_force);
            }
            trace!(entity_id = %entity, other_id = %other, distance, "repelled");
        }

        events.push(Event::Repelled { entity, other });
    }
}

// =============================================================================
// Tests
// =============================================================================
