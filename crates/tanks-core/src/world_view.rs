//! `WorldView` provides read-only access to world state for controllers.
//!
//! Controllers (the bot targeting plugin) never mutate the world directly.
//! They read through a [`WorldView`] and return [`Command`](crate::output::Command)s
//! that the world applies afterwards, so a planning step cannot invalidate the
//! entity it is planning for.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tanks_core::world::World;
//!
//! let mut world = World::default();
//! let near = world.spawn_tank(Vec2::new(20.0, 10.0));
//! let _far = world.spawn_tank(Vec2::new(80.0, 10.0));
//!
//! let view = world.view();
//! let (nearest, distance) = view.nearest_tank(None, Vec2::new(10.0, 10.0)).unwrap();
//! assert_eq!(nearest, near);
//! assert_eq!(distance, 10.0);
//! ```

use glam::Vec2;

use crate::entity::{Entity, EntityId};
use crate::manager::EntityManager;

/// Read-only view of the world.
///
/// Borrows the entity manager for the duration of a planning step.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    entities: &'a EntityManager,
    width: f32,
    height: f32,
    tick: u64,
}

impl<'a> WorldView<'a> {
    /// Creates a view over `entities` for a `width` x `height` world.
    #[must_use]
    pub const fn new(entities: &'a EntityManager, width: f32, height: f32, tick: u64) -> Self {
        Self {
            entities,
            width,
            height,
            tick,
        }
    }

    /// Returns a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&'a Entity> {
        self.entities.get(id)
    }

    /// Returns `true` if the id belongs to a live entity.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Centre of a live entity.
    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.get(id).map(Entity::position)
    }

    /// Live tanks and bots in insertion order.
    pub fn tanks(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(|e| e.is_tank())
    }

    /// Nearest live tank or bot to `origin`, skipping `exclude`.
    ///
    /// Ties go to the tank that comes first in insertion order.
    #[must_use]
    pub fn nearest_tank(&self, exclude: Option<EntityId>, origin: Vec2) -> Option<(EntityId, f32)> {
        let mut nearest: Option<(EntityId, f32)> = None;
        for tank in self.tanks() {
            if Some(tank.id()) == exclude {
                continue;
            }
            let distance = origin.distance(tank.position());
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((tank.id(), distance));
            }
        }
        nearest
    }

    /// World width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// World height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}
