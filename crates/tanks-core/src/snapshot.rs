//! Serializable snapshot of world state.
//!
//! A [`WorldSnapshot`] is a plain-data copy of everything a client needs to
//! draw the battlefield. It holds no references into the world, so it can be
//! taken under a lock and serialized after the lock is released.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityTag};

/// Per-entity state captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Entity type.
    pub tag: EntityTag,
    /// Centre.
    pub position: Vec2,
    /// Collision radius.
    pub size: f32,
    /// Velocity, for movable entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2>,
    /// Hull facing, for tanks and bots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    /// Remaining health, for damageable entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    /// Ticks until the gun is loaded, for tanks and bots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_timer: Option<u32>,
    /// Current target, for bots that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EntityId>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        let body = entity.body();
        let tank = entity.as_tank();
        Self {
            id: entity.id(),
            tag: entity.tag(),
            position: body.position,
            size: body.size,
            velocity: entity.movement().map(|m| m.velocity),
            angle: tank.map(|t| t.tank.angle),
            health: entity.health().map(|h| h.health),
            reload_timer: tank.map(|t| t.tank.reload_timer),
            target: entity.as_bot().and_then(|b| b.targeting.target),
        }
    }
}

/// State of the whole world after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed.
    pub tick: u64,
    /// World width.
    pub width: f32,
    /// World height.
    pub height: f32,
    /// Live entities in insertion order.
    pub entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    /// Captures the given entities.
    pub fn capture<'a>(
        tick: u64,
        width: f32,
        height: f32,
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> Self {
        Self {
            tick,
            width,
            height,
            entities: entities.into_iter().map(EntitySnapshot::from).collect(),
        }
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Number of entities with the given tag.
    #[must_use]
    pub fn count(&self, tag: EntityTag) -> usize {
        self.entities.iter().filter(|e| e.tag == tag).count()
    }
}
