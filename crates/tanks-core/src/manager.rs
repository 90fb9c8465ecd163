//! Entity storage for a world.
//!
//! The [`EntityManager`] owns every live entity and provides:
//! - Insertion-ordered iteration (`BTreeMap` keyed by an insertion sequence)
//! - O(log n) lookup by [`EntityId`] through a side index
//! - Id generation from a seeded ChaCha generator
//! - The single removal path, which runs the entity's removal hook
//!
//! # Iteration and Mutation
//!
//! Tick code never holds an iterator across a mutation. It takes an id
//! snapshot with [`ids`](EntityManager::ids), then re-fetches each entity with
//! [`get_mut`](EntityManager::get_mut) and skips ids that have since been
//! removed. Entities inserted after the snapshot are visible to lookups and
//! later snapshots but are not part of the one being walked.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tanks_core::entity::{Entity, EntityInner, PropComponents};
//! use tanks_core::manager::EntityManager;
//!
//! let mut manager = EntityManager::new(7);
//! let id = manager.generate_id();
//! manager
//!     .insert(Entity::new(id, EntityInner::Prop(PropComponents::new(Vec2::ZERO, 1.0))))
//!     .unwrap();
//!
//! assert!(manager.contains(id));
//! assert!(manager.remove(id).is_some());
//! assert!(manager.remove(id).is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::entity::{Entity, EntityId, EntityInner};
use crate::error::WorldError;

/// Owner of all live entities, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct EntityManager {
    /// Entities keyed by insertion sequence.
    entities: BTreeMap<u64, Entity>,
    /// Id to insertion sequence.
    index: HashMap<EntityId, u64>,
    /// Next insertion sequence number.
    next_seq: u64,
    /// Deterministic id generator.
    rng: ChaCha8Rng,
}

impl EntityManager {
    /// Creates an empty manager whose id generator is seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            entities: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws a random id that no live entity holds.
    pub fn generate_id(&mut self) -> EntityId {
        loop {
            let id = EntityId::new(self.rng.next_u64());
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Adds an entity at the end of the iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Removed`] if the entity has already been through
    /// removal, or [`WorldError::DuplicateId`] if an entity with the same id
    /// is already live. The manager is left unchanged on error.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let id = entity.id();
        // Removal is terminal
        if entity.is_removed() {
            return Err(WorldError::Removed(id));
        }
        if self.index.contains_key(&id) {
            return Err(WorldError::DuplicateId(id));
        }

        self.push(entity);
        Ok(id)
    }

    /// Adds a new entity under a freshly generated id.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = self.generate_id();
        self.push(Entity::new(id, inner));
        id
    }

    fn push(&mut self, entity: Entity) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(entity.id(), seq);
        trace!(entity_id = %entity.id(), tag = %entity.tag(), "entity stored");
        self.entities.insert(seq, entity);
    }

    /// Removes an entity, running its removal hook first.
    ///
    /// Returns `None` if the id is not live, so a second removal is a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let seq = *self.index.get(&id)?;
        if let Some(entity) = self.entities.get_mut(&seq) {
            entity.on_remove();
        }

        self.index.remove(&id);
        let removed = self.entities.remove(&seq);
        if let Some(entity) = &removed {
            debug!(entity_id = %id, tag = %entity.tag(), "entity removed");
        }
        removed
    }

    /// Returns a reference to a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).and_then(|seq| self.entities.get(seq))
    }

    /// Returns a mutable reference to a live entity.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let seq = self.index.get(&id)?;
        self.entities.get_mut(seq)
    }

    /// Returns `true` if the id belongs to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Snapshot of live ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.values().map(Entity::id).collect()
    }

    /// Iterates live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{PropComponents, TankComponents};
    use glam::Vec2;

    fn prop(id: EntityId) -> Entity {
        Entity::new(id, EntityInner::Prop(PropComponents::new(Vec2::ZERO, 1.0)))
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut manager = EntityManager::new(0);
        let ids = [900, 3, 500, 1].map(EntityId::new);
        for id in ids {
            manager.insert(prop(id)).unwrap();
        }

        assert_eq!(manager.ids(), ids.to_vec());
        let iterated: Vec<_> = manager.iter().map(Entity::id).collect();
        assert_eq!(iterated, ids.to_vec());
    }

    #[test]
    fn removal_preserves_remaining_order() {
        let mut manager = EntityManager::new(0);
        let ids = [10, 20, 30].map(EntityId::new);
        for id in ids {
            manager.insert(prop(id)).unwrap();
        }

        manager.remove(EntityId::new(20));
        manager.insert(prop(EntityId::new(20))).unwrap();

        assert_eq!(manager.ids(), [10, 30, 20].map(EntityId::new).to_vec());
    }

    #[test]
    fn removed_entity_cannot_be_reinserted() {
        let mut manager = EntityManager::new(0);
        let id = EntityId::new(8);
        manager.insert(prop(id)).unwrap();
        let removed = manager.remove(id).unwrap();

        assert_eq!(manager.insert(removed), Err(WorldError::Removed(id)));
        assert!(!manager.contains(id));
        assert!(manager.is_empty());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut manager = EntityManager::new(0);
        let id = EntityId::new(5);
        manager.insert(prop(id)).unwrap();

        assert_eq!(manager.insert(prop(id)), Err(WorldError::DuplicateId(id)));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn remove_runs_hook_and_is_idempotent() {
        let mut manager = EntityManager::new(0);
        let id = manager.generate_id();
        let mut tank = TankComponents::at_position(Vec2::ONE);
        tank.tank.set_tracks(1.0, 1.0);
        manager.insert(Entity::new(id, EntityInner::Tank(tank))).unwrap();

        let removed = manager.remove(id).unwrap();
        assert!(removed.is_removed());
        assert_eq!(removed.as_tank().unwrap().tank.left_track, 0.0);

        assert!(manager.remove(id).is_none());
        assert!(manager.get(id).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn generated_ids_are_seeded() {
        let mut a = EntityManager::new(42);
        let mut b = EntityManager::new(42);
        let mut c = EntityManager::new(43);

        let from_a: Vec<_> = (0..5).map(|_| a.generate_id()).collect();
        let from_b: Vec<_> = (0..5).map(|_| b.generate_id()).collect();
        let from_c: Vec<_> = (0..5).map(|_| c.generate_id()).collect();

        assert_eq!(from_a, from_b);
        assert_ne!(from_a, from_c);
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut manager = EntityManager::new(0);
        let id = manager.generate_id();
        manager.insert(prop(id)).unwrap();

        manager.get_mut(id).unwrap().inner_mut().body_mut().position = Vec2::new(3.0, 4.0);

        assert_eq!(manager.get(id).unwrap().position(), Vec2::new(3.0, 4.0));
    }
}
