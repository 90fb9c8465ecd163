//! Test helper functions for setting up worlds and reading entity state.

use glam::Vec2;

use crate::config::{GameConfig, TankConfig};
use crate::entity::{EntityId, EntityTag};
use crate::output::Event;
use crate::world::World;

// =============================================================================
// Setup
// =============================================================================

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// World with tank tuning overridden by `tank`.
pub fn world_with_tanks(tank: TankConfig) -> World {
    World::with_config(GameConfig {
        tank,
        ..GameConfig::default()
    })
    .expect("test config is valid")
}

/// Two stock tanks whose centres are `gap` apart along X, around (50, 50).
pub fn setup_tank_pair(world: &mut World, gap: f32) -> (EntityId, EntityId) {
    let left = world.spawn_tank(Vec2::new(50.0 - gap / 2.0, 50.0));
    let right = world.spawn_tank(Vec2::new(50.0 + gap / 2.0, 50.0));
    (left, right)
}

/// Runs `n` ticks.
pub fn run_ticks(world: &mut World, n: usize) {
    for _ in 0..n {
        world.tick();
    }
}

// =============================================================================
// Accessors
// =============================================================================

/// Position of a live entity.
pub fn position(world: &World, id: EntityId) -> Vec2 {
    world.get(id).expect("entity is live").position()
}

/// Velocity of a live movable entity.
pub fn velocity(world: &World, id: EntityId) -> Vec2 {
    world
        .get(id)
        .and_then(|e| e.movement())
        .expect("entity is live and movable")
        .velocity
}

/// Health of a live damageable entity.
pub fn health(world: &World, id: EntityId) -> i32 {
    world
        .get(id)
        .and_then(|e| e.health())
        .expect("entity is live and damageable")
        .health
}

/// Reload timer of a live tank or bot.
pub fn reload_timer(world: &World, id: EntityId) -> u32 {
    world
        .get(id)
        .and_then(|e| e.as_tank())
        .expect("entity is a live tank")
        .tank
        .reload_timer
}

/// Ids of live shells in insertion order.
pub fn shells(world: &World) -> Vec<EntityId> {
    world
        .entities()
        .filter(|e| e.tag() == EntityTag::Shell)
        .map(|e| e.id())
        .collect()
}

/// Number of `ShotFired` events in `events`.
pub fn shots_fired<'a>(events: impl IntoIterator<Item = &'a Event>) -> usize {
    events
        .into_iter()
        .filter(|e| matches!(e, Event::ShotFired { .. }))
        .count()
}
