//! # Tanks Core
//!
//! Tick-driven simulation core for multiplayer tank combat.
//!
//! Tanks, shells and static props live in a bounded rectangle and advance one
//! discrete step per [`World::tick`]. The transport that drives the tick loop
//! and forwards player commands lives outside this crate; it talks to a
//! [`World`] (or a [`SharedWorld`] across threads) through spawn, command,
//! event and snapshot calls.
//!
//! ## Architecture
//!
//! - **Entities**: identity plus capability components (movement, repulsion,
//!   damage, health) bundled per entity type
//! - **Plugins**: per-entity behaviour (tank steering, bot targeting)
//! - **Resolvers**: collision reactions (repulsion, shell hits)
//! - **World**: ownership, the tick pipeline, boundary rules, events
//!
//! Collision detection is a brute-force all-pairs scan by design.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use tanks_core::{Event, World};
//!
//! let mut world = World::default();
//! let player = world.spawn_tank(Vec2::new(20.0, 50.0));
//! let _bot = world.spawn_bot(Vec2::new(60.0, 50.0));
//!
//! world.set_tracks(player, 1.0, 1.0)?;
//! for _ in 0..30 {
//!     world.tick();
//! }
//!
//! let events = world.drain_events();
//! assert!(events.iter().any(|e| matches!(e, Event::TargetAcquired { .. })));
//! # Ok::<(), tanks_core::WorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entity;
pub mod error;
pub mod manager;
pub mod output;
pub mod plugins;
pub mod resolver;
pub mod shared;
pub mod snapshot;
pub mod world;
pub mod world_view;

pub use config::GameConfig;
pub use entity::{Entity, EntityId, EntityInner, EntityTag};
pub use error::{ConfigError, WorldError};
pub use output::{Command, Event, EventLog, RemovalReason};
pub use shared::SharedWorld;
pub use snapshot::{EntitySnapshot, WorldSnapshot};
pub use world::World;

#[cfg(test)]
mod tests;
