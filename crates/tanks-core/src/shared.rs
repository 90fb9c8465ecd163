//! Thread-safe handle to a world.
//!
//! A game server usually runs the tick loop on one task and forwards player
//! commands from others. [`SharedWorld`] wraps the world in an
//! `Arc<Mutex<_>>` so every tick and command runs under one lock and ticks
//! are serialized.
//!
//! A panic while holding the lock does not wedge the world: the poisoned
//! guard is recovered and later calls see the world exactly as the panic left
//! it. A panic inside [`World::tick`] can leave that tick partly applied, with
//! some entities advanced and others not. Callers that need whole ticks must
//! not rely on the world after such a panic.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::entity::EntityId;
use crate::error::WorldError;
use crate::output::{Command, Event};
use crate::snapshot::WorldSnapshot;
use crate::world::World;

/// Cloneable, lock-protected handle to a [`World`].
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use tanks_core::shared::SharedWorld;
/// use tanks_core::world::World;
///
/// let shared = SharedWorld::new(World::default());
/// let tank = shared.with(|world| world.spawn_tank(Vec2::new(50.0, 50.0)));
///
/// let handle = shared.clone();
/// std::thread::spawn(move || handle.tick()).join().unwrap();
///
/// assert_eq!(shared.snapshot().tick, 1);
/// assert!(shared.snapshot().get(tank).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    /// Wraps a world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Locks the world for direct access.
    ///
    /// A poisoned lock is recovered as is; see the module docs.
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the world.
    pub fn with<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut self.lock())
    }

    /// Advances the world by one tick and returns the new tick count.
    pub fn tick(&self) -> u64 {
        let mut world = self.lock();
        world.tick();
        world.tick_count()
    }

    /// Applies a command under the lock.
    ///
    /// # Errors
    ///
    /// See [`World::apply_command`].
    pub fn apply_command(&self, id: EntityId, command: Command) -> Result<(), WorldError> {
        self.lock().apply_command(id, command)
    }

    /// Captures the current state under the lock.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.lock().snapshot()
    }

    /// Takes the pending events under the lock.
    #[must_use]
    pub fn drain_events(&self) -> Vec<Event> {
        self.lock().drain_events()
    }
}

impl From<World> for SharedWorld {
    fn from(world: World) -> Self {
        Self::new(world)
    }
}
