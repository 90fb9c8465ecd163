//! Commands addressed to tanks and events emitted by a tick.
//!
//! - [`Command`]: a tank control request. Bots plan commands through the
//!   targeting controller. External drivers send track and fire commands
//!   through [`World::apply_command`](crate::world::World::apply_command);
//!   hull turns are reserved for the bot controller.
//! - [`Event`]: a record of something that happened. Events accumulate in the
//!   world's [`EventLog`] in the order they occurred and are handed out by
//!   [`World::drain_events`](crate::world::World::drain_events). The log is
//!   bounded: once full, the oldest events are dropped.
//!
//! # Example
//!
//! ```
//! use tanks_core::output::{Command, Event, RemovalReason};
//! use tanks_core::entity::EntityId;
//!
//! let command = Command::SetTracks { left: 1.0, right: 0.5 };
//! assert!(!command.fires());
//!
//! let event = Event::Removed {
//!     entity: EntityId::new(3),
//!     reason: RemovalReason::OutOfBounds,
//! };
//! assert_eq!(event.subject(), EntityId::new(3));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{self, VecDeque};
use std::fmt;

use crate::entity::{EntityId, EntityTag};

// =============================================================================
// Commands
// =============================================================================

/// Tank control request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Turn the hull by `delta` radians, wrapping into `[0, 2π)`.
    ///
    /// Only the bot controller issues this, bounded by its rotation speed.
    /// [`World::apply_command`](crate::world::World::apply_command) rejects
    /// it; drivers steer with [`SetTracks`](Self::SetTracks).
    Turn {
        /// Signed rotation in radians
        delta: f32,
    },
    /// Set both track inputs; values are clamped to `[-1, 1]`.
    SetTracks {
        /// Left track input
        left: f32,
        /// Right track input
        right: f32,
    },
    /// Fire a shell if the gun is loaded.
    Shoot,
}

impl Command {
    /// Returns `true` for commands that may spawn a shell.
    #[must_use]
    pub const fn fires(&self) -> bool {
        matches!(self, Self::Shoot)
    }

    /// Returns `true` for commands an external driver may send.
    #[must_use]
    pub const fn is_driver_command(&self) -> bool {
        !matches!(self, Self::Turn { .. })
    }
}

// =============================================================================
// Events
// =============================================================================

/// Why an entity left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Health was depleted.
    Destroyed,
    /// A shell struck something and was spent.
    Expended,
    /// A shell touched the world boundary.
    OutOfBounds,
    /// The driver removed it through [`World::remove_entity`](crate::world::World::remove_entity).
    External,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destroyed => write!(f, "destroyed"),
            Self::Expended => write!(f, "expended"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::External => write!(f, "external"),
        }
    }
}

/// Something that happened during a tick or a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An entity was added to the world.
    Spawned {
        /// New entity
        entity: EntityId,
        /// Its type
        tag: EntityTag,
    },
    /// A tank fired.
    ShotFired {
        /// Tank that fired
        shooter: EntityId,
        /// Shell that was spawned
        shell: EntityId,
    },
    /// Two repellable entities were pushed apart or hard-stopped.
    Repelled {
        /// Entity whose collision scan found the contact
        entity: EntityId,
        /// Collision partner
        other: EntityId,
    },
    /// A shell damaged an entity.
    Hit {
        /// Shell that struck
        shell: EntityId,
        /// Entity that was struck
        target: EntityId,
        /// Damage dealt
        damage: i32,
        /// Target health after the hit
        remaining_health: i32,
    },
    /// A bot changed targets.
    TargetAcquired {
        /// Bot that re-targeted
        bot: EntityId,
        /// New target, `None` if no other tank is live
        target: Option<EntityId>,
    },
    /// An entity left the world.
    Removed {
        /// Entity that was removed
        entity: EntityId,
        /// Why it was removed
        reason: RemovalReason,
    },
}

impl Event {
    /// The entity the event is primarily about.
    #[must_use]
    pub const fn subject(&self) -> EntityId {
        match self {
            Self::Spawned { entity, .. }
            | Self::Repelled { entity, .. }
            | Self::Removed { entity, .. } => *entity,
            Self::ShotFired { shooter, .. } => *shooter,
            Self::Hit { target, .. } => *target,
            Self::TargetAcquired { bot, .. } => *bot,
        }
    }
}

// =============================================================================
// Event Log
// =============================================================================

/// Bounded FIFO of events waiting for a consumer.
///
/// Pushing into a full log drops the oldest event, so a driver that never
/// drains still runs in constant memory.
///
/// # Example
///
/// ```
/// use tanks_core::entity::EntityId;
/// use tanks_core::output::{Event, EventLog, RemovalReason};
///
/// let mut log = EventLog::new(2);
/// for n in 1..=3 {
///     log.push(Event::Removed {
///         entity: EntityId::new(n),
///         reason: RemovalReason::External,
///     });
/// }
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.dropped(), 1);
/// assert_eq!(log.iter().next().map(Event::subject), Some(EntityId::new(2)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    entries: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Appends an event, evicting the oldest one if the log is full.
    pub fn push(&mut self, event: Event) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(event);
    }

    /// Removes and returns every held event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        self.entries.drain(..).collect()
    }

    /// Held events, oldest first.
    #[must_use]
    pub fn iter(&self) -> vec_deque::Iter<'_, Event> {
        self.entries.iter()
    }

    /// Returns `true` if an equal event is held.
    #[must_use]
    pub fn contains(&self, event: &Event) -> bool {
        self.entries.contains(event)
    }

    /// Number of held events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no events are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most events held at once.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted or refused since the log was created.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Extend<Event> for EventLog {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = vec_deque::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
