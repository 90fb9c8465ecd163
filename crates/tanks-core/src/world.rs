//! The world: entity ownership, the tick pipeline and the caller surface.
//!
//! # Tick Pipeline
//!
//! [`World::tick`] walks a snapshot of live ids in insertion order. For each
//! id that is still live it runs, in order:
//!
//! 1. **Behaviour**: reload countdown, bot controller (bots only), tracked
//!    steering (tanks and bots)
//! 2. **Collision scan**: every other live entity whose circle strictly
//!    overlaps this one is handed to this entity's resolver
//! 3. **Integration**: `position += velocity`, then friction
//!
//! After the pass, a fresh snapshot is checked against the world bounds.
//! Shells leave the world on contact with an edge; tanks stay put unless
//! configured to clamp.
//!
//! # Mid-tick Changes
//!
//! - Removed entities are skipped for the rest of the tick
//! - A scan stops as soon as the scanning entity itself is removed
//! - Shells fired mid-tick are live immediately (later scans see them) but
//!   are first ticked on the next tick
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tanks_core::world::World;
//!
//! let mut world = World::default();
//! let tank = world.spawn_tank(Vec2::new(50.0, 50.0));
//! world.set_tracks(tank, 1.0, 1.0).unwrap();
//!
//! for _ in 0..10 {
//!     world.tick();
//! }
//!
//! assert_eq!(world.tick_count(), 10);
//! assert!(world.get(tank).unwrap().position().x > 50.0);
//! ```

use glam::Vec2;
use tracing::{debug, debug_span, trace};

use crate::config::{GameConfig, WorldConfig};
use crate::entity::components::{BotComponents, PropComponents, ShellComponents, TankComponents};
use crate::entity::{Entity, EntityId, EntityInner, EntityTag};
use crate::error::WorldError;
use crate::manager::EntityManager;
use crate::output::{Command, Event, EventLog, RemovalReason};
use crate::plugins::{PluginContext, SteeringPlugin, TargetingPlugin};
use crate::resolver::{self, PhysicsResolver};
use crate::snapshot::WorldSnapshot;
use crate::world_view::WorldView;

// =============================================================================
// World
// =============================================================================

/// A bounded rectangle of entities advanced one tick at a time.
///
/// `tick` takes `&mut self`, so two ticks can never overlap on one world.
/// Share a world across threads with [`SharedWorld`](crate::shared::SharedWorld).
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    entities: EntityManager,
    tick: u64,
    /// Events raised by the call in progress, moved to `log` before it returns.
    events: Vec<Event>,
    log: EventLog,
    steering: SteeringPlugin,
    targeting: TargetingPlugin,
}

impl World {
    /// Creates an empty world with stock entity tuning.
    ///
    /// Dimensions are taken as given; use [`with_config`](Self::with_config)
    /// to validate them.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self::build(GameConfig {
            world: config,
            ..GameConfig::default()
        })
    }

    /// Creates an empty world after validating every tuning value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if validation fails.
    pub fn with_config(config: GameConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GameConfig) -> Self {
        debug!(
            width = config.world.width,
            height = config.world.height,
            seed = config.world.seed,
            "world created"
        );
        Self {
            entities: EntityManager::new(config.world.seed),
            log: EventLog::new(config.world.event_capacity),
            config,
            tick: 0,
            events: Vec::new(),
            steering: SteeringPlugin::new(),
            targeting: TargetingPlugin::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// World width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.config.world.width
    }

    /// World height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.config.world.height
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Returns a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Returns a live entity for direct modification.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Live entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Read-only view for planners and queries.
    #[must_use]
    pub fn view(&self) -> WorldView<'_> {
        WorldView::new(&self.entities, self.width(), self.height(), self.tick)
    }

    /// Events recorded since the last drain, oldest first.
    ///
    /// Holds at most `WorldConfig::event_capacity` events; older ones are
    /// dropped as new ones arrive.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Takes every event held since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.log.drain()
    }

    /// Moves events raised by the current call into the bounded log.
    fn flush_events(&mut self) {
        let before = self.log.dropped();
        self.log.extend(self.events.drain(..));
        let dropped = self.log.dropped() - before;
        if dropped > 0 {
            trace!(dropped, total = self.log.dropped(), "event log full");
        }
    }

    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.tick, self.width(), self.height(), self.entities.iter())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Adds an entity built by the caller, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateId`] if the id is already live, or
    /// [`WorldError::Removed`] for an entity handed back by
    /// [`remove_entity`](Self::remove_entity).
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let tag = entity.tag();
        let id = self.entities.insert(entity)?;
        self.record_spawn(id, tag);
        self.flush_events();
        Ok(id)
    }

    /// Removes an entity. Returns `None` if it was not live.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        self.events.push(Event::Removed {
            entity: id,
            reason: RemovalReason::External,
        });
        self.flush_events();
        Some(removed)
    }

    /// Adds an entity under a generated id.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let tag = inner.tag();
        let id = self.entities.spawn(inner);
        self.record_spawn(id, tag);
        self.flush_events();
        id
    }

    /// Spawns a player tank with the configured tank tuning.
    pub fn spawn_tank(&mut self, position: Vec2) -> EntityId {
        let tank = TankComponents::from_config(position, &self.config.tank);
        self.spawn(EntityInner::Tank(tank))
    }

    /// Spawns an autonomous bot with the configured tank and bot tuning.
    pub fn spawn_bot(&mut self, position: Vec2) -> EntityId {
        let bot = BotComponents::from_config(position, &self.config.tank, &self.config.bot);
        self.spawn(EntityInner::Bot(bot))
    }

    /// Spawns a static obstacle.
    pub fn spawn_prop(&mut self, position: Vec2, size: f32) -> EntityId {
        self.spawn(EntityInner::Prop(PropComponents::new(position, size)))
    }

    fn record_spawn(&mut self, id: EntityId, tag: EntityTag) {
        debug!(entity_id = %id, %tag, tick = self.tick, "spawned");
        self.events.push(Event::Spawned { entity: id, tag });
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Sets a tank's track inputs, clamped to `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] or [`WorldError::NotATank`].
    pub fn set_tracks(&mut self, id: EntityId, left: f32, right: f32) -> Result<(), WorldError> {
        self.apply_command(id, Command::SetTracks { left, right })
    }

    /// Fires a tank's gun. Shooting while reloading is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] or [`WorldError::NotATank`].
    pub fn shoot(&mut self, id: EntityId) -> Result<(), WorldError> {
        self.apply_command(id, Command::Shoot)
    }

    /// Applies a control command to a tank or bot.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnsupportedCommand`] for [`Command::Turn`],
    /// [`WorldError::UnknownEntity`] if the id is not live, or
    /// [`WorldError::NotATank`] if the entity does not take commands.
    pub fn apply_command(&mut self, id: EntityId, command: Command) -> Result<(), WorldError> {
        if !command.is_driver_command() {
            return Err(WorldError::UnsupportedCommand { id, command });
        }
        let entity = self
            .entities
            .get(id)
            .ok_or(WorldError::UnknownEntity(id))?;
        if !entity.is_tank() {
            return Err(WorldError::NotATank {
                id,
                tag: entity.tag(),
            });
        }
        self.execute(id, command);
        self.flush_events();
        Ok(())
    }

    /// Runs a command against a live tank; silently ignores anything else.
    fn execute(&mut self, id: EntityId, command: Command) {
        let ctx = PluginContext::new(id, self.tick);
        let Some(tank) = self.entities.get_mut(id).and_then(Entity::as_tank_mut) else {
            return;
        };
        if let Some(shell) = self
            .steering
            .apply(&ctx, tank, command, &self.config.shell)
        {
            self.fire(id, shell);
        }
    }

    fn fire(&mut self, shooter: EntityId, shell: ShellComponents) {
        let shell_id = self.spawn(EntityInner::Shell(shell));
        debug!(
            shooter_id = %shooter,
            shell_id = %shell_id,
            x = shell.body.position.x,
            y = shell.body.position.y,
            "shot fired"
        );
        self.events.push(Event::ShotFired {
            shooter,
            shell: shell_id,
        });
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the world by one tick.
    pub fn tick(&mut self) {
        let span = debug_span!("tick", tick = self.tick, entities = self.entities.len());
        let _enter = span.enter();

        for id in self.entities.ids() {
            if !self.entities.contains(id) {
                continue;
            }
            self.run_behaviour(id);
            self.scan_collisions(id);
            PhysicsResolver::integrate(&mut self.entities, id);
        }

        self.enforce_boundaries();
        self.flush_events();
        self.tick += 1;
    }

    fn run_behaviour(&mut self, id: EntityId) {
        let ctx = PluginContext::new(id, self.tick);

        let Some(tank) = self.entities.get_mut(id).and_then(Entity::as_tank_mut) else {
            return;
        };
        self.steering.reload(tank);

        self.run_controller(&ctx);

        if let Some(tank) = self.entities.get_mut(id).and_then(Entity::as_tank_mut) {
            self.steering.drive(tank);
        }
    }

    /// Plans and applies a bot's commands. No-op for anything but bots.
    fn run_controller(&mut self, ctx: &PluginContext) {
        let id = ctx.entity_id;
        let Some(bot) = self.entities.get(id).and_then(Entity::as_bot) else {
            return;
        };

        let mut targeting = bot.targeting;
        let previous = targeting.target;
        let view = WorldView::new(&self.entities, self.width(), self.height(), self.tick);
        let commands = self.targeting.run(ctx, &bot.tank, &mut targeting, &view);

        if let Some(bot) = self.entities.get_mut(id).and_then(|e| e.inner_mut().as_bot_mut()) {
            bot.targeting = targeting;
        }
        if targeting.target != previous {
            debug!(bot_id = %id, target = ?targeting.target, "target acquired");
            self.events.push(Event::TargetAcquired {
                bot: id,
                target: targeting.target,
            });
        }

        for command in commands {
            self.execute(id, command);
        }
    }

    fn scan_collisions(&mut self, id: EntityId) {
        let Some(resolver) = self
            .entities
            .get(id)
            .and_then(|e| resolver::resolver_for(e.capabilities()))
        else {
            return;
        };

        for other in self.entities.ids() {
            if other == id {
                continue;
            }
            // Stop once this entity has been removed by its own collision
            let Some(this) = self.entities.get(id) else {
                break;
            };
            let Some(that) = self.entities.get(other) else {
                continue;
            };
            if !this.body().overlaps(that.body()) {
                continue;
            }

            trace!(entity_id = %id, other_id = %other, "collision");
            resolver.resolve(id, other, &mut self.entities, &mut self.events);
        }
    }

    fn enforce_boundaries(&mut self) {
        let (width, height) = (self.width(), self.height());

        for id in self.entities.ids() {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if !PhysicsResolver::touches_boundary(entity.body(), width, height) {
                continue;
            }

            match entity.tag() {
                EntityTag::Shell => {
                    resolver::remove_entity(
                        &mut self.entities,
                        &mut self.events,
                        id,
                        RemovalReason::OutOfBounds,
                    );
                }
                EntityTag::Tank | EntityTag::Bot => {
                    if let Some(tank) = self.entities.get_mut(id).and_then(Entity::as_tank_mut) {
                        if tank.tank.clamp_to_world {
                            PhysicsResolver::clamp_to_world(tank, width, height);
                        }
                    }
                }
                EntityTag::Prop => {}
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
