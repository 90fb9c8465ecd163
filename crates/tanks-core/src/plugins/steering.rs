//! Tank steering and fire control.
//!
//! # Supported Entity Types
//!
//! - Tanks
//! - Bots
//!
//! # Per-tick Order
//!
//! [`reload`](SteeringPlugin::reload) runs first, before any controller gets a
//! chance to fire, then [`drive`](SteeringPlugin::drive) turns by the track
//! differential and accelerates along the new facing.

use tracing::trace;

use crate::config::ShellConfig;
use crate::entity::components::{ShellComponents, TankComponents};
use crate::output::Command;
use crate::plugins::PluginContext;

/// Plugin that turns track inputs into motion and gates firing.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use tanks_core::config::ShellConfig;
/// use tanks_core::entity::{EntityId, TankComponents};
/// use tanks_core::plugins::{PluginContext, SteeringPlugin};
///
/// let plugin = SteeringPlugin::new();
/// let ctx = PluginContext::new(EntityId::new(1), 0);
/// let mut tank = TankComponents::at_position(Vec2::new(50.0, 50.0));
///
/// assert!(plugin.fire(&ctx, &mut tank, &ShellConfig::default()).is_some());
/// // Reloading: the second shot is refused
/// assert!(plugin.fire(&ctx, &mut tank, &ShellConfig::default()).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SteeringPlugin;

impl SteeringPlugin {
    /// Plugin name used in log fields.
    pub const ID: &'static str = "steering";

    /// Creates a new `SteeringPlugin`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Counts the reload timer down by one tick.
    pub fn reload(&self, tank: &mut TankComponents) {
        tank.tank.tick_reload();
    }

    /// Turns by the track differential, then accelerates along the facing.
    pub fn drive(&self, tank: &mut TankComponents) {
        let direction = tank.tank.steer();
        tank.movement.accelerate(direction);
    }

    /// Fires if loaded.
    ///
    /// Returns the shell to spawn, placed `size + 0.5` ahead of the hull
    /// along the facing, and starts the reload countdown. Returns `None`
    /// while reloading.
    pub fn fire(
        &self,
        ctx: &PluginContext,
        tank: &mut TankComponents,
        shell: &ShellConfig,
    ) -> Option<ShellComponents> {
        if !tank.tank.can_fire() {
            trace!(
                plugin = Self::ID,
                tank_id = %ctx.entity_id,
                tick = ctx.tick,
                reload_timer = tank.tank.reload_timer,
                "fire refused"
            );
            return None;
        }

        let muzzle = tank.tank.muzzle(&tank.body);
        tank.tank.start_reload();
        trace!(
            plugin = Self::ID,
            tank_id = %ctx.entity_id,
            tick = ctx.tick,
            angle = tank.tank.angle,
            "fired"
        );
        Some(ShellComponents::fired(
            muzzle,
            tank.tank.angle,
            tank.tank.shell_velocity,
            ctx.entity_id,
            shell,
        ))
    }

    /// Applies a control command. Returns the shell to spawn, if any.
    pub fn apply(
        &self,
        ctx: &PluginContext,
        tank: &mut TankComponents,
        command: Command,
        shell: &ShellConfig,
    ) -> Option<ShellComponents> {
        match command {
            Command::Turn { delta } => {
                tank.tank.turn(delta);
                None
            }
            Command::SetTracks { left, right } => {
                tank.tank.set_tracks(left, right);
                None
            }
            Command::Shoot => self.fire(ctx, tank, shell),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
