//! Autonomous bot controller.
//!
//! # Supported Entity Types
//!
//! - Bots
//!
//! # Behaviour
//!
//! Every `update_target_interval` ticks the bot re-acquires the nearest other
//! tank. With a live target it turns toward it by at most its rotation speed,
//! drives at full speed while out of `attack_range`, and fires once in range
//! and aimed within `aim_tolerance`.
//!
//! # Outputs
//!
//! - `Command::Turn`: when the bearing error exceeds the rotation speed
//! - `Command::SetTracks`: full forward while out of range
//! - `Command::Shoot`: in range and aimed

use std::f32::consts::{PI, TAU};

use tracing::trace;

use crate::entity::components::{TankComponents, TargetingState};
use crate::output::Command;
use crate::plugins::PluginContext;
use crate::world_view::WorldView;

/// Plugin that plans bot commands from a read-only view of the world.
///
/// The plugin never touches the world. It updates the bot's own
/// [`TargetingState`] and returns the commands to apply, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetingPlugin;

impl TargetingPlugin {
    /// Plugin name used in log fields.
    pub const ID: &'static str = "targeting";

    /// Creates a new `TargetingPlugin`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Plans this tick's commands for the bot `ctx.entity_id`.
    ///
    /// `tank` is the bot's own tank state as it stands after the reload
    /// countdown. `targeting` is updated in place (refresh counter, cached
    /// target).
    #[must_use]
    pub fn run(
        &self,
        ctx: &PluginContext,
        tank: &TankComponents,
        targeting: &mut TargetingState,
        view: &WorldView,
    ) -> Vec<Command> {
        let origin = tank.body.position;

        if targeting.refresh_due() {
            targeting.target = view
                .nearest_tank(Some(ctx.entity_id), origin)
                .map(|(id, _)| id);
        }

        // A dead target is treated as absent until the next refresh
        let Some(target_pos) = targeting.target.and_then(|id| view.position(id)) else {
            targeting.target = None;
            return Vec::new();
        };

        let mut commands = Vec::with_capacity(2);

        let offset = target_pos - origin;
        let distance = offset.length();
        let bearing = offset.y.atan2(offset.x);

        let mut facing = tank.tank.angle;
        let bearing_error = normalize_angle(bearing - facing);
        if bearing_error.abs() > targeting.rotation_speed {
            let delta = targeting.rotation_speed.copysign(bearing_error);
            commands.push(Command::Turn { delta });
            facing += delta;
        }

        if distance > targeting.attack_range {
            commands.push(Command::SetTracks {
                left: 1.0,
                right: 1.0,
            });
        } else if normalize_angle(bearing - facing).abs() < targeting.aim_tolerance {
            commands.push(Command::Shoot);
        }

        trace!(
            plugin = Self::ID,
            bot_id = %ctx.entity_id,
            tick = ctx.tick,
            distance,
            bearing_error,
            commands = commands.len(),
            "bot planned"
        );
        commands
    }
}

/// Wraps an angle difference into `[-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityId, EntityInner, TankComponents};
    use crate::manager::EntityManager;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    const BOT: EntityId = EntityId::new(1);
    const TARGET: EntityId = EntityId::new(2);

    fn manager(bot: Vec2, target: Vec2) -> EntityManager {
        let mut manager = EntityManager::new(0);
        manager
            .insert(Entity::new(BOT, EntityInner::Tank(TankComponents::at_position(bot))))
            .unwrap();
        manager
            .insert(Entity::new(
                TARGET,
                EntityInner::Tank(TankComponents::at_position(target)),
            ))
            .unwrap();
        manager
    }

    fn plan(
        manager: &EntityManager,
        tank: &TankComponents,
        targeting: &mut TargetingState,
    ) -> Vec<Command> {
        let view = WorldView::new(manager, 100.0, 100.0, 0);
        TargetingPlugin::new().run(&PluginContext::new(BOT, 0), tank, targeting, &view)
    }

    /// Targeting state whose next call performs a refresh.
    fn refresh_next() -> TargetingState {
        let mut targeting = TargetingState::default();
        targeting.ticks_since_target_update = targeting.update_target_interval - 1;
        targeting
    }

    mod acquisition_tests {
        use super::*;

        #[test]
        fn no_target_before_first_refresh() {
            let manager = manager(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0));
            let tank = TankComponents::at_position(Vec2::new(10.0, 50.0));
            let mut targeting = TargetingState::default();

            for _ in 0..9 {
                assert!(plan(&manager, &tank, &mut targeting).is_empty());
            }
            assert!(targeting.target.is_none());

            assert!(!plan(&manager, &tank, &mut targeting).is_empty());
            assert_eq!(targeting.target, Some(TARGET));
            assert_eq!(targeting.ticks_since_target_update, 0);
        }

        #[test]
        fn dead_target_is_dropped() {
            let mut manager = manager(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0));
            let tank = TankComponents::at_position(Vec2::new(10.0, 50.0));
            let mut targeting = refresh_next();
            plan(&manager, &tank, &mut targeting);
            assert_eq!(targeting.target, Some(TARGET));

            manager.remove(TARGET);

            assert!(plan(&manager, &tank, &mut targeting).is_empty());
            assert!(targeting.target.is_none());
        }
    }

    mod pursuit_tests {
        use super::*;

        #[test]
        fn out_of_range_drives_forward() {
            let manager = manager(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0));
            let tank = TankComponents::at_position(Vec2::new(10.0, 50.0));
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(
                commands,
                vec![Command::SetTracks {
                    left: 1.0,
                    right: 1.0
                }]
            );
        }

        #[test]
        fn turns_by_rotation_speed_toward_target() {
            let manager = manager(Vec2::new(50.0, 10.0), Vec2::new(50.0, 90.0));
            let tank = TankComponents::at_position(Vec2::new(50.0, 10.0));
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(commands[0], Command::Turn { delta: 0.1 });
        }

        #[test]
        fn turns_the_short_way_round() {
            let manager = manager(Vec2::new(50.0, 90.0), Vec2::new(50.0, 10.0));
            let mut tank = TankComponents::at_position(Vec2::new(50.0, 90.0));
            // Target straight down; turning positive is π - 0.5, negative is π + 0.5
            tank.tank.angle = FRAC_PI_2 + 0.5;
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(commands[0], Command::Turn { delta: 0.1 });
        }

        #[test]
        fn small_error_does_not_turn() {
            let manager = manager(Vec2::new(50.0, 50.0), Vec2::new(60.0, 50.5));
            let tank = TankComponents::at_position(Vec2::new(50.0, 50.0));
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(commands, vec![Command::Shoot]);
        }

        #[test]
        fn in_range_but_misaimed_holds_fire() {
            let manager = manager(Vec2::new(50.0, 50.0), Vec2::new(50.0, 60.0));
            let tank = TankComponents::at_position(Vec2::new(50.0, 50.0));
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(commands, vec![Command::Turn { delta: 0.1 }]);
        }

        #[test]
        fn aim_check_sees_wrapped_angle() {
            // Facing just under 2π, target just above the +X axis
            let manager = manager(Vec2::new(50.0, 50.0), Vec2::new(60.0, 50.5));
            let mut tank = TankComponents::at_position(Vec2::new(50.0, 50.0));
            tank.tank.angle = TAU - 0.02;
            let mut targeting = refresh_next();

            let commands = plan(&manager, &tank, &mut targeting);

            assert_eq!(commands, vec![Command::Shoot]);
        }
    }

    mod normalize_angle_tests {
        use super::*;

        #[test]
        fn wraps_into_half_open_range() {
            assert!((normalize_angle(3.0 * PI / 2.0) + FRAC_PI_2).abs() < 1e-5);
            assert!((normalize_angle(-3.0 * PI / 2.0) - FRAC_PI_2).abs() < 1e-5);
            assert!((normalize_angle(0.05) - 0.05).abs() < 1e-6);
        }

        #[test]
        fn stays_within_bounds() {
            for i in -100..100 {
                #[allow(clippy::cast_precision_loss)]
                let a = normalize_angle(i as f32 * 0.37);
                assert!((-PI..=PI).contains(&a), "{a}");
            }
        }
    }
}
