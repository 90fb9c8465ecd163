//! Integration tests for the full tick pipeline.
//!
//! These tests drive a [`World`] end-to-end:
//! - Collision detection and repulsion between tanks
//! - Fire control, shell flight and damage
//! - Removal and insertion order
//! - Bot pursuit and engagement

use std::f32::consts::PI;

use glam::Vec2;

use crate::config::{ShellConfig, TankConfig};
use crate::entity::components::{ShellComponents, TankComponents};
use crate::entity::{EntityId, EntityInner};
use crate::output::{Event, RemovalReason};
use crate::plugins::normalize_angle;
use crate::world::World;

use super::helpers::{
    health, init_tracing, position, reload_timer, run_ticks, setup_tank_pair, shells,
    shots_fired, velocity, world_with_tanks,
};

fn spawn_shell(world: &mut World, at: Vec2, angle: f32, speed: f32, creator: EntityId) -> EntityId {
    world.spawn(EntityInner::Shell(ShellComponents::fired(
        at,
        angle,
        speed,
        creator,
        &ShellConfig::default(),
    )))
}

fn repelled_by(events: &[Event], id: EntityId) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Repelled { entity, .. } if *entity == id))
        .count()
}

// =============================================================================
// Collisions
// =============================================================================

mod collision_tests {
    use super::*;

    #[test]
    fn touching_circles_do_not_collide() {
        let mut world = World::default();
        let (left, right) = setup_tank_pair(&mut world, 2.0);

        world.tick();

        let events = world.drain_events();
        assert_eq!(repelled_by(&events, left), 0);
        assert_eq!(repelled_by(&events, right), 0);
        assert_eq!(velocity(&world, left), Vec2::ZERO);
    }

    #[test]
    fn each_entity_resolves_its_own_collision() {
        let mut world = World::default();
        let (left, right) = setup_tank_pair(&mut world, 1.0);

        world.tick();

        let events = world.drain_events();
        assert_eq!(repelled_by(&events, left), 1);
        assert_eq!(repelled_by(&events, right), 1);
    }

    #[test]
    fn overlapping_tanks_are_pushed_apart() {
        init_tracing();
        let mut world = World::default();
        let (left, right) = setup_tank_pair(&mut world, 1.0);

        world.tick();

        let v_left = velocity(&world, left);
        let v_right = velocity(&world, right);
        assert!(v_left.x < 0.0);
        assert!(v_right.x > 0.0);
        assert_eq!(v_left.y, 0.0);
        assert_eq!(v_right.y, 0.0);
        assert!(v_left.length() <= 3.0 + 1e-5);
        assert!(v_right.length() <= 3.0 + 1e-5);
        assert!(position(&world, left).x < 49.5);
        assert!(position(&world, right).x > 50.5);
    }

    #[test]
    fn zero_repel_force_stops_both_tanks() {
        let mut world = world_with_tanks(TankConfig {
            repel_force: 0.0,
            ..TankConfig::default()
        });
        let left = world.spawn_tank(Vec2::new(49.25, 50.0));
        let mut facing_left =
            TankComponents::from_config(Vec2::new(50.75, 50.0), &world.config().tank);
        facing_left.tank.angle = PI;
        let right = world.spawn(EntityInner::Tank(facing_left));
        world.set_tracks(left, 1.0, 1.0).unwrap();
        world.set_tracks(right, 1.0, 1.0).unwrap();

        world.tick();

        assert_eq!(velocity(&world, left), Vec2::ZERO);
        assert_eq!(velocity(&world, right), Vec2::ZERO);
    }

    #[test]
    fn props_are_inert() {
        let mut world = World::default();
        let prop = world.spawn_prop(Vec2::new(50.0, 50.0), 3.0);
        let tank = world.spawn_tank(Vec2::new(51.0, 50.0));

        run_ticks(&mut world, 5);

        assert_eq!(position(&world, prop), Vec2::new(50.0, 50.0));
        assert_eq!(velocity(&world, tank), Vec2::ZERO);
    }
}

// =============================================================================
// Shells
// =============================================================================

mod shell_tests {
    use super::*;

    #[test]
    fn shell_advances_by_velocity_until_boundary() {
        let mut world = World::default();
        let creator = EntityId::new(0);
        let shell = spawn_shell(&mut world, Vec2::new(10.0, 50.0), 0.0, 3.0, creator);

        for k in 1..30 {
            world.tick();
            #[allow(clippy::cast_precision_loss)]
            let expected = Vec2::new(10.0 + 3.0 * k as f32, 50.0);
            assert_eq!(position(&world, shell), expected);
        }

        // x = 100 touches the edge
        world.tick();
        assert!(world.get(shell).is_none());
        assert!(world.events().contains(&Event::Removed {
            entity: shell,
            reason: RemovalReason::OutOfBounds,
        }));
    }

    #[test]
    fn shell_ignores_its_creator() {
        let mut world = World::default();
        let tank = world.spawn_tank(Vec2::new(50.0, 50.0));
        let shell = spawn_shell(&mut world, Vec2::new(50.5, 50.0), PI / 2.0, 0.0, tank);

        world.tick();

        assert!(world.get(shell).is_some());
        assert_eq!(health(&world, tank), 100);
    }

    #[test]
    fn shell_damages_and_is_spent() {
        let mut world = World::default();
        let shooter = world.spawn_tank(Vec2::new(10.0, 10.0));
        let victim = world.spawn_tank(Vec2::new(50.0, 50.0));
        let shell = spawn_shell(&mut world, Vec2::new(50.5, 50.0), 0.0, 0.0, shooter);

        world.tick();

        assert_eq!(health(&world, victim), 90);
        assert!(world.get(shell).is_none());
        assert!(world.events().contains(&Event::Hit {
            shell,
            target: victim,
            damage: 10,
            remaining_health: 90,
        }));
    }

    #[test]
    fn shell_spent_on_solid_obstacle() {
        let mut world = World::default();
        let prop = world.spawn_prop(Vec2::new(50.0, 50.0), 2.0);
        let shell = spawn_shell(&mut world, Vec2::new(51.0, 50.0), 0.0, 0.0, EntityId::new(0));

        world.tick();

        assert!(world.get(shell).is_none());
        assert!(world.get(prop).is_some());
    }

    #[test]
    fn colliding_shells_only_first_scanner_is_spent() {
        let mut world = World::default();
        let first = spawn_shell(&mut world, Vec2::new(50.0, 50.0), 0.0, 0.0, EntityId::new(0));
        let second = spawn_shell(&mut world, Vec2::new(50.1, 50.0), 0.0, 0.0, EntityId::new(0));

        world.tick();

        assert!(world.get(first).is_none());
        assert!(world.get(second).is_some());
    }

    #[test]
    fn destroyed_tank_is_gone_for_good() {
        let mut world = world_with_tanks(TankConfig {
            health: 10,
            ..TankConfig::default()
        });
        let shooter = world.spawn_tank(Vec2::new(10.0, 10.0));
        let victim = world.spawn_tank(Vec2::new(50.0, 50.0));
        spawn_shell(&mut world, Vec2::new(50.5, 50.0), 0.0, 0.0, shooter);

        world.tick();
        assert!(world.get(victim).is_none());
        world.drain_events();

        // A later shell on the same spot finds nothing to hit
        let later = spawn_shell(&mut world, Vec2::new(50.5, 50.0), 0.0, 0.0, shooter);
        run_ticks(&mut world, 3);

        assert!(world.get(later).is_some());
        assert!(world.remove_entity(victim).is_none());
        assert!(world.drain_events().iter().all(|e| e.subject() != victim));
    }

    #[test]
    fn reload_gates_fire_rate() {
        let mut world = World::default();
        let tank = world.spawn_tank(Vec2::new(50.0, 50.0));

        world.shoot(tank).unwrap();
        world.shoot(tank).unwrap();
        assert_eq!(shots_fired(world.events()), 1);

        run_ticks(&mut world, 59);
        world.shoot(tank).unwrap();
        assert_eq!(shots_fired(world.events()), 1);

        world.tick();
        world.shoot(tank).unwrap();
        assert_eq!(shots_fired(world.events()), 2);
        assert_eq!(reload_timer(&world, tank), 60);
    }
}

// =============================================================================
// Lifecycle and Ordering
// =============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn insertion_order_survives_removal_and_firing() {
        let mut world = World::default();
        let a = world.spawn_tank(Vec2::new(20.0, 20.0));
        let b = world.spawn_prop(Vec2::new(40.0, 40.0), 1.0);
        let c = world.spawn_bot(Vec2::new(60.0, 60.0));

        world.remove_entity(b);
        world.shoot(a).unwrap();
        let shell = shells(&world)[0];
        world.tick();

        let order: Vec<_> = world.entities().map(|e| e.id()).collect();
        assert_eq!(order, vec![a, c, shell]);
        let snapshot_order: Vec<_> = world.snapshot().entities.iter().map(|e| e.id).collect();
        assert_eq!(snapshot_order, order);
    }

    #[test]
    fn removed_bot_forgets_target() {
        let mut world = World::default();
        let bot = world.spawn_bot(Vec2::new(40.0, 50.0));
        world.spawn_tank(Vec2::new(80.0, 50.0));
        run_ticks(&mut world, 10);
        assert!(world.get(bot).unwrap().as_bot().unwrap().targeting.target.is_some());

        let removed = world.remove_entity(bot).unwrap();

        assert!(removed.is_removed());
        assert!(removed.as_bot().unwrap().targeting.target.is_none());
    }
}

// =============================================================================
// Bots
// =============================================================================

mod bot_tests {
    use super::*;

    #[test]
    fn bot_hunts_and_engages_target() {
        init_tracing();
        let mut world = World::default();
        let bot = world.spawn_bot(Vec2::new(25.0, 50.0));
        let target = world.spawn_tank(Vec2::new(75.0, 60.0));
        assert!(position(&world, bot).distance(position(&world, target)) > 50.0);

        let rotation_speed = world.config().bot.rotation_speed;
        let attack_range = world.config().bot.attack_range;
        let reload_time = world.config().tank.reload_time;

        let mut angle = 0.0;
        let mut closed_in = false;
        let mut fired = false;
        for _ in 0..100 {
            world.tick();
            let Some(tank) = world.get(bot).and_then(|e| e.as_tank()) else {
                break;
            };

            let turned = normalize_angle(tank.tank.angle - angle).abs();
            assert!(turned <= rotation_speed + 1e-5, "turned {turned} in one tick");
            angle = tank.tank.angle;

            if world.get(target).is_some()
                && position(&world, bot).distance(position(&world, target)) <= attack_range
            {
                closed_in = true;
            }
            if tank.tank.reload_timer == reload_time {
                fired = true;
            }
        }

        assert!(closed_in, "bot never closed into attack range");
        assert!(fired, "bot never fired");
        assert!(world
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::TargetAcquired { bot: b, target: Some(t) } if *b == bot && *t == target)));
    }

    #[test]
    fn lone_bot_stays_idle() {
        let mut world = World::default();
        let bot = world.spawn_bot(Vec2::new(50.0, 50.0));

        run_ticks(&mut world, 30);

        assert_eq!(position(&world, bot), Vec2::new(50.0, 50.0));
        assert_eq!(shots_fired(world.events()), 0);
    }

    #[test]
    fn bots_target_each_other() {
        let mut world = World::default();
        let a = world.spawn_bot(Vec2::new(30.0, 50.0));
        let b = world.spawn_bot(Vec2::new(70.0, 50.0));

        run_ticks(&mut world, 10);

        let target_of = |id| world.get(id).unwrap().as_bot().unwrap().targeting.target;
        assert_eq!(target_of(a), Some(b));
        assert_eq!(target_of(b), Some(a));
    }
}
