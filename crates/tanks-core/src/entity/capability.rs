//! Capability traits implemented by the component bundles.
//!
//! Resolvers reach entities through these traits rather than through the
//! concrete bundle types, so a new entity type gains collision or damage
//! behaviour by implementing the matching trait. `EntityInner::as_*` returns
//! the trait objects.

use glam::Vec2;

use super::components::{
    Body, BotComponents, Damage, Health, Movement, PropComponents, Repulsion, ShellComponents,
    TankComponents,
};

/// Anything with a position and a collision radius.
pub trait Positioned {
    /// Position and radius.
    fn body(&self) -> &Body;
    /// Mutable position and radius.
    fn body_mut(&mut self) -> &mut Body;
}

/// Has velocity and integrates it every tick.
pub trait Movable: Positioned {
    /// Movement component.
    fn movement(&self) -> &Movement;
    /// Mutable movement component.
    fn movement_mut(&mut self) -> &mut Movement;

    /// Applies an impulse along `direction`, respecting the speed cap.
    fn accelerate(&mut self, direction: Vec2) {
        self.movement_mut().accelerate(direction);
    }

    /// Moves by the current velocity and applies friction.
    fn integrate(&mut self) {
        let mut position = self.body().position;
        self.movement_mut().integrate(&mut position);
        self.body_mut().position = position;
    }
}

/// Pushed apart from other repellable entities on contact.
pub trait Repellable: Movable {
    /// Repulsion component.
    fn repulsion(&self) -> &Repulsion;
}

/// Deals damage to damageable entities on contact.
pub trait Damaging: Positioned {
    /// Damage payload.
    fn damage(&self) -> &Damage;
}

/// Takes damage and is destroyed when health is depleted.
pub trait Damageable: Positioned {
    /// Health component.
    fn health(&self) -> &Health;
    /// Mutable health component.
    fn health_mut(&mut self) -> &mut Health;

    /// Subtracts `amount` and returns `true` if health is now depleted.
    fn take_damage(&mut self, amount: i32) -> bool {
        self.health_mut().take_damage(amount)
    }
}

// =============================================================================
// Tank
// =============================================================================

impl Positioned for TankComponents {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Movable for TankComponents {
    fn movement(&self) -> &Movement {
        &self.movement
    }

    fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }
}

impl Repellable for TankComponents {
    fn repulsion(&self) -> &Repulsion {
        &self.repulsion
    }
}

impl Damageable for TankComponents {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

// =============================================================================
// Bot (delegates to its tank)
// =============================================================================

impl Positioned for BotComponents {
    fn body(&self) -> &Body {
        &self.tank.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.tank.body
    }
}

impl Movable for BotComponents {
    fn movement(&self) -> &Movement {
        &self.tank.movement
    }

    fn movement_mut(&mut self) -> &mut Movement {
        &mut self.tank.movement
    }
}

impl Repellable for BotComponents {
    fn repulsion(&self) -> &Repulsion {
        &self.tank.repulsion
    }
}

impl Damageable for BotComponents {
    fn health(&self) -> &Health {
        &self.tank.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.tank.health
    }
}

// =============================================================================
// Shell
// =============================================================================

impl Positioned for ShellComponents {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Movable for ShellComponents {
    fn movement(&self) -> &Movement {
        &self.movement
    }

    fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }
}

impl Damaging for ShellComponents {
    fn damage(&self) -> &Damage {
        &self.damage
    }
}

// =============================================================================
// Prop
// =============================================================================

impl Positioned for PropComponents {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
