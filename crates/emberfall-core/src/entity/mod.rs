//! Shared entity contracts for the combat core.
//!
//! This module provides the pieces every hostile entity family is built from:
//! - [`Combatant`]: The polymorphic update/damage contract
//! - [`Health`]: The base damage-application routine
//! - [`DamageOutcome`]: What a single hit did
//! - [`Facing`]: Horizontal facing direction
//! - [`Positioned`]: Anything with a world position (pickups, gems, enemies)
//!
//! Per-variant data lives in [`enemy`] and [`projectile`]; reusable per-entity
//! state (animation cursor, status timers) lives in [`components`].
//!
//! # Example
//!
//! ```
//! use emberfall_core::entity::{DamageOutcome, Health};
//!
//! let mut health = Health::new(10.0);
//! assert_eq!(health.apply(4.0), DamageOutcome::Hit { dealt: 4.0 });
//! assert_eq!(health.apply(20.0), DamageOutcome::Killed { dealt: 6.0 });
//! assert_eq!(health.apply(1.0), DamageOutcome::Ignored);
//! ```

pub mod components;
pub mod enemy;
pub mod projectile;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clock::TickContext;
use crate::world::World;

pub use components::{Animation, StatusTimers};
pub use enemy::{Behavior, Enemy, EnemyState, MeleeAttack, MovementBand, RangedAttack};
pub use projectile::{Projectile, ProjectilePhase};

// =============================================================================
// Damage
// =============================================================================

/// Result of applying one hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The hit had no effect (target already dead, or invulnerable).
    Ignored,
    /// The target took damage and survived.
    Hit {
        /// Health actually removed.
        dealt: f32,
    },
    /// The hit brought the target to zero health.
    Killed {
        /// Health actually removed.
        dealt: f32,
    },
}

impl DamageOutcome {
    /// Returns true if this hit was lethal.
    #[must_use]
    pub const fn is_lethal(self) -> bool {
        matches!(self, Self::Killed { .. })
    }

    /// Returns the health actually removed by this hit.
    #[must_use]
    pub const fn dealt(self) -> f32 {
        match self {
            Self::Ignored => 0.0,
            Self::Hit { dealt } | Self::Killed { dealt } => dealt,
        }
    }
}

/// Current and maximum health.
///
/// Invariant: `0 <= current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates full health with the given maximum.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns true once health has reached zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Base damage routine: removes `amount`, clamped to `[0, max]`.
    ///
    /// Non-positive amounts and hits on depleted health are ignored.
    pub fn apply(&mut self, amount: f32) -> DamageOutcome {
        if self.is_depleted() || amount <= 0.0 || amount.is_nan() {
            return DamageOutcome::Ignored;
        }
        let dealt = amount.min(self.current);
        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            DamageOutcome::Killed { dealt }
        } else {
            DamageOutcome::Hit { dealt }
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// =============================================================================
// Facing
// =============================================================================

/// Horizontal facing direction (±1).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing -X.
    Left,
    /// Facing +X.
    #[default]
    Right,
}

impl Facing {
    /// Returns the facing as a sign multiplier.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing toward the sign of `dx`. Zero keeps `Right`.
    #[must_use]
    pub fn toward(dx: f32) -> Self {
        if dx < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
        }
    }
}

// =============================================================================
// Contracts
// =============================================================================

/// Anything with a position in the world.
pub trait Positioned {
    /// World position.
    fn position(&self) -> Vec2;
}

/// Combat contract shared by every hostile entity family.
///
/// The game loop only talks to enemies through this trait: one `update` per
/// tick, `take_damage` from any damage source. Variant behavior is data held
/// by the implementor, not a subclass.
pub trait Combatant: Positioned {
    /// Returns true once the entity has died. Dead entities do not update.
    fn is_dead(&self) -> bool;

    /// Applies incoming damage and reports what the hit did.
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;

    /// Advances the entity by one tick.
    fn update(&mut self, ctx: &TickContext, world: &mut World);
}
