//! Simulation clock scale threaded through every update call.
//!
//! While the game-wide freeze timer runs, time-dependent gameplay values
//! (attack cooldowns, projectile flight) slow down by fixed multipliers.
//! The multiplier is derived from the freeze timer when each tick's
//! [`TickContext`] is built, so nothing caches a stale value between ticks.

use serde::{Deserialize, Serialize};

/// Multipliers applied while the freeze effect is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreezeScales {
    /// Cooldown recovery multiplier.
    pub cooldown: f32,
    /// Projectile flight speed multiplier.
    pub flight: f32,
}

impl Default for FreezeScales {
    fn default() -> Self {
        Self {
            cooldown: 0.25,
            flight: 0.3,
        }
    }
}

/// Read-only clock scale for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockScale {
    /// Cooldown recovery multiplier (1.0 when not frozen).
    pub cooldown: f32,
    /// Projectile flight speed multiplier (1.0 when not frozen).
    pub flight: f32,
}

impl ClockScale {
    /// Normal speed.
    pub const NORMAL: Self = Self {
        cooldown: 1.0,
        flight: 1.0,
    };

    /// Derives the scale from the current freeze timer.
    #[must_use]
    pub fn from_freeze(freeze_timer: f32, scales: &FreezeScales) -> Self {
        if freeze_timer > 0.0 {
            Self {
                cooldown: scales.cooldown,
                flight: scales.flight,
            }
        } else {
            Self::NORMAL
        }
    }

    /// Returns true if a freeze is slowing the clock.
    #[must_use]
    pub fn is_slowed(&self) -> bool {
        self.cooldown < 1.0 || self.flight < 1.0
    }
}

impl Default for ClockScale {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Per-tick inputs shared by every entity update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Elapsed seconds for this tick.
    pub dt: f32,
    /// Tick counter.
    pub tick: u64,
    /// Clock scale for this tick.
    pub scale: ClockScale,
}

impl TickContext {
    /// Creates a context for one tick.
    #[must_use]
    pub const fn new(dt: f32, tick: u64, scale: ClockScale) -> Self {
        Self { dt, tick, scale }
    }

    /// Context at normal speed. Mostly useful in tests.
    #[must_use]
    pub const fn unscaled(dt: f32) -> Self {
        Self::new(dt, 0, ClockScale::NORMAL)
    }
}
