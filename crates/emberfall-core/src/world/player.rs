//! Player state as seen by the combat core.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{DamageOutcome, Health, Positioned};

/// Seconds the player flashes after taking damage.
pub const PLAYER_HIT_FLASH: f32 = 0.2;
/// Player collision radius used for contact damage.
pub const PLAYER_RADIUS: f32 = 16.0;
/// Default invulnerability window after a contact hit.
pub const CONTACT_WINDOW: f32 = 0.5;

bitflags! {
    /// Player status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PlayerFlags: u8 {
        /// A shield pickup is active.
        const SHIELDED = 0b0000_0001;
        /// Debug god mode.
        const GOD_MODE = 0b0000_0010;
        /// Either flag makes the player ignore all damage.
        const INVULNERABLE = Self::SHIELDED.bits() | Self::GOD_MODE.bits();
    }
}

/// The player: position, health and damage gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// World position.
    pub pos: Vec2,
    /// Health.
    pub health: Health,
    /// Status flags.
    pub flags: PlayerFlags,
    /// Hit flash timer (presentation).
    pub hit_flash: f32,
    /// Contact damage is ignored while positive.
    pub contact_cooldown: f32,
    /// Value `contact_cooldown` is set to after a contact hit.
    pub contact_window: f32,
}

impl Player {
    /// Creates a player at `pos` with full health.
    #[must_use]
    pub fn new(pos: Vec2, max_hp: f32) -> Self {
        Self {
            pos,
            health: Health::new(max_hp),
            flags: PlayerFlags::empty(),
            hit_flash: 0.0,
            contact_cooldown: 0.0,
            contact_window: CONTACT_WINDOW,
        }
    }

    /// Returns true while shielded or in god mode.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.flags.intersects(PlayerFlags::INVULNERABLE)
    }

    /// Applies damage unless invulnerable.
    ///
    /// An invulnerable player takes no damage and shows no hit feedback.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        let outcome = self.health.apply(amount);
        if outcome != DamageOutcome::Ignored {
            self.hit_flash = PLAYER_HIT_FLASH;
        }
        outcome
    }

    /// Applies contact damage, rate-limited by the contact window.
    pub fn take_contact_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.contact_cooldown > 0.0 {
            return DamageOutcome::Ignored;
        }
        let outcome = self.take_damage(amount);
        if outcome != DamageOutcome::Ignored {
            self.contact_cooldown = self.contact_window;
        }
        outcome
    }

    /// Counts player timers toward zero.
    pub fn tick(&mut self, dt: f32) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 100.0)
    }
}

impl Positioned for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }
}
