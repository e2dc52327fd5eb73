//! Shared world state that enemies and projectiles act on.
//!
//! The [`World`] is the only thing entity families share. It owns:
//! - The [`Player`]
//! - Pickups and currency gems (ordered, mutable collections)
//! - Visual [`Effects`] (particle and hit-text pools, indicators, shake)
//! - The global freeze timer and elapsed time
//! - Outboxes for deferred [`Command`]s and fire-and-forget [`Cue`]s
//! - A seeded RNG for cosmetic randomness
//!
//! Enemies and projectiles never hold references to each other; an enemy
//! that throws a bomb issues [`Command::SpawnProjectile`] and the simulation
//! carries it out after the enemy pass.
//!
//! # Example
//!
//! ```
//! use emberfall_core::world::{Gem, World};
//! use emberfall_core::config::SimConfig;
//! use glam::Vec2;
//!
//! let mut world = World::new(&SimConfig::default());
//! world.gems.push(Gem::new(Vec2::new(10.0, 0.0), 1));
//! world.play("pickup");
//!
//! let cues = world.drain_cues();
//! assert_eq!(cues.len(), 1);
//! assert_eq!(world.gems.len(), 1);
//! ```

pub mod effects;
pub mod player;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::assets::AssetCatalog;
use crate::command::{Command, Cue};
use crate::config::SimConfig;
use crate::entity::Positioned;

pub use effects::{Effects, HitText, Indicator, IndicatorKind, Particle, ShakeLimiter};
pub use player::{Player, PlayerFlags};

// =============================================================================
// Collectibles
// =============================================================================

/// Kind of pickup lying on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health.
    Heal,
    /// Pulls gems toward the player.
    Magnet,
    /// Grants a temporary shield.
    Shield,
    /// Starts the global freeze.
    Freeze,
}

/// A pickup lying on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Position.
    pub pos: Vec2,
    /// Kind.
    pub kind: PickupKind,
}

impl Pickup {
    /// Creates a pickup.
    #[must_use]
    pub const fn new(pos: Vec2, kind: PickupKind) -> Self {
        Self { pos, kind }
    }
}

impl Positioned for Pickup {
    fn position(&self) -> Vec2 {
        self.pos
    }
}

/// A currency gem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    /// Position.
    pub pos: Vec2,
    /// Currency value.
    pub value: u32,
}

impl Gem {
    /// Creates a gem.
    #[must_use]
    pub const fn new(pos: Vec2, value: u32) -> Self {
        Self { pos, value }
    }
}

impl Positioned for Gem {
    fn position(&self) -> Vec2 {
        self.pos
    }
}

// =============================================================================
// World
// =============================================================================

/// Shared world collaborator for one run.
#[derive(Debug, Clone)]
pub struct World {
    /// The player.
    pub player: Player,
    /// Pickups on the ground.
    pub pickups: Vec<Pickup>,
    /// Currency gems on the ground.
    pub gems: Vec<Gem>,
    /// Visual feedback.
    pub effects: Effects,
    /// Global freeze timer; the clock slows while positive.
    pub freeze_timer: f32,
    /// Seconds since the run started.
    pub elapsed: f32,
    /// Sprite lookup.
    pub assets: AssetCatalog,
    /// Cosmetic RNG.
    pub rng: ChaCha8Rng,
    commands: Vec<Command>,
    cues: Vec<Cue>,
}

impl World {
    /// Creates a world with a full-health player at the origin.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            player: Player {
                contact_window: config.contact_invulnerability,
                ..Player::new(Vec2::ZERO, config.player_max_hp)
            },
            pickups: Vec::new(),
            gems: Vec::new(),
            effects: Effects::new(&config.pools, config.shake),
            freeze_timer: 0.0,
            elapsed: 0.0,
            assets: AssetCatalog::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            commands: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Queues a sound cue.
    pub fn play(&mut self, sound: &str) {
        self.cues.push(Cue::sound(sound));
    }

    /// Queues a deferred command.
    pub fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Takes all queued commands in issue order.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Takes all queued cues in issue order.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Queued commands, oldest first.
    #[must_use]
    pub fn pending_commands(&self) -> &[Command] {
        &self.commands
    }

    /// Queued cues, oldest first.
    #[must_use]
    pub fn pending_cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Starts (or extends) the global freeze.
    pub fn freeze_for(&mut self, seconds: f32) {
        self.freeze_timer = self.freeze_timer.max(seconds);
    }

    /// Advances world-owned timers and effects.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.freeze_timer = (self.freeze_timer - dt).max(0.0);
        self.player.tick(dt);
        self.effects.tick(dt);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outboxes_drain_in_order() {
        let mut world = World::default();
        world.issue(Command::SpawnProjectile {
            weapon: "bomb".into(),
            origin: Vec2::ZERO,
            target: Vec2::X,
        });
        world.play("throw");
        world.play("land");

        assert_eq!(world.pending_commands().len(), 1);
        let cues = world.drain_cues();
        assert_eq!(cues, vec![Cue::sound("throw"), Cue::sound("land")]);
        assert!(world.drain_cues().is_empty());
        assert_eq!(world.drain_commands().len(), 1);
        assert!(world.pending_commands().is_empty());
    }

    #[test]
    fn tick_counts_freeze_down() {
        let mut world = World::default();
        world.freeze_for(0.5);
        world.freeze_for(0.2);
        assert_eq!(world.freeze_timer, 0.5);

        world.tick(0.3);
        assert!((world.freeze_timer - 0.2).abs() < 1e-6);
        world.tick(0.3);
        assert_eq!(world.freeze_timer, 0.0);
        assert!((world.elapsed - 0.6).abs() < 1e-6);
    }

    #[test]
    fn same_seed_gives_same_rng_stream() {
        use rand::Rng;

        let config = SimConfig {
            seed: 99,
            ..SimConfig::default()
        };
        let mut a = World::new(&config);
        let mut b = World::new(&config);
        let xs: Vec<u32> = (0..4).map(|_| a.rng.gen()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.rng.gen()).collect();
        assert_eq!(xs, ys);
    }
}
