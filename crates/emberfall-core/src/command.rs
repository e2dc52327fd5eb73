//! Deferred requests that entities issue to the simulation.
//!
//! An enemy cannot reach into the projectile pool while the enemy pass is
//! running, so it issues a [`Command`] into the world's outbox instead. The
//! simulation drains the outbox after the enemy pass and carries the
//! commands out. Sound cues go through the same kind of outbox as
//! fire-and-forget [`Cue`]s for the audio collaborator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A request to change the world, carried out after the entity pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Spawn a ballistic projectile.
    SpawnProjectile {
        /// Weapon identifier in the stat table.
        weapon: String,
        /// Launch position.
        origin: Vec2,
        /// Intended landing position.
        target: Vec2,
    },
}

/// Fire-and-forget presentation cue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Play a sound by asset name.
    Sound(String),
}

impl Cue {
    /// Sound cue for the given asset name.
    #[must_use]
    pub fn sound(name: &str) -> Self {
        Self::Sound(name.to_owned())
    }

    /// Returns the sound name, if this is a sound cue.
    #[must_use]
    pub fn as_sound(&self) -> Option<&str> {
        match self {
            Self::Sound(name) => Some(name),
        }
    }
}
