//! # Emberfall Core
//!
//! Real-time combat resolution for the Emberfall survival arcade game.
//!
//! This crate owns the per-tick combat rules: enemy behavior, ballistic
//! projectiles and the area-damage queries both share. Rendering, audio,
//! input and asset loading live outside; the core talks to them through
//! plain data (sound [`command::Cue`]s, sprite ids, indicator lists).
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): `Enemy` (behavioral state machine behind the
//!   [`entity::Combatant`] contract) and `Projectile` (arc, fuse, explosion)
//! - **World** ([`world`]): player, pickups, gems, visual effects, freeze
//!   timer and the outboxes entities write to
//! - **Resolution** ([`combat`], [`crowd`]): explosion and indicator damage,
//!   crowd separation
//! - **Driver** ([`simulation`]): pools, command resolution and phase order
//!
//! Entities never reference each other. An enemy that throws a bomb issues a
//! [`command::Command`]; the simulation spawns the projectile after the
//! enemy pass.
//!
//! ## Usage
//!
//! ```
//! use emberfall_core::{Simulation, StatTable, SimConfig};
//! use glam::Vec2;
//!
//! let config = SimConfig::from_json_str(r#"{"seed": 7}"#).unwrap();
//! let mut sim = Simulation::new(config, StatTable::builtin()).unwrap();
//! sim.spawn_enemy("chaser", Vec2::new(120.0, 0.0), 1.0).unwrap();
//!
//! let report = sim.step(1.0 / 60.0);
//! assert_eq!(report.tick, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assets;
pub mod clock;
pub mod combat;
pub mod command;
pub mod config;
pub mod crowd;
pub mod entity;
pub mod error;
pub mod pool;
pub mod simulation;
pub mod world;

#[cfg(test)]
mod tests;

pub use clock::{ClockScale, TickContext};
pub use config::{SimConfig, StatTable};
pub use entity::{Combatant, DamageOutcome, Enemy, Projectile};
pub use error::{ConfigError, SpawnError};
pub use pool::{Handle, Pool};
pub use simulation::{Simulation, StepReport};
pub use world::World;
