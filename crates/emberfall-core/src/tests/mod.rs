//! Cross-module tests for the combat core.
//!
//! - `helpers.rs`: Simulation and world setup shortcuts
//! - `scenarios.rs`: End-to-end behavior of enemies, projectiles and the world
//! - `properties.rs`: Randomized checks of the radius, ballistic and damage rules

mod helpers;
