//! Setup shortcuts shared by the cross-module tests.

use glam::Vec2;

use crate::assets::AssetCatalog;
use crate::clock::TickContext;
use crate::config::StatTable;
use crate::entity::{Behavior, Combatant, Enemy, Projectile};
use crate::pool::Handle;
use crate::simulation::Simulation;
use crate::world::World;

/// Fixed test timestep (60 Hz).
pub const DT: f32 = 1.0 / 60.0;

/// Installs a test-writer subscriber so `tracing` output shows up in failing
/// tests. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Builds a built-in enemy of `kind` outside any pool.
pub fn enemy(kind: &str, pos: Vec2, scale: f32) -> Enemy {
    let stats = StatTable::builtin();
    Enemy::new(kind, stats.enemy(kind).unwrap(), pos, scale, &AssetCatalog::new())
}

/// Builds a bomber whose attack is ready to start.
pub fn ready_bomber(pos: Vec2) -> Enemy {
    let mut bomber = enemy("bomber", pos, 1.0);
    if let Behavior::Ranged(attack) = &mut bomber.behavior {
        attack.cooldown = 0.0;
    }
    bomber
}

/// Builds a launched built-in bomb.
pub fn bomb(origin: Vec2, target: Vec2) -> Projectile {
    let stats = StatTable::builtin();
    let mut projectile = Projectile::default();
    projectile.launch(origin, target, stats.weapon("bomb").unwrap());
    projectile
}

/// Updates `enemy` for `ticks` fixed steps.
pub fn run_enemy(enemy: &mut Enemy, world: &mut World, ticks: usize) {
    for _ in 0..ticks {
        enemy.update(&TickContext::unscaled(DT), world);
    }
}

/// Spawns a bomber into `sim` with its attack ready.
pub fn spawn_ready_bomber(sim: &mut Simulation, pos: Vec2) -> Handle {
    let handle = sim.spawn_enemy("bomber", pos, 1.0).unwrap();
    if let Some(enemy) = sim.enemies_mut().get_mut(handle) {
        if let Behavior::Ranged(attack) = &mut enemy.behavior {
            attack.cooldown = 0.0;
        }
    }
    handle
}

/// Steps `sim` for `ticks` fixed steps.
pub fn run_sim(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.step(DT);
    }
}
