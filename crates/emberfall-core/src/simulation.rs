//! Tick driver tying enemies, projectiles and the world together.
//!
//! `Simulation::step` runs one frame in a fixed phase order:
//!
//! 1. **CLOCK**: Build the [`TickContext`]; the clock scale is derived from
//!    the world freeze timer every tick
//! 2. **CROWD**: Snapshot enemy positions and write separation vectors
//! 3. **ENEMIES**: Update every live enemy over a handle snapshot
//! 4. **COMMANDS**: Carry out commands the enemies issued (projectile spawns)
//! 5. **PROJECTILES**: Update projectiles; inactive ones go back to the pool
//! 6. **INDICATORS**: Apply pending damaging indicators to enemies
//! 7. **REAP**: Dead enemies drop a gem and are released; strays are despawned
//! 8. **WORLD**: Age effects, player timers and the freeze timer
//!
//! Every pass iterates a snapshot of pool handles, so an entity released in
//! the middle of a pass is simply skipped.
//!
//! # Example
//!
//! ```
//! use emberfall_core::simulation::Simulation;
//! use glam::Vec2;
//!
//! let mut sim = Simulation::with_defaults();
//! sim.spawn_enemy("bomber", Vec2::new(240.0, 0.0), 1.0).unwrap();
//!
//! for _ in 0..600 {
//!     sim.step(1.0 / 60.0);
//! }
//!
//! assert_eq!(sim.tick(), 600);
//! assert!(sim.world().player.health.current() < 100.0);
//! ```

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::assets::AssetCatalog;
use crate::clock::{ClockScale, TickContext};
use crate::combat::{self, ExplosionReport, IndicatorDamage};
use crate::command::Command;
use crate::config::{SimConfig, StatTable};
use crate::crowd::SeparationField;
use crate::entity::{Combatant, DamageOutcome, Enemy, Projectile};
use crate::error::{ConfigError, SpawnError};
use crate::pool::{Handle, Pool};
use crate::world::{Gem, World};

/// Maximum offset of a dropped gem from the enemy that dropped it.
pub const DROP_SCATTER: f32 = 6.0;

// =============================================================================
// Step report
// =============================================================================

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Tick that was simulated.
    pub tick: u64,
    /// Projectiles spawned from enemy commands.
    pub projectiles_spawned: usize,
    /// Projectile spawns skipped (pool exhausted or unknown weapon).
    pub projectiles_skipped: usize,
    /// Explosions resolved this tick.
    pub explosions: Vec<ExplosionReport>,
    /// Result of the indicator damage pass.
    pub indicators: IndicatorDamage,
    /// Dead enemies reaped (each dropped a gem).
    pub enemies_killed: usize,
    /// Live enemies despawned for straying too far.
    pub enemies_despawned: usize,
}

// =============================================================================
// Simulation
// =============================================================================

/// Owns the world and both entity pools for one run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    stats: StatTable,
    world: World,
    enemies: Pool<Enemy>,
    projectiles: Pool<Projectile>,
    tick: u64,
}

impl Simulation {
    /// Creates a simulation from settings and a stat table.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in `stats`.
    pub fn new(config: SimConfig, stats: StatTable) -> Result<Self, ConfigError> {
        stats.validate()?;
        Ok(Self::build(config, stats))
    }

    /// Default settings with the built-in stat table.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::build(SimConfig::default(), StatTable::builtin())
    }

    fn build(config: SimConfig, stats: StatTable) -> Self {
        let mut world = World::new(&config);
        world.assets = AssetCatalog::with_sprites(stats.sprite_names());
        Self {
            world,
            enemies: Pool::with_capacity(config.pools.enemies),
            projectiles: Pool::with_capacity(config.pools.projectiles),
            tick: 0,
            config,
            stats,
        }
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Stat table.
    #[must_use]
    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    /// Shared world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world state (player input, pickups, freeze).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Enemy pool.
    #[must_use]
    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    /// Mutable enemy pool.
    pub fn enemies_mut(&mut self) -> &mut Pool<Enemy> {
        &mut self.enemies
    }

    /// Projectile pool.
    #[must_use]
    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Spawns an enemy of `kind` at `pos` with difficulty `scale`.
    ///
    /// # Errors
    ///
    /// - [`SpawnError::InvalidScale`] if `scale` is not positive
    /// - [`SpawnError::Config`] if `kind` is unknown
    /// - [`SpawnError::PoolExhausted`] if every enemy slot is live
    pub fn spawn_enemy(&mut self, kind: &str, pos: Vec2, scale: f32) -> Result<Handle, SpawnError> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(SpawnError::InvalidScale(scale));
        }
        let stats = self.stats.enemy(kind)?;
        let Some((handle, enemy)) = self.enemies.acquire() else {
            warn!(kind, "enemy pool exhausted, spawn skipped");
            return Err(SpawnError::PoolExhausted("enemy"));
        };
        enemy.init(kind, stats, pos, scale, &self.world.assets);
        debug!(kind, ?pos, scale, %handle, "enemy spawned");
        Ok(handle)
    }

    /// Launches a projectile of `weapon` from `origin` toward `target`.
    ///
    /// # Errors
    ///
    /// - [`SpawnError::Config`] if `weapon` is unknown
    /// - [`SpawnError::PoolExhausted`] if every projectile slot is live
    pub fn spawn_projectile(&mut self, weapon: &str, origin: Vec2, target: Vec2) -> Result<Handle, SpawnError> {
        let stats = self.stats.weapon(weapon)?;
        let Some((handle, projectile)) = self.projectiles.acquire() else {
            warn!(weapon, "projectile pool exhausted, spawn skipped");
            return Err(SpawnError::PoolExhausted("projectile"));
        };
        projectile.launch(origin, target, stats);
        debug!(weapon, ?origin, ?target, %handle, "projectile spawned");
        Ok(handle)
    }

    /// Damages one enemy from an outside source (player weapons).
    ///
    /// Returns `None` for a stale handle.
    pub fn damage_enemy(&mut self, handle: Handle, amount: f32) -> Option<DamageOutcome> {
        self.enemies.get_mut(handle).map(|enemy| {
            let outcome = enemy.take_damage(amount);
            if outcome != DamageOutcome::Ignored {
                self.world.effects.hit_text(enemy.pos, outcome.dealt());
            }
            outcome
        })
    }

    /// Runs one tick.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let ctx = TickContext::new(
            dt,
            self.tick,
            ClockScale::from_freeze(self.world.freeze_timer, &self.config.freeze),
        );
        let mut report = StepReport {
            tick: self.tick,
            ..StepReport::default()
        };
        trace!(tick = self.tick, dt, slowed = ctx.scale.is_slowed(), "step");

        SeparationField::from_enemies(&self.enemies).apply(&mut self.enemies);

        for handle in self.enemies.handles() {
            if let Some(enemy) = self.enemies.get_mut(handle) {
                enemy.update(&ctx, &mut self.world);
            }
        }

        self.resolve_commands(&mut report);
        self.update_projectiles(&ctx, &mut report);

        report.indicators = combat::apply_indicator_damage(&mut self.world.effects, &mut self.enemies);

        self.reap_enemies(&mut report);

        self.world.tick(dt);
        self.tick += 1;
        report
    }

    fn resolve_commands(&mut self, report: &mut StepReport) {
        for command in self.world.drain_commands() {
            match command {
                Command::SpawnProjectile {
                    weapon,
                    origin,
                    target,
                } => match self.spawn_projectile(&weapon, origin, target) {
                    Ok(_) => report.projectiles_spawned += 1,
                    Err(err) => {
                        warn!(%err, weapon, "projectile command dropped");
                        report.projectiles_skipped += 1;
                    }
                },
            }
        }
    }

    fn update_projectiles(&mut self, ctx: &TickContext, report: &mut StepReport) {
        for handle in self.projectiles.handles() {
            let Some(projectile) = self.projectiles.get_mut(handle) else {
                continue;
            };
            if let Some(explosion) = projectile.update(ctx, Some(&mut self.world)) {
                report.explosions.push(explosion);
            }
            if !projectile.is_active() {
                self.projectiles.release(handle);
            }
        }
    }

    fn reap_enemies(&mut self, report: &mut StepReport) {
        let player = self.world.player.pos;
        for handle in self.enemies.handles() {
            let Some(enemy) = self.enemies.get(handle) else {
                continue;
            };
            if enemy.is_dead() {
                let scatter = Vec2::new(
                    self.world.rng.gen_range(-DROP_SCATTER..=DROP_SCATTER),
                    self.world.rng.gen_range(-DROP_SCATTER..=DROP_SCATTER),
                );
                self.world
                    .gems
                    .push(Gem::new(enemy.pos + scatter, self.config.gem_value));
                self.world.play("enemy_death");
                self.enemies.release(handle);
                report.enemies_killed += 1;
            } else if enemy.is_off_world(player, self.config.despawn_distance) {
                debug!(kind = %enemy.kind, pos = ?enemy.pos, "enemy despawned");
                self.enemies.release(handle);
                report.enemies_despawned += 1;
            }
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_defaults()
    }
}
