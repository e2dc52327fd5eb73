//! Ballistic projectile: arc flight, landing fuse and explosion.
//!
//! A projectile moves through three one-way phases:
//!
//! ```text
//! Airborne --(height <= 0)--> Landed --(fuse <= 0)--> Exploded
//! ```
//!
//! Height (`z`, `vz`) is integrated separately from the ground position and
//! never collides with anything. Landing fires once and pushes a warning
//! telegraph through the world; detonation fires once and hands the blast to
//! [`crate::combat::resolve_explosion`]. After detonation (or on corrupt
//! state) the projectile deactivates and the owning pool releases its slot.
//!
//! The world is passed into every call as `Option<&mut World>` instead of
//! being stored, so a projectile never outlives its collaborator. With no
//! world, landing and explosion side effects are skipped and the projectile
//! still deactivates.
//!
//! # Example
//!
//! ```
//! use emberfall_core::clock::TickContext;
//! use emberfall_core::config::StatTable;
//! use emberfall_core::entity::{Projectile, ProjectilePhase};
//! use emberfall_core::world::World;
//! use glam::Vec2;
//!
//! let stats = StatTable::builtin();
//! let mut world = World::default();
//! let mut bomb = Projectile::default();
//! bomb.launch(Vec2::new(200.0, 0.0), Vec2::ZERO, stats.weapon("bomb").unwrap());
//!
//! let ctx = TickContext::unscaled(1.0 / 60.0);
//! while bomb.is_active() {
//!     bomb.update(&ctx, Some(&mut world));
//! }
//!
//! assert_eq!(bomb.phase(), ProjectilePhase::Exploded);
//! assert!(world.player.health.current() < world.player.health.max());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::TickContext;
use crate::combat::{self, Blast, ExplosionReport};
use crate::config::WeaponStats;
use crate::pool::Reset;
use crate::world::{Indicator, World};

/// Angular rate of the fuse pulse.
pub const FUSE_PULSE_RATE: f32 = 15.0;
/// Amplitude of the fuse pulse around scale 1.0.
pub const FUSE_PULSE_AMPLITUDE: f32 = 0.15;

/// Ballistic phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// In flight.
    Airborne,
    /// On the ground, fuse burning.
    Landed,
    /// Detonated. Terminal.
    Exploded,
}

/// A pooled ballistic bomb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    active: bool,
    /// Ground position.
    pub pos: Vec2,
    /// Ground velocity.
    pub vel: Vec2,
    /// Height above ground.
    pub z: f32,
    /// Vertical velocity.
    pub vz: f32,
    /// Visual rotation (radians).
    pub rotation: f32,
    /// Visual scale; pulses while the fuse burns.
    pub scale: f32,
    gravity: f32,
    spin: f32,
    has_landed: bool,
    exploded: bool,
    fuse: f32,
    radius: f32,
    damage: f32,
    shake_intensity: f32,
    shake_duration: f32,
    particles: usize,
}

impl Projectile {
    /// Inert projectile, as found in a freshly released slot.
    pub const INERT: Self = Self {
        active: false,
        pos: Vec2::ZERO,
        vel: Vec2::ZERO,
        z: 0.0,
        vz: 0.0,
        rotation: 0.0,
        scale: 1.0,
        gravity: 0.0,
        spin: 0.0,
        has_landed: false,
        exploded: false,
        fuse: 0.0,
        radius: 0.0,
        damage: 0.0,
        shake_intensity: 0.0,
        shake_duration: 0.0,
        particles: 0,
    };

    /// Activates the projectile so that it lands on `target`.
    ///
    /// Resets every field first. The height axis starts at zero with the
    /// weapon's launch speed, so the flight lasts `2 * v0 / g` seconds and
    /// the ground velocity is chosen to cover `target - origin` in that time.
    /// Explosion parameters are copied from `stats` and fixed afterwards.
    pub fn launch(&mut self, origin: Vec2, target: Vec2, stats: &WeaponStats) {
        self.reset();

        let flight_time = stats.flight_time();
        self.active = true;
        self.pos = origin;
        self.vel = if flight_time > 0.0 {
            (target - origin) / flight_time
        } else {
            Vec2::ZERO
        };
        self.vz = stats.launch_speed;
        self.gravity = stats.gravity;
        self.spin = stats.spin;
        self.fuse = stats.fuse_time;
        self.radius = stats.radius;
        self.damage = stats.damage;
        self.shake_intensity = stats.shake_intensity;
        self.shake_duration = stats.shake_duration;
        self.particles = stats.particles;
    }

    /// Returns true until the projectile has detonated or been released.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true once the projectile has touched the ground.
    #[must_use]
    pub const fn has_landed(&self) -> bool {
        self.has_landed
    }

    /// Returns true once the explosion has been resolved.
    #[must_use]
    pub const fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// Remaining fuse (seconds).
    #[must_use]
    pub const fn fuse(&self) -> f32 {
        self.fuse
    }

    /// Explosion radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ProjectilePhase {
        if self.exploded {
            ProjectilePhase::Exploded
        } else if self.has_landed {
            ProjectilePhase::Landed
        } else {
            ProjectilePhase::Airborne
        }
    }

    /// The blast this projectile would produce right now.
    #[must_use]
    pub fn blast(&self) -> Blast {
        Blast {
            center: self.pos,
            radius: self.radius,
            damage: self.damage,
            shake_intensity: self.shake_intensity,
            shake_duration: self.shake_duration,
            particles: self.particles,
        }
    }

    /// Advances one tick. Returns the explosion report on the tick the
    /// projectile detonates with a world present.
    ///
    /// Flight uses `dt` scaled by the freeze flight multiplier; the fuse
    /// burns in unscaled time.
    pub fn update(&mut self, ctx: &TickContext, world: Option<&mut World>) -> Option<ExplosionReport> {
        if !self.active {
            return None;
        }
        if !self.is_finite() {
            warn!(pos = ?self.pos, z = self.z, vz = self.vz, "projectile state is not finite, releasing");
            self.release();
            return None;
        }

        if !self.has_landed {
            self.fly(ctx.dt * ctx.scale.flight, world);
            return None;
        }

        self.fuse -= ctx.dt;
        self.scale = 1.0 + FUSE_PULSE_AMPLITUDE * (self.fuse * FUSE_PULSE_RATE).sin();
        if self.fuse <= 0.0 {
            return self.explode(world);
        }
        None
    }

    fn fly(&mut self, dt: f32, world: Option<&mut World>) {
        self.pos += self.vel * dt;
        self.z += self.vz * dt;
        self.vz -= self.gravity * dt;
        self.rotation += self.spin * dt;

        if self.z > 0.0 {
            return;
        }

        self.z = 0.0;
        self.vz = 0.0;
        self.vel = Vec2::ZERO;
        self.has_landed = true;
        debug!(pos = ?self.pos, fuse = self.fuse, "projectile landed");

        if let Some(world) = world {
            world
                .effects
                .push_indicator(Indicator::landing(self.pos, self.radius, self.fuse));
            world.play("bomb_land");
        }
    }

    /// Resolves the explosion once and deactivates the projectile.
    ///
    /// Calling this on an inactive or already exploded projectile does
    /// nothing and returns `None`. Without a world every resolution step is
    /// skipped, but the projectile is still deactivated.
    pub fn explode(&mut self, world: Option<&mut World>) -> Option<ExplosionReport> {
        if !self.active || self.exploded {
            return None;
        }
        self.exploded = true;

        let report = world.map(|world| combat::resolve_explosion(world, &self.blast()));
        if report.is_none() {
            debug!(pos = ?self.pos, "no world attached, explosion skipped");
        }

        self.release();
        report
    }

    /// Deactivates the projectile. Returns false if it was already inactive.
    pub fn release(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        true
    }

    fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.z.is_finite() && self.vz.is_finite()
    }
}

impl Default for Projectile {
    fn default() -> Self {
        Self::INERT
    }
}

impl Reset for Projectile {
    fn reset(&mut self) {
        *self = Self::INERT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockScale, FreezeScales};
    use crate::config::StatTable;
    use crate::world::IndicatorKind;

    const DT: f32 = 1.0 / 60.0;

    fn bomb_stats() -> WeaponStats {
        StatTable::builtin().weapon("bomb").unwrap().clone()
    }

    fn launched(origin: Vec2, target: Vec2) -> Projectile {
        let mut bomb = Projectile::default();
        bomb.launch(origin, target, &bomb_stats());
        bomb
    }

    /// Runs until the projectile lands; returns the flight time.
    fn fly_until_landed(bomb: &mut Projectile, ctx: &TickContext, world: &mut World) -> f32 {
        let mut elapsed = 0.0;
        while !bomb.has_landed() {
            bomb.update(ctx, Some(&mut *world));
            elapsed += ctx.dt;
            assert!(elapsed < 10.0, "projectile never landed");
        }
        elapsed
    }

    mod flight_tests {
        use super::*;

        #[test]
        fn lands_after_two_v0_over_g() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::ZERO);
            let elapsed = fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);
            let expected = bomb_stats().flight_time();
            // Height moves before gravity, so touchdown trails 2*v0/g by one tick
            assert!(elapsed >= expected + DT - 1e-3, "{elapsed} vs {expected}");
            assert!(elapsed <= expected + 2.0 * DT + 1e-3, "{elapsed} vs {expected}");
        }

        #[test]
        fn lands_near_target() {
            let mut world = World::default();
            let target = Vec2::new(40.0, -25.0);
            let mut bomb = launched(Vec2::new(300.0, 100.0), target);
            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);
            assert!(bomb.pos.distance(target) < 15.0, "landed at {:?}", bomb.pos);
        }

        #[test]
        fn landing_fires_once() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::new(250.0, 0.0));
            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);
            bomb.update(&TickContext::unscaled(DT), Some(&mut world));
            bomb.update(&TickContext::unscaled(DT), Some(&mut world));

            let landings = world
                .effects
                .indicators
                .iter()
                .filter(|i| i.kind == IndicatorKind::Landing)
                .count();
            assert_eq!(landings, 1);
            assert_eq!(bomb.phase(), ProjectilePhase::Landed);
            let sounds: Vec<_> = world.drain_cues().into_iter().filter_map(|c| c.as_sound().map(str::to_owned)).collect();
            assert_eq!(sounds, vec!["bomb_land".to_owned()]);
        }

        #[test]
        fn landing_indicator_carries_radius_and_fuse() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::new(250.0, 0.0));
            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);

            let indicator = world.effects.indicators[0];
            assert_eq!(indicator.radius, 80.0);
            assert!((indicator.ttl - 1.2).abs() < 1e-6);
            assert_eq!(indicator.damage, 0.0);
        }

        #[test]
        fn freeze_slows_flight_but_keeps_landing_point() {
            let frozen = TickContext::new(DT, 0, ClockScale::from_freeze(1.0, &FreezeScales::default()));
            let mut world = World::default();
            let target = Vec2::new(100.0, 0.0);
            let mut normal = launched(Vec2::new(300.0, 0.0), target);
            let mut slow = launched(Vec2::new(300.0, 0.0), target);

            let normal_time = fly_until_landed(&mut normal, &TickContext::unscaled(DT), &mut world);
            let slow_time = fly_until_landed(&mut slow, &frozen, &mut world);

            assert!(slow_time > normal_time * 3.0);
            assert!(slow.pos.distance(target) < 10.0);
        }

        #[test]
        fn spin_advances_only_in_flight() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::new(250.0, 0.0));
            bomb.update(&TickContext::unscaled(DT), Some(&mut world));
            assert!(bomb.rotation > 0.0);

            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);
            let rotation = bomb.rotation;
            bomb.update(&TickContext::unscaled(DT), Some(&mut world));
            assert_eq!(bomb.rotation, rotation);
        }
    }

    mod fuse_tests {
        use super::*;

        #[test]
        fn fuse_pulses_scale() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::new(250.0, 0.0));
            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);
            bomb.update(&TickContext::unscaled(0.1), Some(&mut world));
            let expected = 1.0 + FUSE_PULSE_AMPLITUDE * (bomb.fuse() * FUSE_PULSE_RATE).sin();
            assert!((bomb.scale - expected).abs() < 1e-6);
        }

        #[test]
        fn fuse_expiry_explodes_and_releases() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(300.0, 0.0), Vec2::new(250.0, 0.0));
            fly_until_landed(&mut bomb, &TickContext::unscaled(DT), &mut world);

            let mut reports = Vec::new();
            for _ in 0..200 {
                if let Some(report) = bomb.update(&TickContext::unscaled(DT), Some(&mut world)) {
                    reports.push(report);
                }
            }

            assert_eq!(reports.len(), 1);
            assert!(!bomb.is_active());
            assert_eq!(bomb.phase(), ProjectilePhase::Exploded);
        }
    }

    mod explode_tests {
        use super::*;

        #[test]
        fn explode_twice_applies_once() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::new(10.0, 0.0), Vec2::new(10.0, 0.0));

            assert!(bomb.explode(Some(&mut world)).is_some());
            let hp = world.player.health.current();
            assert!(bomb.explode(Some(&mut world)).is_none());
            assert_eq!(world.player.health.current(), hp);
            assert_eq!(hp, 85.0);
        }

        #[test]
        fn missing_world_still_releases() {
            let mut bomb = launched(Vec2::ZERO, Vec2::ZERO);
            assert!(bomb.explode(None).is_none());
            assert!(!bomb.is_active());
            assert!(bomb.has_exploded());
        }

        #[test]
        fn update_without_world_lands_and_explodes() {
            let mut bomb = launched(Vec2::new(50.0, 0.0), Vec2::ZERO);
            for _ in 0..400 {
                bomb.update(&TickContext::unscaled(DT), None);
            }
            assert!(!bomb.is_active());
            assert_eq!(bomb.phase(), ProjectilePhase::Exploded);
        }

        #[test]
        fn non_finite_state_releases_without_exploding() {
            let mut world = World::default();
            let mut bomb = launched(Vec2::ZERO, Vec2::ZERO);
            bomb.vz = f32::NAN;
            assert!(bomb.update(&TickContext::unscaled(DT), Some(&mut world)).is_none());
            assert!(!bomb.is_active());
            assert!(!bomb.has_exploded());
            assert_eq!(world.player.health.current(), 100.0);
        }

        #[test]
        fn release_is_exactly_once() {
            let mut bomb = launched(Vec2::ZERO, Vec2::ZERO);
            assert!(bomb.release());
            assert!(!bomb.release());
        }
    }

    #[test]
    fn relaunch_clears_previous_activation() {
        let mut world = World::default();
        let mut bomb = launched(Vec2::ZERO, Vec2::ZERO);
        bomb.explode(Some(&mut world));
        bomb.launch(Vec2::new(5.0, 5.0), Vec2::new(50.0, 5.0), &bomb_stats());

        assert!(bomb.is_active());
        assert!(!bomb.has_landed());
        assert!(!bomb.has_exploded());
        assert_eq!(bomb.phase(), ProjectilePhase::Airborne);
        assert_eq!(bomb.scale, 1.0);
    }

    #[test]
    fn reset_restores_inert() {
        let mut bomb = launched(Vec2::new(1.0, 2.0), Vec2::ZERO);
        bomb.reset();
        assert_eq!(bomb, Projectile::INERT);
    }
}
