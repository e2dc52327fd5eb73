//! Visual feedback collaborators: particles, hit texts, indicators, shake.
//!
//! None of these affect gameplay except indicators with non-zero damage,
//! which the enemy collision pass in [`crate::combat`] consumes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{PoolSizes, ShakeCap};
use crate::pool::{Pool, Reset};

/// Lifetime of a decorative particle (seconds).
pub const PARTICLE_LIFE: f32 = 0.5;
/// Maximum position jitter of a burst particle around its center.
pub const PARTICLE_JITTER: f32 = 10.0;
/// Maximum speed of a burst particle.
pub const PARTICLE_SPEED: f32 = 120.0;
/// Lifetime of a floating hit text.
pub const HIT_TEXT_LIFE: f32 = 0.8;
/// Upward drift of a hit text (units per second).
pub const HIT_TEXT_RISE: f32 = 30.0;
/// Lifetime of an explosion shockwave indicator.
pub const SHOCKWAVE_LIFE: f32 = 0.3;

// =============================================================================
// Pooled effects
// =============================================================================

/// A decorative particle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position.
    pub pos: Vec2,
    /// Velocity.
    pub vel: Vec2,
    /// Remaining life.
    pub life: f32,
}

impl Reset for Particle {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A floating damage number.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitText {
    /// Position.
    pub pos: Vec2,
    /// Damage shown.
    pub amount: f32,
    /// Remaining life.
    pub life: f32,
}

impl Reset for HitText {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Indicators
// =============================================================================

/// What an indicator represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    /// Telegraph of a landed bomb's upcoming explosion.
    Landing,
    /// Rendering-only ring left by an explosion.
    Shockwave,
    /// Damaging area (player-side bombs and other area sources).
    Blast,
}

/// An entry in the global indicator list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Kind.
    pub kind: IndicatorKind,
    /// Center.
    pub pos: Vec2,
    /// Radius.
    pub radius: f32,
    /// Remaining display time.
    pub ttl: f32,
    /// Damage dealt to enemies inside the radius. Zero for rendering-only
    /// indicators.
    pub damage: f32,
    /// Set once the enemy collision pass has applied this indicator.
    pub resolved: bool,
}

impl Indicator {
    /// Warning telegraph showing the explosion radius and remaining fuse.
    #[must_use]
    pub fn landing(pos: Vec2, radius: f32, fuse: f32) -> Self {
        Self {
            kind: IndicatorKind::Landing,
            pos,
            radius,
            ttl: fuse,
            damage: 0.0,
            resolved: false,
        }
    }

    /// Rendering-only explosion ring. Always zero damage.
    #[must_use]
    pub fn shockwave(pos: Vec2, radius: f32) -> Self {
        Self {
            kind: IndicatorKind::Shockwave,
            pos,
            radius,
            ttl: SHOCKWAVE_LIFE,
            damage: 0.0,
            resolved: false,
        }
    }

    /// Damaging area applied once to every enemy inside the radius.
    #[must_use]
    pub fn blast(pos: Vec2, radius: f32, damage: f32, ttl: f32) -> Self {
        Self {
            kind: IndicatorKind::Blast,
            pos,
            radius,
            ttl,
            damage,
            resolved: false,
        }
    }

    /// Returns true if the enemy collision pass still has to apply this.
    #[must_use]
    pub fn is_pending_damage(&self) -> bool {
        self.damage > 0.0 && !self.resolved
    }
}

// =============================================================================
// Screen shake
// =============================================================================

/// Rate limiter for screen shake requests.
///
/// Overlapping requests keep the strongest intensity and the longest
/// duration instead of adding up, and both are capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeLimiter {
    intensity: f32,
    remaining: f32,
    cap: ShakeCap,
}

impl ShakeLimiter {
    /// Creates an idle limiter with the given caps.
    #[must_use]
    pub fn new(cap: ShakeCap) -> Self {
        Self {
            intensity: 0.0,
            remaining: 0.0,
            cap,
        }
    }

    /// Requests a shake; returns the resulting (capped) intensity.
    pub fn request(&mut self, intensity: f32, duration: f32) -> f32 {
        self.intensity = self.intensity.max(intensity).min(self.cap.max_intensity);
        self.remaining = self.remaining.max(duration).min(self.cap.max_duration);
        self.intensity
    }

    /// Counts the shake down; intensity drops to zero when it ends.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.intensity = 0.0;
        }
    }

    /// Current intensity.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Remaining duration.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Default for ShakeLimiter {
    fn default() -> Self {
        Self::new(ShakeCap::default())
    }
}

// =============================================================================
// Effects
// =============================================================================

/// All visual feedback state owned by the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effects {
    /// Decorative particles.
    pub particles: Pool<Particle>,
    /// Floating hit numbers.
    pub hit_texts: Pool<HitText>,
    /// Global indicator list.
    pub indicators: Vec<Indicator>,
    /// Screen shake limiter.
    pub shake: ShakeLimiter,
}

impl Effects {
    /// Creates effects with the given pool sizes and shake caps.
    #[must_use]
    pub fn new(pools: &PoolSizes, shake: ShakeCap) -> Self {
        Self {
            particles: Pool::with_capacity(pools.particles),
            hit_texts: Pool::with_capacity(pools.hit_texts),
            indicators: Vec::new(),
            shake: ShakeLimiter::new(shake),
        }
    }

    /// Spawns up to `count` particles around `center` with random jitter
    /// and velocity. Stops early when the pool runs out. Returns how many
    /// were spawned.
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, center: Vec2, count: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            let Some((_, particle)) = self.particles.acquire() else {
                trace!(requested = count, spawned, "particle pool full");
                break;
            };
            let jitter = Vec2::new(
                rng.gen_range(-PARTICLE_JITTER..=PARTICLE_JITTER),
                rng.gen_range(-PARTICLE_JITTER..=PARTICLE_JITTER),
            );
            let vel = Vec2::new(
                rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                rng.gen_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
            );
            particle.pos = center + jitter;
            particle.vel = vel;
            particle.life = PARTICLE_LIFE;
            spawned += 1;
        }
        spawned
    }

    /// Shows a floating damage number. Silently skipped when the pool is full.
    pub fn hit_text(&mut self, pos: Vec2, amount: f32) {
        if let Some((_, text)) = self.hit_texts.acquire() {
            text.pos = pos;
            text.amount = amount;
            text.life = HIT_TEXT_LIFE;
        }
    }

    /// Appends an indicator.
    pub fn push_indicator(&mut self, indicator: Indicator) {
        self.indicators.push(indicator);
    }

    /// Ages every effect and drops the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for handle in self.particles.handles() {
            let expired = self.particles.get_mut(handle).is_some_and(|p| {
                p.pos += p.vel * dt;
                p.life -= dt;
                p.life <= 0.0
            });
            if expired {
                self.particles.release(handle);
            }
        }

        for handle in self.hit_texts.handles() {
            let expired = self.hit_texts.get_mut(handle).is_some_and(|t| {
                t.pos.y -= HIT_TEXT_RISE * dt;
                t.life -= dt;
                t.life <= 0.0
            });
            if expired {
                self.hit_texts.release(handle);
            }
        }

        for indicator in &mut self.indicators {
            indicator.ttl -= dt;
        }
        self.indicators.retain(|indicator| indicator.ttl > 0.0);

        self.shake.tick(dt);
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(&PoolSizes::default(), ShakeCap::default())
    }
}
