//! Area-damage resolution against the world's collision domains.
//!
//! Explosions touch several independent collections: the player, pickups,
//! currency gems, particles and the indicator list. This module keeps those
//! queries in one place so every damage source resolves them the same way:
//! - [`resolve_explosion`]: player hit, area clear, shake, particles, shockwave
//! - [`apply_indicator_damage`]: the later pass of damaging indicators
//!   against enemies
//! - [`hurt_player_by_contact`]: rate-limited melee contact
//!
//! Every radius test is inclusive and uses squared distance. The area clear
//! is a binary kill radius with no falloff.
//!
//! # Example
//!
//! ```
//! use emberfall_core::combat::{clear_in_radius, within_radius};
//! use emberfall_core::world::Gem;
//! use glam::Vec2;
//!
//! let mut gems = vec![
//!     Gem::new(Vec2::new(80.0, 0.0), 1),
//!     Gem::new(Vec2::new(81.0, 0.0), 1),
//! ];
//! assert!(within_radius(Vec2::new(80.0, 0.0), Vec2::ZERO, 80.0));
//! assert_eq!(clear_in_radius(&mut gems, Vec2::ZERO, 80.0), 1);
//! assert_eq!(gems.len(), 1);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Combatant, DamageOutcome, Enemy, Positioned};
use crate::pool::Pool;
use crate::world::{Effects, Indicator, Player, World};

/// Knockback impulse applied by a damaging indicator to each enemy it hits.
pub const INDICATOR_KNOCKBACK: f32 = 40.0;

// =============================================================================
// Types
// =============================================================================

/// Parameters of one explosion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blast {
    /// Explosion center.
    pub center: Vec2,
    /// Kill radius (inclusive).
    pub radius: f32,
    /// Direct damage to the player.
    pub damage: f32,
    /// Requested shake intensity.
    pub shake_intensity: f32,
    /// Requested shake duration.
    pub shake_duration: f32,
    /// Decorative particles requested.
    pub particles: usize,
}

/// What an explosion did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerHit {
    /// Player was outside the radius.
    Outside,
    /// Player was inside but invulnerable.
    Blocked,
    /// Damage was applied.
    Damaged(DamageOutcome),
}

/// Summary of one resolved explosion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplosionReport {
    /// Player outcome.
    pub player: PlayerHit,
    /// Pickups removed.
    pub pickups_cleared: usize,
    /// Gems removed.
    pub gems_cleared: usize,
    /// Particles actually spawned.
    pub particles: usize,
}

/// Summary of one indicator damage pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDamage {
    /// Indicators applied this pass.
    pub indicators: usize,
    /// Enemy hits that dealt damage.
    pub hits: usize,
    /// Enemies killed.
    pub kills: usize,
}

// =============================================================================
// Queries
// =============================================================================

/// Returns true if `point` lies within `radius` of `center` (inclusive).
#[must_use]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Removes every item within `radius` of `center`; returns how many.
///
/// Removal is index-stable: survivors keep their relative order.
pub fn clear_in_radius<T: Positioned>(items: &mut Vec<T>, center: Vec2, radius: f32) -> usize {
    let before = items.len();
    items.retain(|item| !within_radius(item.position(), center, radius));
    before - items.len()
}

/// Damages the player if inside the radius and not invulnerable.
///
/// Invulnerability suppresses both the damage and the hit flash.
pub fn damage_player_in_radius(player: &mut Player, center: Vec2, radius: f32, damage: f32) -> PlayerHit {
    if !within_radius(player.pos, center, radius) {
        PlayerHit::Outside
    } else if player.is_invulnerable() {
        PlayerHit::Blocked
    } else {
        PlayerHit::Damaged(player.take_damage(damage))
    }
}

/// Applies melee contact damage to the player.
///
/// Rate-limited by the player's contact window; a landed hit plays the hurt
/// cue and shows a hit number.
pub fn hurt_player_by_contact(world: &mut World, amount: f32) -> DamageOutcome {
    let outcome = world.player.take_contact_damage(amount);
    if outcome != DamageOutcome::Ignored {
        world.effects.hit_text(world.player.pos, outcome.dealt());
        world.play("player_hurt");
    }
    outcome
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves one explosion against the world.
///
/// 1. Direct damage to the player if inside the radius.
/// 2. Pickups and gems inside the radius are removed.
/// 3. Screen shake, particle burst, rendering-only shockwave and cue.
pub fn resolve_explosion(world: &mut World, blast: &Blast) -> ExplosionReport {
    let player = damage_player_in_radius(&mut world.player, blast.center, blast.radius, blast.damage);
    if let PlayerHit::Damaged(outcome) = player {
        if outcome != DamageOutcome::Ignored {
            world.effects.hit_text(world.player.pos, outcome.dealt());
            world.play("player_hurt");
        }
    }

    let pickups_cleared = clear_in_radius(&mut world.pickups, blast.center, blast.radius);
    let gems_cleared = clear_in_radius(&mut world.gems, blast.center, blast.radius);

    world
        .effects
        .shake
        .request(blast.shake_intensity, blast.shake_duration);
    let particles = world.effects.burst(&mut world.rng, blast.center, blast.particles);
    world
        .effects
        .push_indicator(Indicator::shockwave(blast.center, blast.radius));
    world.play("explosion");

    debug!(
        center = ?blast.center,
        radius = blast.radius,
        player = ?player,
        pickups_cleared,
        gems_cleared,
        "explosion resolved"
    );

    ExplosionReport {
        player,
        pickups_cleared,
        gems_cleared,
        particles,
    }
}

/// Applies every pending damaging indicator to the enemies inside it.
///
/// Each indicator is applied once and then marked resolved. Zero-damage
/// indicators (landing telegraphs, shockwaves) are never applied. Hit
/// enemies are knocked away from the indicator center.
pub fn apply_indicator_damage(effects: &mut Effects, enemies: &mut Pool<Enemy>) -> IndicatorDamage {
    let mut summary = IndicatorDamage::default();

    for index in 0..effects.indicators.len() {
        let indicator = effects.indicators[index];
        if !indicator.is_pending_damage() {
            continue;
        }
        effects.indicators[index].resolved = true;
        summary.indicators += 1;

        for (_, enemy) in enemies.iter_mut() {
            if enemy.is_dead() || !within_radius(enemy.pos, indicator.pos, indicator.radius) {
                continue;
            }
            let outcome = enemy.take_damage(indicator.damage);
            if outcome == DamageOutcome::Ignored {
                continue;
            }
            summary.hits += 1;
            if outcome.is_lethal() {
                summary.kills += 1;
            } else {
                let away = (enemy.pos - indicator.pos).normalize_or_zero();
                enemy.apply_knockback(away * INDICATOR_KNOCKBACK);
            }
            effects.hit_text(enemy.pos, outcome.dealt());
        }
    }

    if summary.indicators > 0 {
        debug!(
            indicators = summary.indicators,
            hits = summary.hits,
            kills = summary.kills,
            "indicator damage applied"
        );
    }
    summary
}
