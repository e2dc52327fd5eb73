//! Enemy entity: behavioral state machine, movement policy and damage intake.
//!
//! Every enemy variant shares the same body (position, health, status
//! timers, knockback) and differs only in its [`Behavior`] data:
//! - [`Behavior::Ranged`]: keeps an optimal distance and lobs projectiles
//!   through a `Walking -> Attacking -> Walking` cycle
//! - [`Behavior::Melee`]: walks straight into the player for contact damage
//!
//! # Per-Tick Order
//!
//! 1. Dead enemies do nothing.
//! 2. Hit-stun and hit-flash count toward zero.
//! 3. A frozen enemy only counts its freeze timer down.
//! 4. The behavior branch runs (movement, attack cycle).
//! 5. Knockback drift is applied last, in every state.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::TickContext;
use crate::combat;
use crate::command::Command;
use crate::config::{BehaviorStats, EnemyStats};
use crate::pool::Reset;
use crate::world::player::PLAYER_RADIUS;
use crate::world::World;

use super::components::{Animation, StatusTimers};
use super::{Combatant, DamageOutcome, Facing, Health, Positioned};

/// Hit-stun applied by every damaging hit (seconds).
pub const HIT_STUN: f32 = 0.15;
/// Hit flash applied by every damaging hit (seconds).
pub const HIT_FLASH: f32 = 0.1;
/// Horizontal distance below which an attacking enemy keeps its facing.
pub const FACING_DEADZONE: f32 = 10.0;
/// Half-width of the strafe band around the optimal distance.
pub const STRAFE_BAND: f32 = 50.0;
/// Speed multiplier while retreating.
pub const RETREAT_SPEED: f32 = 0.6;
/// Speed multiplier while strafing.
pub const STRAFE_SPEED: f32 = 0.7;
/// Weight of the crowd separation vector.
pub const SEPARATION_WEIGHT: f32 = 0.5;
/// Share of the knockback vector applied per tick.
pub const KNOCKBACK_APPLY: f32 = 0.3;
/// Knockback retained after each tick.
pub const KNOCKBACK_DECAY: f32 = 0.9;
/// Attack animation plays at `frame_time * ATTACK_FRAME_SCALE` per frame.
pub const ATTACK_FRAME_SCALE: f32 = 1.5;

// =============================================================================
// State & behavior
// =============================================================================

/// Behavioral mode.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Moving under the distance policy.
    #[default]
    Walking,
    /// Playing the attack animation; movement suspended.
    Attacking,
}

/// Distance band relative to the optimal distance `D`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementBand {
    /// Farther than `D`: close in at full speed.
    Approach,
    /// At or inside `D - 50`: back off at 60% speed.
    Retreat,
    /// Within the band: circle at 70% speed.
    Strafe,
}

impl MovementBand {
    /// Classifies a distance against the optimal distance.
    #[must_use]
    pub fn classify(distance: f32, optimal: f32) -> Self {
        if distance > optimal {
            Self::Approach
        } else if distance <= optimal - STRAFE_BAND {
            Self::Retreat
        } else {
            Self::Strafe
        }
    }

    /// Velocity for this band given the unit direction to the player.
    #[must_use]
    pub fn velocity(self, to_player: Vec2, speed: f32) -> Vec2 {
        match self {
            Self::Approach => to_player * speed,
            Self::Retreat => -to_player * speed * RETREAT_SPEED,
            Self::Strafe => to_player.perp() * speed * STRAFE_SPEED,
        }
    }
}

/// Ranged attack state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedAttack {
    /// Seconds until the next attack may start.
    pub cooldown: f32,
    /// Cooldown restored after each attack.
    pub cooldown_max: f32,
    /// Maximum distance at which an attack starts.
    pub range: f32,
    /// Preferred distance to the player.
    pub optimal_distance: f32,
    /// Weapon thrown at the release frame.
    pub weapon: String,
    /// Attack frame that releases the projectile.
    pub release_frame: usize,
    /// Frames in the attack animation.
    pub attack_frames: usize,
    /// Set once the projectile of the current cycle has been released.
    pub released: bool,
}

/// Melee (contact) attack state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeAttack {
    /// Damage per contact.
    pub contact_damage: f32,
}

/// Variant-specific behavior data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Walks into the player.
    Melee(MeleeAttack),
    /// Keeps distance and throws projectiles.
    Ranged(RangedAttack),
}

impl Default for Behavior {
    fn default() -> Self {
        Self::Melee(MeleeAttack {
            contact_damage: 0.0,
        })
    }
}

impl Behavior {
    fn from_stats(stats: &BehaviorStats) -> Self {
        match stats {
            BehaviorStats::Melee(melee) => Self::Melee(MeleeAttack {
                contact_damage: melee.contact_damage,
            }),
            BehaviorStats::Ranged(ranged) => Self::Ranged(RangedAttack {
                cooldown: ranged.cooldown,
                cooldown_max: ranged.cooldown,
                range: ranged.range,
                optimal_distance: ranged.optimal_distance,
                weapon: ranged.weapon.clone(),
                release_frame: ranged.release_frame,
                attack_frames: ranged.attack_frames,
                released: false,
            }),
        }
    }

    /// Returns the ranged state, if this is a ranged enemy.
    #[must_use]
    pub const fn as_ranged(&self) -> Option<&RangedAttack> {
        match self {
            Self::Ranged(ranged) => Some(ranged),
            Self::Melee(_) => None,
        }
    }
}

// =============================================================================
// Enemy
// =============================================================================

/// One spawned hostile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stat table identifier this enemy was spawned from.
    pub kind: String,
    /// World position.
    pub pos: Vec2,
    /// Horizontal facing.
    pub facing: Facing,
    /// Collision and separation radius.
    pub radius: f32,
    /// Mass used by crowd separation.
    pub mass: f32,
    /// Movement speed.
    pub speed: f32,
    /// Damage-resistance divisor for scaled variants.
    pub hp_scale: f32,
    /// Health.
    pub health: Health,
    /// Status timers.
    pub timers: StatusTimers,
    /// Decaying knockback impulse.
    pub knockback: Vec2,
    /// Crowd separation vector, written by the crowd pass each tick.
    pub separation: Vec2,
    /// Behavioral mode.
    pub state: EnemyState,
    /// Animation cursor.
    pub anim: Animation,
    /// Variant behavior.
    pub behavior: Behavior,
    /// Sprite currently shown.
    pub sprite: SpriteId,
    walk_frames: usize,
    sprite_walk: SpriteId,
    sprite_attack: SpriteId,
    dead: bool,
}

impl Enemy {
    /// Creates an enemy from stats. See [`Enemy::init`].
    #[must_use]
    pub fn new(kind: &str, stats: &EnemyStats, pos: Vec2, scale: f32, assets: &AssetCatalog) -> Self {
        let mut enemy = Self::default();
        enemy.init(kind, stats, pos, scale, assets);
        enemy
    }

    /// (Re)initializes this enemy for a new activation.
    ///
    /// Every field is reset first, so pooled enemies never carry state from
    /// a previous life. `scale` becomes the hp-scale damage divisor and must
    /// be positive.
    pub fn init(&mut self, kind: &str, stats: &EnemyStats, pos: Vec2, scale: f32, assets: &AssetCatalog) {
        debug_assert!(scale > 0.0, "difficulty scale must be positive");
        self.reset();

        let sprite_walk = assets.sprite(&stats.sprite_walk);
        let sprite_attack = stats
            .sprite_attack
            .as_deref()
            .map_or(sprite_walk, |name| assets.sprite(name));

        self.kind = kind.to_owned();
        self.pos = pos;
        self.radius = stats.radius;
        self.mass = stats.mass;
        self.speed = stats.speed;
        self.hp_scale = scale;
        self.health = Health::new(stats.hp);
        self.anim = Animation::new(stats.walk_frames, stats.frame_time);
        self.walk_frames = stats.walk_frames;
        self.behavior = Behavior::from_stats(&stats.behavior);
        self.sprite_walk = sprite_walk;
        self.sprite_attack = sprite_attack;
        self.sprite = sprite_walk;
    }

    /// Base damage routine: health, hit flash, hit-stun and death.
    fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.health.apply(amount);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hit { .. } => {
                self.timers.hit_flash = HIT_FLASH;
                self.timers.hit_stun = HIT_STUN;
            }
            DamageOutcome::Killed { .. } => {
                self.timers.hit_flash = HIT_FLASH;
                self.dead = true;
                debug!(kind = %self.kind, pos = ?self.pos, "enemy killed");
            }
        }
        outcome
    }

    /// Adds a knockback impulse. Ignored once dead.
    pub fn apply_knockback(&mut self, impulse: Vec2) {
        if !self.dead {
            self.knockback += impulse;
        }
    }

    /// Freezes the enemy for at least `seconds`. Ignored once dead.
    pub fn freeze(&mut self, seconds: f32) {
        if !self.dead {
            self.timers.frozen = self.timers.frozen.max(seconds);
        }
    }

    /// Returns true if the enemy has strayed too far from the player.
    #[must_use]
    pub fn is_off_world(&self, player: Vec2, limit: f32) -> bool {
        self.pos.distance_squared(player) > limit * limit
    }

    fn update_ranged(&mut self, ctx: &TickContext, world: &mut World, to_player: Vec2, distance: f32) {
        let Behavior::Ranged(attack) = &mut self.behavior else {
            return;
        };
        let stunned = self.timers.is_stunned();

        match self.state {
            EnemyState::Attacking => {
                if to_player.x.abs() > FACING_DEADZONE {
                    self.facing = Facing::toward(to_player.x);
                }

                let step = self.anim.frame_time * ATTACK_FRAME_SCALE;
                if !self.anim.advance(ctx.dt, step) {
                    return;
                }

                if self.anim.frame == attack.release_frame && !attack.released {
                    attack.released = true;
                    let target = world.player.pos;
                    world.issue(Command::SpawnProjectile {
                        weapon: attack.weapon.clone(),
                        origin: self.pos,
                        target,
                    });
                    world.play("bomb_throw");
                    debug!(kind = %self.kind, pos = ?self.pos, "projectile released");
                }

                if self.anim.is_finished() {
                    self.state = EnemyState::Walking;
                    attack.cooldown = attack.cooldown_max;
                    attack.released = false;
                    self.anim = Animation::new(self.walk_frames, self.anim.frame_time);
                    self.sprite = self.sprite_walk;
                    debug!(kind = %self.kind, cooldown = attack.cooldown, "attack finished");
                }
            }
            EnemyState::Walking => {
                if !stunned {
                    let policy = if distance > f32::EPSILON {
                        MovementBand::classify(distance, attack.optimal_distance)
                            .velocity(to_player / distance, self.speed)
                    } else {
                        Vec2::ZERO
                    };
                    let velocity = policy + self.separation * SEPARATION_WEIGHT;
                    self.pos += velocity * ctx.dt;
                    if velocity.x != 0.0 {
                        self.facing = Facing::toward(velocity.x);
                    }
                }
                self.anim.advance_looping(ctx.dt);

                attack.cooldown = (attack.cooldown - ctx.dt * ctx.scale.cooldown).max(0.0);
                if attack.cooldown <= 0.0 && distance <= attack.range && !stunned {
                    self.state = EnemyState::Attacking;
                    attack.released = false;
                    self.anim = Animation::new(attack.attack_frames, self.anim.frame_time);
                    self.sprite = self.sprite_attack;
                    world.play("bomb_windup");
                    debug!(kind = %self.kind, distance, "attack started");
                }
            }
        }
    }

    fn update_melee(&mut self, ctx: &TickContext, world: &mut World, to_player: Vec2, distance: f32) {
        let Behavior::Melee(attack) = &self.behavior else {
            return;
        };
        let contact_damage = attack.contact_damage;

        if !self.timers.is_stunned() {
            let chase = to_player.normalize_or_zero() * self.speed;
            let velocity = chase + self.separation * SEPARATION_WEIGHT;
            self.pos += velocity * ctx.dt;
            if velocity.x != 0.0 {
                self.facing = Facing::toward(velocity.x);
            }
        }
        self.anim.advance_looping(ctx.dt);

        if distance <= self.radius + PLAYER_RADIUS && contact_damage > 0.0 {
            combat::hurt_player_by_contact(world, contact_damage);
        }
    }

    fn drift(&mut self) {
        self.pos += self.knockback * KNOCKBACK_APPLY;
        self.knockback *= KNOCKBACK_DECAY;
        if self.knockback.length_squared() < 1e-6 {
            self.knockback = Vec2::ZERO;
        }
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            kind: String::new(),
            pos: Vec2::ZERO,
            facing: Facing::Right,
            radius: 0.0,
            mass: 1.0,
            speed: 0.0,
            hp_scale: 1.0,
            health: Health::default(),
            timers: StatusTimers::default(),
            knockback: Vec2::ZERO,
            separation: Vec2::ZERO,
            state: EnemyState::Walking,
            anim: Animation::default(),
            behavior: Behavior::default(),
            sprite: SpriteId::FALLBACK,
            walk_frames: 1,
            sprite_walk: SpriteId::FALLBACK,
            sprite_attack: SpriteId::FALLBACK,
            dead: false,
        }
    }
}

impl Reset for Enemy {
    fn reset(&mut self) {
        let kind = std::mem::take(&mut self.kind);
        *self = Self::default();
        // Keep the string allocation for the next activation.
        self.kind = kind;
        self.kind.clear();
    }
}

impl Positioned for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }
}

impl Combatant for Enemy {
    fn is_dead(&self) -> bool {
        self.dead
    }

    /// Divides `amount` by the hp-scale before the base damage routine, so
    /// flat damage sources do not trivialize scaled-up variants.
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.apply_damage(amount / self.hp_scale)
    }

    fn update(&mut self, ctx: &TickContext, world: &mut World) {
        if self.dead {
            return;
        }

        self.timers.decay_hit(ctx.dt);

        if self.timers.is_frozen() {
            self.timers.frozen = (self.timers.frozen - ctx.dt).max(0.0);
            return;
        }

        let to_player = world.player.pos - self.pos;
        let distance = to_player.length();

        match self.behavior {
            Behavior::Ranged(_) => self.update_ranged(ctx, world, to_player, distance),
            Behavior::Melee(_) => self.update_melee(ctx, world, to_player, distance),
        }

        self.drift();
    }
}
