//! Static tuning: simulation settings and per-identifier stat tables.
//!
//! [`StatTable`] is the read-only lookup every spawn goes through. It is
//! validated once when loaded, so update code can assume every cooldown,
//! range and frame index is sane.
//!
//! # Example
//!
//! ```
//! use emberfall_core::config::{BehaviorStats, StatTable};
//!
//! let stats = StatTable::builtin();
//! let bomber = stats.enemy("bomber").unwrap();
//! assert!(matches!(bomber.behavior, BehaviorStats::Ranged(_)));
//!
//! let bomb = stats.weapon("bomb").unwrap();
//! assert!(bomb.radius > 0.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clock::FreezeScales;
use crate::error::ConfigError;

// =============================================================================
// Simulation settings
// =============================================================================

/// Fixed pool capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSizes {
    /// Live enemy slots.
    pub enemies: usize,
    /// Live projectile slots.
    pub projectiles: usize,
    /// Decorative particle slots.
    pub particles: usize,
    /// Floating hit-text slots.
    pub hit_texts: usize,
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            enemies: 256,
            projectiles: 128,
            particles: 512,
            hit_texts: 64,
        }
    }
}

/// Upper bounds for accumulated screen shake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeCap {
    /// Maximum shake intensity.
    pub max_intensity: f32,
    /// Maximum remaining shake duration (seconds).
    pub max_duration: f32,
}

impl Default for ShakeCap {
    fn default() -> Self {
        Self {
            max_intensity: 12.0,
            max_duration: 0.6,
        }
    }
}

/// Top-level simulation settings.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the world RNG (particle jitter, drop scatter).
    pub seed: u64,
    /// Pool capacities.
    pub pools: PoolSizes,
    /// Freeze slow-motion multipliers.
    pub freeze: FreezeScales,
    /// Screen shake limits.
    pub shake: ShakeCap,
    /// Enemies farther than this from the player are despawned.
    pub despawn_distance: f32,
    /// Value of the gem a dead enemy drops.
    pub gem_value: u32,
    /// Player maximum health.
    pub player_max_hp: f32,
    /// Invulnerability window after the player takes contact damage.
    pub contact_invulnerability: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pools: PoolSizes::default(),
            freeze: FreezeScales::default(),
            shake: ShakeCap::default(),
            despawn_distance: 1600.0,
            gem_value: 1,
            player_max_hp: 100.0,
            contact_invulnerability: 0.5,
        }
    }
}

impl SimConfig {
    /// Parses settings from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Stat blocks
// =============================================================================

/// Ranged attack tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedStats {
    /// Seconds between attacks.
    pub cooldown: f32,
    /// Maximum distance at which an attack starts.
    pub range: f32,
    /// Preferred distance to the player.
    #[serde(default = "default_optimal_distance")]
    pub optimal_distance: f32,
    /// Weapon identifier of the thrown projectile.
    pub weapon: String,
    /// Attack animation frame that releases the projectile.
    #[serde(default = "default_release_frame")]
    pub release_frame: usize,
    /// Frames in the attack animation.
    #[serde(default = "default_attack_frames")]
    pub attack_frames: usize,
}

fn default_optimal_distance() -> f32 {
    250.0
}

fn default_release_frame() -> usize {
    8
}

fn default_attack_frames() -> usize {
    12
}

/// Melee (contact) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeStats {
    /// Damage per contact.
    pub contact_damage: f32,
}

/// Variant-specific stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorStats {
    /// Keeps distance and throws projectiles.
    Ranged(RangedStats),
    /// Walks into the player.
    Melee(MeleeStats),
}

/// Base stats for one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Maximum health.
    pub hp: f32,
    /// Movement speed (units per second).
    pub speed: f32,
    /// Collision and separation radius.
    pub radius: f32,
    /// Mass used by crowd separation.
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Seconds per animation frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    /// Frames in the walk cycle.
    #[serde(default = "default_walk_frames")]
    pub walk_frames: usize,
    /// Sprite shown while walking.
    pub sprite_walk: String,
    /// Sprite shown while attacking.
    #[serde(default)]
    pub sprite_attack: Option<String>,
    /// Variant-specific stats.
    pub behavior: BehaviorStats,
}

fn default_mass() -> f32 {
    1.0
}

fn default_frame_time() -> f32 {
    0.1
}

fn default_walk_frames() -> usize {
    6
}

/// Static tuning for a ballistic weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Initial upward velocity of the height axis.
    pub launch_speed: f32,
    /// Constant deceleration of the height axis.
    pub gravity: f32,
    /// Seconds between landing and detonation.
    pub fuse_time: f32,
    /// Explosion radius.
    pub radius: f32,
    /// Direct-hit damage to the player.
    pub damage: f32,
    /// Visual spin rate (radians per second).
    #[serde(default = "default_spin")]
    pub spin: f32,
    /// Requested screen shake intensity.
    #[serde(default = "default_shake_intensity")]
    pub shake_intensity: f32,
    /// Requested screen shake duration.
    #[serde(default = "default_shake_duration")]
    pub shake_duration: f32,
    /// Decorative particles per explosion.
    #[serde(default = "default_particles")]
    pub particles: usize,
}

fn default_spin() -> f32 {
    10.0
}

fn default_shake_intensity() -> f32 {
    6.0
}

fn default_shake_duration() -> f32 {
    0.3
}

fn default_particles() -> usize {
    12
}

impl WeaponStats {
    /// Seconds from launch until the height axis returns to zero.
    #[must_use]
    pub fn flight_time(&self) -> f32 {
        2.0 * self.launch_speed / self.gravity
    }
}

// =============================================================================
// Stat table
// =============================================================================

/// Read-only stat lookup by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    /// Enemy stats keyed by kind.
    #[serde(default)]
    pub enemies: BTreeMap<String, EnemyStats>,
    /// Weapon stats keyed by identifier.
    #[serde(default)]
    pub weapons: BTreeMap<String, WeaponStats>,
}

impl StatTable {
    /// Built-in tuning: a ranged `bomber`, a melee `chaser` and the `bomb`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut enemies = BTreeMap::new();
        enemies.insert(
            "bomber".to_owned(),
            EnemyStats {
                hp: 30.0,
                speed: 60.0,
                radius: 14.0,
                mass: 1.0,
                frame_time: 0.1,
                walk_frames: 6,
                sprite_walk: "bomber_walk".to_owned(),
                sprite_attack: Some("bomber_throw".to_owned()),
                behavior: BehaviorStats::Ranged(RangedStats {
                    cooldown: 3.0,
                    range: 320.0,
                    optimal_distance: default_optimal_distance(),
                    weapon: "bomb".to_owned(),
                    release_frame: default_release_frame(),
                    attack_frames: default_attack_frames(),
                }),
            },
        );
        enemies.insert(
            "chaser".to_owned(),
            EnemyStats {
                hp: 20.0,
                speed: 80.0,
                radius: 12.0,
                mass: 0.8,
                frame_time: 0.08,
                walk_frames: 4,
                sprite_walk: "chaser_walk".to_owned(),
                sprite_attack: None,
                behavior: BehaviorStats::Melee(MeleeStats {
                    contact_damage: 8.0,
                }),
            },
        );

        let mut weapons = BTreeMap::new();
        weapons.insert(
            "bomb".to_owned(),
            WeaponStats {
                launch_speed: 220.0,
                gravity: 440.0,
                fuse_time: 1.2,
                radius: 80.0,
                damage: 15.0,
                spin: default_spin(),
                shake_intensity: default_shake_intensity(),
                shake_duration: default_shake_duration(),
                particles: default_particles(),
            },
        );

        Self { enemies, weapons }
    }

    /// Parses and validates a stat table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first
    /// validation failure found by [`StatTable::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Looks up enemy stats.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnemy`] if `kind` is not present.
    pub fn enemy(&self, kind: &str) -> Result<&EnemyStats, ConfigError> {
        self.enemies
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownEnemy(kind.to_owned()))
    }

    /// Looks up weapon stats.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownWeapon`] if `id` is not present.
    pub fn weapon(&self, id: &str) -> Result<&WeaponStats, ConfigError> {
        self.weapons
            .get(id)
            .ok_or_else(|| ConfigError::UnknownWeapon(id.to_owned()))
    }

    /// Every sprite name the enemy table refers to, in kind order.
    pub fn sprite_names(&self) -> impl Iterator<Item = &str> {
        self.enemies.values().flat_map(|enemy| {
            std::iter::once(enemy.sprite_walk.as_str()).chain(enemy.sprite_attack.as_deref())
        })
    }

    /// Checks every stat block.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] or
    /// [`ConfigError::UnknownWeapon`] encountered, in identifier order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (id, weapon) in &self.weapons {
            positive(id, "launch_speed", weapon.launch_speed)?;
            positive(id, "gravity", weapon.gravity)?;
            positive(id, "fuse_time", weapon.fuse_time)?;
            positive(id, "radius", weapon.radius)?;
            if weapon.damage < 0.0 {
                return Err(ConfigError::invalid(id, "damage must not be negative"));
            }
        }

        for (id, enemy) in &self.enemies {
            positive(id, "hp", enemy.hp)?;
            positive(id, "frame_time", enemy.frame_time)?;
            positive(id, "radius", enemy.radius)?;
            positive(id, "mass", enemy.mass)?;
            if enemy.speed < 0.0 {
                return Err(ConfigError::invalid(id, "speed must not be negative"));
            }
            if enemy.walk_frames == 0 {
                return Err(ConfigError::invalid(id, "walk_frames must be at least 1"));
            }
            match &enemy.behavior {
                BehaviorStats::Ranged(ranged) => {
                    positive(id, "cooldown", ranged.cooldown)?;
                    positive(id, "range", ranged.range)?;
                    positive(id, "optimal_distance", ranged.optimal_distance)?;
                    if ranged.release_frame == 0 || ranged.release_frame >= ranged.attack_frames {
                        return Err(ConfigError::invalid(
                            id,
                            format!(
                                "release_frame {} must lie inside 1..{}",
                                ranged.release_frame, ranged.attack_frames
                            ),
                        ));
                    }
                    self.weapon(&ranged.weapon)?;
                }
                BehaviorStats::Melee(melee) => {
                    if melee.contact_damage < 0.0 {
                        return Err(ConfigError::invalid(
                            id,
                            "contact_damage must not be negative",
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn positive(id: &str, field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(id, format!("{field} must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sim_config_tests {
        use super::*;

        #[test]
        fn partial_json_fills_defaults() {
            let config = SimConfig::from_json_str(r#"{"seed": 7, "pools": {"enemies": 4}}"#).unwrap();
            assert_eq!(config.seed, 7);
            assert_eq!(config.pools.enemies, 4);
            assert_eq!(config.pools.projectiles, PoolSizes::default().projectiles);
            assert_eq!(config.freeze, FreezeScales::default());
        }

        #[test]
        fn malformed_json_is_a_parse_error() {
            let err = SimConfig::from_json_str("{ seed: ").unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
        }
    }

    mod stat_table_tests {
        use super::*;

        #[test]
        fn builtin_table_is_valid() {
            StatTable::builtin().validate().unwrap();
        }

        #[test]
        fn sprite_names_cover_walk_and_attack() {
            let stats = StatTable::builtin();
            let names: Vec<&str> = stats.sprite_names().collect();
            assert_eq!(names, vec!["bomber_walk", "bomber_throw", "chaser_walk"]);
        }

        #[test]
        fn builtin_bomb_lands_after_one_second() {
            let stats = StatTable::builtin();
            let bomb = stats.weapon("bomb").unwrap();
            assert!((bomb.flight_time() - 1.0).abs() < 1e-6);
        }

        #[test]
        fn unknown_ids_are_reported() {
            let stats = StatTable::builtin();
            assert!(matches!(
                stats.enemy("wraith"),
                Err(ConfigError::UnknownEnemy(id)) if id == "wraith"
            ));
            assert!(matches!(
                stats.weapon("mortar"),
                Err(ConfigError::UnknownWeapon(id)) if id == "mortar"
            ));
        }

        #[test]
        fn json_round_trip_preserves_table() {
            let stats = StatTable::builtin();
            let json = serde_json::to_string(&stats).unwrap();
            let parsed = StatTable::from_json_str(&json).unwrap();
            assert_eq!(parsed, stats);
        }

        #[test]
        fn ranged_json_uses_defaults() {
            let json = r#"{
                "enemies": {
                    "lobber": {
                        "hp": 10, "speed": 50, "radius": 10, "sprite_walk": "lobber",
                        "behavior": { "type": "ranged", "cooldown": 2, "range": 300, "weapon": "bomb" }
                    }
                },
                "weapons": {
                    "bomb": { "launch_speed": 100, "gravity": 200, "fuse_time": 1, "radius": 60, "damage": 5 }
                }
            }"#;
            let table = StatTable::from_json_str(json).unwrap();
            let BehaviorStats::Ranged(ranged) = &table.enemy("lobber").unwrap().behavior else {
                panic!("expected ranged stats");
            };
            assert_eq!(ranged.release_frame, 8);
            assert_eq!(ranged.attack_frames, 12);
            assert_eq!(ranged.optimal_distance, 250.0);
        }

        #[test]
        fn zero_cooldown_is_rejected() {
            let mut stats = StatTable::builtin();
            if let Some(EnemyStats {
                behavior: BehaviorStats::Ranged(ranged),
                ..
            }) = stats.enemies.get_mut("bomber")
            {
                ranged.cooldown = 0.0;
            }
            let err = stats.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { ref id, .. } if id == "bomber"));
        }

        #[test]
        fn release_frame_outside_animation_is_rejected() {
            let mut stats = StatTable::builtin();
            if let Some(EnemyStats {
                behavior: BehaviorStats::Ranged(ranged),
                ..
            }) = stats.enemies.get_mut("bomber")
            {
                ranged.release_frame = 12;
            }
            assert!(stats.validate().is_err());
        }

        #[test]
        fn ranged_enemy_with_missing_weapon_is_rejected() {
            let mut stats = StatTable::builtin();
            stats.weapons.clear();
            assert!(matches!(
                stats.validate(),
                Err(ConfigError::UnknownWeapon(id)) if id == "bomb"
            ));
        }
    }
}
