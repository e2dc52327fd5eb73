//! Error types for configuration loading and spawning.
//!
//! Per-tick updates never fail; these only cover the fallible edges where
//! stats are loaded and entities are created.

use thiserror::Error;

/// Errors from loading or looking up stat configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// No enemy stats exist for this identifier.
    #[error("unknown enemy kind `{0}`")]
    UnknownEnemy(String),

    /// No weapon stats exist for this identifier.
    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),

    /// A stat block failed validation.
    #[error("invalid stats for `{id}`: {reason}")]
    Invalid {
        /// Identifier of the offending stat block.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Errors from spawning an entity into the simulation.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// Stat lookup failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every slot of the named pool is live.
    #[error("{0} pool exhausted")]
    PoolExhausted(&'static str),

    /// Difficulty scale must be strictly positive.
    #[error("difficulty scale must be positive, got {0}")]
    InvalidScale(f32),
}
