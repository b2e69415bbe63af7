//! Error type shared across the runtime.

use thiserror::Error;

/// Errors surfaced by systems, states, and the upgrade/enemy databases.
///
/// None of these are fatal: the scheduler and the pause coordinator are the
/// failure boundaries that log and continue.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{0} database is not loaded")]
    DatabaseNotLoaded(&'static str),

    #[error("unknown enemy id '{id}'")]
    UnknownEnemy { id: String },

    #[error("unknown upgrade id '{id}'")]
    UnknownUpgrade { id: String },

    #[error("upgrade index {index} out of range for {count} offers")]
    UpgradeIndexOutOfRange { index: i32, count: usize },

    #[error("upgrade '{id}' is already at max level {max}")]
    UpgradeAtMaxLevel { id: String, max: u32 },

    #[error("system '{system}' failed to initialize: {reason}")]
    SystemInit { system: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
