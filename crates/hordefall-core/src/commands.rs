//! Commands sent from the frontend to the engine.
//!
//! Commands are queued and drained at the next tick boundary, before any
//! system updates run.

use serde::{Deserialize, Serialize};

/// All possible frontend actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameCommand {
    // --- Run control ---
    /// Start a new run (menu -> playing).
    StartRun,
    /// End the current run (playing -> game over).
    EndRun,
    /// Return to the main menu.
    ReturnToMenu,
    /// Tear down and re-initialize every system.
    RestartSystems,

    // --- Combat results (reported by the excluded combat layer) ---
    /// An enemy was killed; despawns one live instance and awards its
    /// difficulty value as experience.
    ReportKill { enemy_id: String },

    // --- Upgrade flow ---
    /// Choose an entry from the currently displayed upgrade offers.
    SelectUpgrade { index: i32 },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 2.0 = double). Rejected while the
    /// pause gate holds the scale at zero.
    SetTimeScale { scale: f64 },

    // --- Development hooks ---
    /// Grant raw experience directly (dev/cheat path).
    GrantExperience { amount: u64 },
    /// Grant score directly (dev/cheat path).
    GrantScore { points: u64 },
}
