//! Events emitted by the runtime for UI and UX feedback.

use serde::{Deserialize, Serialize};

/// Gameplay events drained into the snapshot each tick for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Total score changed.
    ScoreChanged { score: u64 },
    /// Experience was added (after the gain multiplier).
    ExperienceGained { amount: u64, total: u64 },
    /// Player reached a new level.
    LevelUp { level: u32 },
    /// An upgrade offer set was presented.
    UpgradeOffered { count: usize },
    /// An upgrade selection was applied.
    UpgradeApplied { upgrade_id: String, new_level: u32 },
    /// The pause gate opened.
    GamePaused,
    /// The pause gate closed.
    GameResumed,
    /// The wave number advanced.
    WaveAdvanced { wave: u32 },
    /// An enemy entity was spawned.
    EnemySpawned { enemy_id: String },
    /// Fire-and-forget haptic feedback request.
    HapticPulse,
}
