//! Run snapshot — the complete visible state sent to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::config::UpgradeConfig;
use crate::enums::{Phase, UpgradeKind};
use crate::events::GameEvent;
use crate::types::GameTime;

/// Complete runtime state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub time: GameTime,
    pub phase: Phase,
    /// True while a state transition is in flight.
    pub transitioning: bool,
    pub time_scale: f64,
    pub progression: ProgressionView,
    pub pause: PauseView,
    pub wave: WaveView,
    /// Events drained this tick.
    pub events: Vec<GameEvent>,
}

/// Score/experience/level state for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionView {
    pub score: u64,
    pub experience: u64,
    pub level: u32,
    pub experience_to_next_level: u64,
}

impl Default for ProgressionView {
    fn default() -> Self {
        Self {
            score: 0,
            experience: 0,
            level: 1,
            experience_to_next_level: crate::constants::BASE_EXPERIENCE_TO_LEVEL,
        }
    }
}

/// Pause gate state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseView {
    pub paused: bool,
    /// Offers currently displayed (empty when not paused).
    pub offers: Vec<UpgradeOfferView>,
    /// True after a selection, while the unscaled resume delay runs.
    pub resume_pending: bool,
}

/// One upgrade offer as shown to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeOfferView {
    pub upgrade_id: String,
    pub display_name: String,
    pub kind: UpgradeKind,
    /// Level the upgrade would reach if chosen.
    pub next_level: u32,
}

impl UpgradeOfferView {
    /// View of an offer that would take `config` to `next_level`.
    pub fn from_config(config: &UpgradeConfig, next_level: u32) -> Self {
        Self {
            upgrade_id: config.upgrade_id.clone(),
            display_name: config.display_name.clone(),
            kind: config.kind,
            next_level,
        }
    }
}

/// Wave/spawn state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave_number: u32,
    pub live_enemies: usize,
    pub total_spawned: u64,
    pub spawning: bool,
}
