//! Enumeration types used throughout the runtime.

use serde::{Deserialize, Serialize};

/// Enemy difficulty tier. Higher tiers unlock as the wave number climbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    Tier5,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 5] = [Tier::Tier1, Tier::Tier2, Tier::Tier3, Tier::Tier4, Tier::Tier5];
}

/// Stat axis an upgrade applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Outgoing damage multiplier.
    #[default]
    Damage,
    /// Attack cooldown reduction.
    AttackSpeed,
    /// Player movement speed.
    MoveSpeed,
    /// Maximum hit points.
    MaxHealth,
    /// Experience gain multiplier applied by the progression engine.
    ExperienceGain,
    /// Pickup attraction radius.
    PickupRadius,
}

/// Identifier for a UI screen managed by the UI system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenId {
    MainMenu,
    Hud,
    UpgradeSelection,
    GameOver,
}

/// Top-level phase tag reported in snapshots.
///
/// The phase is derived from the active game state; `Boot` means no state
/// has been entered yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Boot,
    Menu,
    Playing,
    GameOver,
}
