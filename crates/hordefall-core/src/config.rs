//! Runtime configuration and content definitions.
//!
//! Enemy and upgrade definitions are pre-loaded in-memory configuration:
//! the host supplies them at engine construction, or uses the default
//! roster/pool below.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{Tier, UpgradeKind};

/// Engine-wide tuning knobs. Every timed wait in the runtime reads from
/// here so tests can shrink the reference durations to milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// RNG seed for deterministic runs.
    pub seed: u64,
    /// Maximum wait for a database-backed system to report ready (seconds).
    pub database_wait_timeout_secs: f64,
    /// Poll interval while waiting on a database-backed system (seconds).
    pub database_poll_interval_secs: f64,
    /// Unscaled delay between upgrade selection and resume (seconds).
    pub resume_delay_secs: f64,
    /// Settle delay between cleanup and re-init during a restart (seconds).
    pub restart_settle_secs: f64,
    /// Number of upgrade choices offered at level-up.
    pub upgrade_offer_count: usize,
    /// Scaled seconds between wave number increments.
    pub wave_duration_secs: f64,
    /// Scaled seconds between enemy spawns.
    pub spawn_interval_secs: f64,
    /// Live enemy cap.
    pub max_live_enemies: usize,
    /// Enemies pre-spawned by the playing state's staged warm-up.
    pub warmup_spawn_count: usize,
    /// Warm-up enemies spawned per frame during state entry.
    pub warmup_batch_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            database_wait_timeout_secs: DATABASE_WAIT_TIMEOUT_SECS,
            database_poll_interval_secs: DATABASE_POLL_INTERVAL_SECS,
            resume_delay_secs: RESUME_DELAY_SECS,
            restart_settle_secs: RESTART_SETTLE_SECS,
            upgrade_offer_count: UPGRADE_OFFER_COUNT,
            wave_duration_secs: WAVE_DURATION_SECS,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            max_live_enemies: MAX_LIVE_ENEMIES,
            warmup_spawn_count: WARMUP_SPAWN_COUNT,
            warmup_batch_size: WARMUP_BATCH_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Config with all reference waits shrunk for unit tests.
    pub fn fast() -> Self {
        Self {
            database_wait_timeout_secs: 0.02,
            database_poll_interval_secs: 0.002,
            resume_delay_secs: 0.05,
            restart_settle_secs: 0.0,
            ..Self::default()
        }
    }
}

/// One enemy definition in the tier database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Unique id; empty or duplicate ids fail validation.
    pub enemy_id: String,
    pub display_name: String,
    pub tier: Tier,
    /// Earliest wave this enemy may appear in (1 = first wave).
    pub min_wave_number: u32,
    /// Abstract difficulty weight; also the experience awarded on kill.
    pub difficulty_value: f64,
    pub max_health: f64,
}

/// One upgrade definition in the upgrade pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Unique id.
    pub upgrade_id: String,
    pub display_name: String,
    pub kind: UpgradeKind,
    /// Stat multiplier applied per level taken (1.1 = +10% per level).
    pub multiplier_per_level: f64,
    /// Levels after which the upgrade stops appearing in offers.
    pub max_level: u32,
}

/// The default enemy roster: ten enemies across the five tiers.
pub fn default_enemy_roster() -> Vec<EnemyConfig> {
    fn enemy(id: &str, name: &str, tier: Tier, min_wave: u32, difficulty: f64, health: f64) -> EnemyConfig {
        EnemyConfig {
            enemy_id: id.to_string(),
            display_name: name.to_string(),
            tier,
            min_wave_number: min_wave,
            difficulty_value: difficulty,
            max_health: health,
        }
    }

    vec![
        enemy("shambler", "Shambler", Tier::Tier1, 1, 10.0, 20.0),
        enemy("walker", "Walker", Tier::Tier1, 1, 12.0, 25.0),
        enemy("runner", "Runner", Tier::Tier2, 3, 18.0, 30.0),
        enemy("spitter", "Spitter", Tier::Tier2, 4, 22.0, 28.0),
        enemy("brute", "Brute", Tier::Tier3, 6, 35.0, 90.0),
        enemy("stalker", "Stalker", Tier::Tier3, 7, 40.0, 60.0),
        enemy("reaver", "Reaver", Tier::Tier4, 10, 60.0, 140.0),
        enemy("wraith", "Wraith", Tier::Tier4, 12, 70.0, 110.0),
        enemy("behemoth", "Behemoth", Tier::Tier5, 15, 110.0, 400.0),
        enemy("titan", "Titan", Tier::Tier5, 18, 150.0, 600.0),
    ]
}

/// The default upgrade pool: one upgrade per stat axis.
pub fn default_upgrade_pool() -> Vec<UpgradeConfig> {
    fn upgrade(id: &str, name: &str, kind: UpgradeKind, mult: f64, max_level: u32) -> UpgradeConfig {
        UpgradeConfig {
            upgrade_id: id.to_string(),
            display_name: name.to_string(),
            kind,
            multiplier_per_level: mult,
            max_level,
        }
    }

    vec![
        upgrade("sharpened_edge", "Sharpened Edge", UpgradeKind::Damage, 1.15, 5),
        upgrade("rapid_strikes", "Rapid Strikes", UpgradeKind::AttackSpeed, 1.10, 5),
        upgrade("fleet_foot", "Fleet Foot", UpgradeKind::MoveSpeed, 1.08, 4),
        upgrade("iron_hide", "Iron Hide", UpgradeKind::MaxHealth, 1.20, 5),
        upgrade("keen_mind", "Keen Mind", UpgradeKind::ExperienceGain, 1.12, 3),
        upgrade("magnet_core", "Magnet Core", UpgradeKind::PickupRadius, 1.25, 3),
    ]
}
