//! Runtime constants and tuning parameters.

/// Game loop tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Fixed update ---

/// Fixed update timestep in seconds (matches the classic 50 Hz physics step).
pub const FIXED_TIMESTEP: f64 = 0.02;

/// Maximum scaled time consumed by fixed-update catch-up in one tick.
/// Prevents a spiral of death after a long stall.
pub const MAX_FIXED_CATCHUP_SECS: f64 = 0.25;

// --- Progression ---

/// Experience required to reach level 2.
pub const BASE_EXPERIENCE_TO_LEVEL: u64 = 100;

/// Multiplicative growth of the level threshold per level, rounded to nearest.
pub const EXPERIENCE_GROWTH_FACTOR: f64 = 1.2;

/// Number of upgrade choices offered at level-up.
pub const UPGRADE_OFFER_COUNT: usize = 3;

// --- Pause / upgrade flow ---

/// Unscaled delay between upgrade selection and resume (seconds).
pub const RESUME_DELAY_SECS: f64 = 0.3;

// --- System initialization ---

/// Maximum wait for a database-backed system to report ready (seconds).
pub const DATABASE_WAIT_TIMEOUT_SECS: f64 = 10.0;

/// Poll interval while waiting on a database-backed system (seconds).
pub const DATABASE_POLL_INTERVAL_SECS: f64 = 0.1;

/// Settle delay between cleanup and re-initialization during a restart (seconds).
pub const RESTART_SETTLE_SECS: f64 = 0.5;

// --- Spawning ---

/// Scaled seconds between wave number increments.
pub const WAVE_DURATION_SECS: f64 = 30.0;

/// Scaled seconds between enemy spawns while spawning is enabled.
pub const SPAWN_INTERVAL_SECS: f64 = 1.5;

/// Radius of the spawn ring around the arena origin (world units).
pub const SPAWN_RING_RADIUS: f32 = 18.0;

/// Maximum number of live enemies; spawning skips while at the cap.
pub const MAX_LIVE_ENEMIES: usize = 200;

/// Enemies pre-spawned by the playing state's staged warm-up.
pub const WARMUP_SPAWN_COUNT: usize = 6;

/// Warm-up enemies spawned per frame during state entry.
pub const WARMUP_BATCH_SIZE: usize = 3;
