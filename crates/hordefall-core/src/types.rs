//! Fundamental time tracking for the fixed-rate loop.

use serde::{Deserialize, Serialize};

/// Game time tracking, scaled and unscaled.
///
/// Scaled time stops when the pause gate drops the time scale to zero;
/// unscaled time always advances and drives real-time waits such as the
/// post-selection resume delay.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GameTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed scaled game time in seconds.
    pub elapsed_secs: f64,
    /// Elapsed unscaled wall-clock time in seconds.
    pub real_elapsed_secs: f64,
    /// Scaled delta for this tick in seconds.
    pub delta: f64,
    /// Unscaled delta for this tick in seconds.
    pub real_delta: f64,
}

impl GameTime {
    /// Advance by one tick of `real_dt` seconds at the given time scale.
    pub fn advance(&mut self, real_dt: f64, time_scale: f64) {
        self.tick += 1;
        self.real_delta = real_dt;
        self.delta = real_dt * time_scale;
        self.real_elapsed_secs += self.real_delta;
        self.elapsed_secs += self.delta;
    }
}
