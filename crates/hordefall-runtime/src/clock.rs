//! Fixed-timestep accumulator for the fixed-update cadence.

use hordefall_core::constants::{FIXED_TIMESTEP, MAX_FIXED_CATCHUP_SECS};

/// Accumulates scaled frame time and pays it out in fixed steps.
///
/// Fed scaled deltas, so a time scale of zero produces no fixed steps while
/// per-tick updates keep running. The backlog is clamped to avoid a spiral
/// of death after a long stall.
#[derive(Debug)]
pub struct FixedStep {
    timestep: f64,
    accumulator: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            timestep: FIXED_TIMESTEP,
            accumulator: 0.0,
        }
    }
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add this tick's scaled delta to the backlog.
    pub fn accumulate(&mut self, dt: f64) {
        self.accumulator = (self.accumulator + dt).min(MAX_FIXED_CATCHUP_SECS);
    }

    /// True while at least one full step is pending.
    pub fn should_step(&self) -> bool {
        self.accumulator >= self.timestep
    }

    /// Consume one fixed step from the backlog.
    pub fn consume(&mut self) {
        self.accumulator -= self.timestep;
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Drop any pending backlog (used on scheduler cleanup).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_consume() {
        let mut step = FixedStep::new();
        assert!(!step.should_step());

        // Two steps worth of time
        step.accumulate(FIXED_TIMESTEP * 2.0);
        assert!(step.should_step());
        step.consume();
        assert!(step.should_step());
        step.consume();
        assert!(!step.should_step());
    }

    #[test]
    fn test_zero_delta_produces_no_steps() {
        let mut step = FixedStep::new();
        for _ in 0..100 {
            step.accumulate(0.0);
        }
        assert!(!step.should_step());
    }

    #[test]
    fn test_backlog_clamp() {
        let mut step = FixedStep::new();
        step.accumulate(10.0);

        let mut steps = 0;
        while step.should_step() {
            step.consume();
            steps += 1;
        }
        let max_steps = (MAX_FIXED_CATCHUP_SECS / FIXED_TIMESTEP) as usize;
        assert!(
            steps <= max_steps,
            "clamp should cap catch-up at {} steps, got {}",
            max_steps,
            steps
        );
    }

    #[test]
    fn test_reset_drops_backlog() {
        let mut step = FixedStep::new();
        step.accumulate(FIXED_TIMESTEP * 3.0);
        step.reset();
        assert!(!step.should_step());
    }
}
