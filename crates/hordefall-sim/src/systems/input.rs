//! Input channel gating.
//!
//! Tracks which input channels gameplay currently accepts. The pause
//! coordinator cuts movement and actions while the upgrade prompt is up; UI
//! input stays live so the prompt itself remains answerable.

use hordefall_core::error::Result;
use hordefall_runtime::{GameContext, GameSystem};
use tracing::debug;

pub struct InputRouter {
    movement: bool,
    actions: bool,
    ui: bool,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self {
            movement: true,
            actions: true,
            ui: true,
        }
    }
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cuts movement and action input. UI input is left enabled.
    pub fn disable_all_input(&mut self) {
        self.movement = false;
        self.actions = false;
        debug!("gameplay input disabled");
    }

    pub fn enable_gameplay_input(&mut self) {
        self.movement = true;
        self.actions = true;
        debug!("gameplay input enabled");
    }

    pub fn gameplay_enabled(&self) -> bool {
        self.movement && self.actions
    }

    pub fn ui_enabled(&self) -> bool {
        self.ui
    }
}

impl GameSystem for InputRouter {
    fn name(&self) -> &'static str {
        "input_router"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
        *self = Self::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_leaves_ui_channel_live() {
        let mut input = InputRouter::new();
        assert!(input.gameplay_enabled());
        input.disable_all_input();
        assert!(!input.gameplay_enabled());
        assert!(input.ui_enabled(), "UI input must survive a gameplay cutoff");
        input.enable_gameplay_input();
        assert!(input.gameplay_enabled());
    }
}
