//! Pause gate and upgrade selection flow.
//!
//! Owns the single pause gate: level-ups pause the game behind an upgrade
//! prompt, and exactly one pause can be active at a time. Pausing stops
//! scaled time, spawning, and gameplay input, swaps the HUD for the upgrade
//! screen, and freezes live enemies through the active state. Resume undoes
//! all of it, after a short real-time delay when a selection was made.
//!
//! Every collaborator is looked up through the registry and missing ones are
//! logged and skipped, so a partially initialized runtime degrades instead of
//! failing.

use hordefall_core::config::UpgradeConfig;
use hordefall_core::enums::ScreenId;
use hordefall_core::error::Result;
use hordefall_core::events::GameEvent;
use hordefall_core::state::UpgradeOfferView;
use hordefall_runtime::{GameContext, GameStateMachine, GameSystem};
use tracing::{debug, error, info, warn};

use crate::systems::input::InputRouter;
use crate::systems::spawn::{self, SpawnDirector};
use crate::systems::ui::{UiSystem, UpgradeSelectionController};
use crate::systems::upgrades::UpgradeSystem;

#[derive(Default)]
pub struct PauseCoordinator {
    paused: bool,
    offers: Vec<UpgradeOfferView>,
    resume_at: Option<f64>,
}

impl PauseCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn offers(&self) -> &[UpgradeOfferView] {
        &self.offers
    }

    /// True between a selection and the delayed resume that follows it.
    pub fn resume_pending(&self) -> bool {
        self.resume_at.is_some()
    }

    /// Pauses the game behind an upgrade prompt.
    ///
    /// Rejected while a pause is already active, and with an empty offer
    /// list; both leave the current state untouched.
    pub fn show_upgrade_selection(&mut self, ctx: &mut GameContext, offers: Vec<UpgradeConfig>) {
        if self.paused {
            warn!("upgrade selection requested while already paused; ignored");
            return;
        }
        if offers.is_empty() {
            warn!("upgrade selection requested with no offers; ignored");
            return;
        }

        self.offers = self.build_offer_views(ctx, &offers);
        self.paused = true;
        self.resume_at = None;
        ctx.time_scale = 0.0;

        if let Some(director) = ctx.registry.get::<SpawnDirector>() {
            director.borrow_mut().stop_spawning();
        } else {
            warn!("spawn director unavailable during pause");
        }
        if let Some(input) = ctx.registry.get::<InputRouter>() {
            input.borrow_mut().disable_all_input();
        } else {
            warn!("input router unavailable during pause");
        }
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            let mut ui = ui.borrow_mut();
            ui.hide_screen(ScreenId::Hud);
            ui.register_controller(
                ScreenId::UpgradeSelection,
                Box::new(UpgradeSelectionController::new(self.offers.clone())),
            );
            ui.show_screen(ScreenId::UpgradeSelection);
        } else {
            warn!("ui system unavailable during pause");
        }
        if let Some(machine) = ctx.registry.get::<GameStateMachine>() {
            machine.borrow_mut().pause_current(ctx);
        } else {
            warn!("state machine unavailable during pause");
        }

        ctx.push_event(GameEvent::UpgradeOffered {
            count: self.offers.len(),
        });
        ctx.push_event(GameEvent::GamePaused);
        info!(offers = self.offers.len(), "paused for upgrade selection");
    }

    fn build_offer_views(
        &self,
        ctx: &mut GameContext,
        offers: &[UpgradeConfig],
    ) -> Vec<UpgradeOfferView> {
        let upgrades = ctx.registry.get::<UpgradeSystem>();
        offers
            .iter()
            .map(|config| {
                let next_level = upgrades
                    .as_ref()
                    .map(|u| u.borrow().level(&config.upgrade_id) + 1)
                    .unwrap_or(1);
                UpgradeOfferView::from_config(config, next_level)
            })
            .collect()
    }

    /// Handles the player's pick from the upgrade prompt.
    ///
    /// An out-of-range index applies nothing and forces an immediate resume
    /// so a bad selection can never leave the game stuck paused. A valid
    /// index applies the upgrade (failures are logged, not fatal) and
    /// schedules the resume after the configured real-time delay.
    pub fn on_upgrade_selected(&mut self, ctx: &mut GameContext, index: i32) {
        if !self.paused {
            warn!(index, "upgrade selected while not paused; ignored");
            return;
        }
        if self.resume_at.is_some() {
            warn!(index, "upgrade already selected; ignored");
            return;
        }
        if index < 0 || index as usize >= self.offers.len() {
            error!(
                index,
                offers = self.offers.len(),
                "upgrade selection out of range; resuming without applying"
            );
            self.resume_game(ctx);
            return;
        }

        let choice = self.offers[index as usize].clone();
        match ctx.registry.get::<UpgradeSystem>() {
            Some(upgrades) => {
                let applied = upgrades.borrow_mut().select_upgrade(&choice.upgrade_id);
                match applied {
                    Ok(new_level) => {
                        info!(upgrade = choice.upgrade_id.as_str(), new_level, "upgrade selected");
                        ctx.push_event(GameEvent::UpgradeApplied {
                            upgrade_id: choice.upgrade_id.clone(),
                            new_level,
                        });
                    }
                    Err(err) => {
                        error!(
                            upgrade = choice.upgrade_id.as_str(),
                            %err,
                            "failed to apply selected upgrade; resuming anyway"
                        );
                    }
                }
            }
            None => warn!("upgrade system unavailable; selection not applied"),
        }

        ctx.push_event(GameEvent::HapticPulse);
        self.resume_at = Some(ctx.time.real_elapsed_secs + ctx.config.resume_delay_secs);
        debug!(delay_secs = ctx.config.resume_delay_secs, "resume scheduled");
    }

    /// Tears the pause down: upgrade screen away, HUD back, time scale and
    /// spawning restored, gameplay input re-enabled, frozen enemies woken.
    pub fn resume_game(&mut self, ctx: &mut GameContext) {
        if !self.paused {
            warn!("resume requested while not paused; ignored");
            return;
        }

        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            let mut ui = ui.borrow_mut();
            ui.hide_screen(ScreenId::UpgradeSelection);
            ui.unregister_controller(ScreenId::UpgradeSelection);
            ui.show_screen(ScreenId::Hud);
        } else {
            warn!("ui system unavailable during resume");
        }
        ctx.time_scale = 1.0;
        if let Some(director) = ctx.registry.get::<SpawnDirector>() {
            director.borrow_mut().start_spawning();
        } else {
            warn!("spawn director unavailable during resume");
        }
        if let Some(input) = ctx.registry.get::<InputRouter>() {
            input.borrow_mut().enable_gameplay_input();
        } else {
            warn!("input router unavailable during resume");
        }
        // Wake-up runs unconditionally and tolerates already-woken enemies,
        // so a resume after a partial pause still clears every Frozen tag.
        let woken = spawn::wake_enemies(&mut ctx.world);
        if let Some(machine) = ctx.registry.get::<GameStateMachine>() {
            machine.borrow_mut().resume_current(ctx);
        }

        self.paused = false;
        self.offers.clear();
        self.resume_at = None;
        ctx.push_event(GameEvent::GameResumed);
        info!(woken, "resumed from upgrade selection");
    }
}

impl GameSystem for PauseCoordinator {
    fn name(&self) -> &'static str {
        "pause_coordinator"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn update(&mut self, ctx: &mut GameContext, _dt: f64) -> Result<()> {
        // The resume delay runs on real time; scaled time is stopped here.
        if let Some(deadline) = self.resume_at {
            if ctx.time.real_elapsed_secs >= deadline {
                self.resume_game(ctx);
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut GameContext) -> Result<()> {
        if self.paused {
            warn!("cleanup while paused; forcing resume");
            self.resume_game(ctx);
        }
        *self = Self::default();
        Ok(())
    }
}
