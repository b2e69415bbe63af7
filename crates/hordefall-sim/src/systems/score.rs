//! Score, experience, and level progression.
//!
//! Experience and score rise together; crossing the level threshold banks the
//! overflow, grows the threshold, and asks the pause coordinator to put up an
//! upgrade prompt. Threshold growth rounds to the nearest whole point.

use hordefall_core::constants::{BASE_EXPERIENCE_TO_LEVEL, EXPERIENCE_GROWTH_FACTOR};
use hordefall_core::enums::UpgradeKind;
use hordefall_core::error::Result;
use hordefall_core::events::GameEvent;
use hordefall_core::state::ProgressionView;
use hordefall_runtime::{GameContext, GameSystem};
use tracing::{debug, info, warn};

use crate::systems::pause::PauseCoordinator;
use crate::systems::upgrades::UpgradeSystem;

pub struct ScoreSystem {
    score: u64,
    experience: u64,
    level: u32,
    experience_to_next_level: u64,
}

impl Default for ScoreSystem {
    fn default() -> Self {
        Self {
            score: 0,
            experience: 0,
            level: 1,
            experience_to_next_level: BASE_EXPERIENCE_TO_LEVEL,
        }
    }
}

impl ScoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience_to_next_level(&self) -> u64 {
        self.experience_to_next_level
    }

    pub fn view(&self) -> ProgressionView {
        ProgressionView {
            score: self.score,
            experience: self.experience,
            level: self.level,
            experience_to_next_level: self.experience_to_next_level,
        }
    }

    pub fn add_score(&mut self, ctx: &mut GameContext, points: u64) {
        self.score = self.score.saturating_add(points);
        ctx.push_event(GameEvent::ScoreChanged { score: self.score });
    }

    /// Grants experience, scaled by any experience-gain upgrades, and checks
    /// the level threshold once.
    pub fn add_experience(&mut self, ctx: &mut GameContext, raw_amount: u64) {
        let multiplier = ctx
            .registry
            .get::<UpgradeSystem>()
            .filter(|upgrades| upgrades.borrow().is_database_loaded())
            .map(|upgrades| upgrades.borrow().multiplier(UpgradeKind::ExperienceGain))
            .unwrap_or(1.0);
        let amount = (raw_amount as f64 * multiplier).round() as u64;
        self.experience = self.experience.saturating_add(amount);
        self.score = self.score.saturating_add(amount);
        ctx.push_event(GameEvent::ExperienceGained {
            amount,
            total: self.experience,
        });
        ctx.push_event(GameEvent::ScoreChanged { score: self.score });
        self.check_level_up(ctx);
    }

    /// One threshold check per grant. A single large grant can bank
    /// experience past the next threshold without advancing a second level;
    /// the surplus counts toward the following check instead.
    fn check_level_up(&mut self, ctx: &mut GameContext) {
        if self.experience < self.experience_to_next_level {
            return;
        }
        self.experience -= self.experience_to_next_level;
        self.level += 1;
        self.experience_to_next_level =
            (self.experience_to_next_level as f64 * EXPERIENCE_GROWTH_FACTOR).round() as u64;
        info!(
            level = self.level,
            next_threshold = self.experience_to_next_level,
            "level up"
        );
        ctx.push_event(GameEvent::LevelUp { level: self.level });
        self.offer_upgrades(ctx);
    }

    fn offer_upgrades(&mut self, ctx: &mut GameContext) {
        let Some(upgrades) = ctx.registry.get::<UpgradeSystem>() else {
            warn!("upgrade system unavailable; skipping upgrade prompt");
            return;
        };
        if !upgrades.borrow().is_database_loaded() {
            debug!("upgrade pool not loaded; skipping upgrade prompt");
            return;
        }
        let offers = upgrades
            .borrow()
            .generate_upgrade_options(&mut ctx.rng, ctx.config.upgrade_offer_count);
        if offers.is_empty() {
            debug!("no upgrades left to offer");
            return;
        }
        let Some(coordinator) = ctx.registry.get::<PauseCoordinator>() else {
            warn!("pause coordinator unavailable; skipping upgrade prompt");
            return;
        };
        coordinator.borrow_mut().show_upgrade_selection(ctx, offers);
    }

    pub fn reset_for_restart(&mut self) {
        *self = Self::default();
    }
}

impl GameSystem for ScoreSystem {
    fn name(&self) -> &'static str {
        "score_system"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.reset_for_restart();
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.reset_for_restart();
        Ok(())
    }
}
