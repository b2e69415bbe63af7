//! Top-level game states: menu, playing, game over.
//!
//! States drive screens and the spawn director but never hold the state
//! machine themselves; transitions go through
//! [`GameContext::request_state`](hordefall_runtime::GameContext::request_state)
//! or the engine's command handling.

use hordefall_core::enums::{Phase, ScreenId};
use hordefall_core::error::Result;
use hordefall_runtime::{GameContext, GameState, PausableState, Progress};
use tracing::{debug, info};

use crate::systems::score::ScoreSystem;
use crate::systems::spawn::{self, SpawnDirector};
use crate::systems::ui::UiSystem;

/// Main menu. Shows its screen and waits for a start command.
pub struct MenuState;

impl GameState for MenuState {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn phase(&self) -> Phase {
        Phase::Menu
    }

    fn enter(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            ui.borrow_mut().show_screen(ScreenId::MainMenu);
        }
        Ok(Progress::Complete)
    }

    fn exit(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            ui.borrow_mut().hide_screen(ScreenId::MainMenu);
        }
        Ok(Progress::Complete)
    }
}

/// Active run. Entry is staged: the first poll resets progression and
/// clears leftovers, then each poll spawns one warm-up batch until the
/// opening pack is out, and only then does steady spawning start.
pub struct PlayingState {
    setup_done: bool,
    warmup_attempted: usize,
    paused: bool,
}

impl PlayingState {
    pub fn new() -> Self {
        Self {
            setup_done: false,
            warmup_attempted: 0,
            paused: false,
        }
    }
}

impl Default for PlayingState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for PlayingState {
    fn name(&self) -> &'static str {
        "playing"
    }

    fn phase(&self) -> Phase {
        Phase::Playing
    }

    fn enter(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if !self.setup_done {
            if let Some(score) = ctx.registry.get::<ScoreSystem>() {
                score.borrow_mut().reset_for_restart();
            }
            let cleared = spawn::despawn_all_enemies(&mut ctx.world);
            if cleared > 0 {
                debug!(cleared, "cleared leftover enemies before run start");
            }
            if let Some(ui) = ctx.registry.get::<UiSystem>() {
                ui.borrow_mut().show_screen(ScreenId::Hud);
            }
            self.setup_done = true;
        }

        // One warm-up batch per poll keeps entry work off any single frame.
        let Some(director) = ctx.registry.get::<SpawnDirector>() else {
            info!("no spawn director; run starts empty");
            return Ok(Progress::Complete);
        };
        let target = ctx.config.warmup_spawn_count;
        let batch = ctx.config.warmup_batch_size.max(1);
        let mut done_this_poll = 0;
        while self.warmup_attempted < target && done_this_poll < batch {
            director.borrow_mut().spawn_now(ctx);
            self.warmup_attempted += 1;
            done_this_poll += 1;
        }
        if self.warmup_attempted < target {
            return Ok(Progress::Pending);
        }

        director.borrow_mut().start_spawning();
        info!(warmup = target, "run started");
        Ok(Progress::Complete)
    }

    fn exit(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if let Some(director) = ctx.registry.get::<SpawnDirector>() {
            director.borrow_mut().stop_spawning();
        }
        let removed = spawn::despawn_all_enemies(&mut ctx.world);
        debug!(removed, "run torn down");
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            ui.borrow_mut().hide_screen(ScreenId::Hud);
        }
        Ok(Progress::Complete)
    }

    fn as_pausable(&mut self) -> Option<&mut dyn PausableState> {
        Some(self)
    }
}

impl PausableState for PlayingState {
    fn pause(&mut self, ctx: &mut GameContext) {
        let frozen = spawn::freeze_enemies(&mut ctx.world);
        self.paused = true;
        debug!(frozen, "playing state paused");
    }

    fn resume(&mut self, ctx: &mut GameContext) {
        let woken = spawn::wake_enemies(&mut ctx.world);
        self.paused = false;
        debug!(woken, "playing state resumed");
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// End-of-run screen. Spawning stays off until another state starts it.
pub struct GameOverState;

impl GameState for GameOverState {
    fn name(&self) -> &'static str {
        "game_over"
    }

    fn phase(&self) -> Phase {
        Phase::GameOver
    }

    fn enter(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if let Some(director) = ctx.registry.get::<SpawnDirector>() {
            director.borrow_mut().stop_spawning();
        }
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            ui.borrow_mut().show_screen(ScreenId::GameOver);
        }
        Ok(Progress::Complete)
    }

    fn exit(&mut self, ctx: &mut GameContext) -> Result<Progress> {
        if let Some(ui) = ctx.registry.get::<UiSystem>() {
            ui.borrow_mut().hide_screen(ScreenId::GameOver);
        }
        Ok(Progress::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hordefall_core::config::{default_enemy_roster, RuntimeConfig};
    use hordefall_runtime::GameSystem;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::systems::enemy_db::EnemyDatabase;
    use crate::systems::spawn::live_enemy_count;

    fn ctx_with_systems() -> GameContext {
        let mut ctx = GameContext::new(RuntimeConfig::fast());
        let mut database = EnemyDatabase::new(default_enemy_roster());
        database.initialize(&mut ctx).unwrap();
        ctx.registry.insert(Rc::new(RefCell::new(database)));
        ctx.registry.insert(Rc::new(RefCell::new(UiSystem::new())));
        ctx.registry
            .insert(Rc::new(RefCell::new(SpawnDirector::new())));
        ctx.registry.insert(Rc::new(RefCell::new(ScoreSystem::new())));
        ctx
    }

    #[test]
    fn test_playing_entry_is_staged_over_polls() {
        let mut ctx = ctx_with_systems();
        let mut state = PlayingState::new();
        // warmup 6, batch 3: two Pending-producing polls then Complete.
        assert!(matches!(state.enter(&mut ctx).unwrap(), Progress::Pending));
        assert_eq!(live_enemy_count(&ctx.world), 3);
        assert!(matches!(state.enter(&mut ctx).unwrap(), Progress::Complete));
        assert_eq!(live_enemy_count(&ctx.world), 6);

        let director = ctx.registry.get::<SpawnDirector>().unwrap();
        assert!(
            director.borrow().is_spawning(),
            "steady spawning starts only after warm-up completes"
        );
    }

    #[test]
    fn test_playing_entry_resets_progression() {
        let mut ctx = ctx_with_systems();
        let score = ctx.registry.get::<ScoreSystem>().unwrap();
        score.borrow_mut().add_experience(&mut ctx, 500);

        let mut state = PlayingState::new();
        let _ = state.enter(&mut ctx).unwrap();
        assert_eq!(score.borrow().level(), 1);
        assert_eq!(score.borrow().score(), 0);
    }

    #[test]
    fn test_playing_exit_clears_enemies_and_hud() {
        let mut ctx = ctx_with_systems();
        let mut state = PlayingState::new();
        while matches!(state.enter(&mut ctx).unwrap(), Progress::Pending) {}
        assert!(live_enemy_count(&ctx.world) > 0);

        assert!(matches!(state.exit(&mut ctx).unwrap(), Progress::Complete));
        assert_eq!(live_enemy_count(&ctx.world), 0);
        let ui = ctx.registry.get::<UiSystem>().unwrap();
        assert!(!ui.borrow().is_screen_active(ScreenId::Hud));
        let director = ctx.registry.get::<SpawnDirector>().unwrap();
        assert!(!director.borrow().is_spawning());
    }

    #[test]
    fn test_pause_freezes_and_resume_wakes() {
        let mut ctx = ctx_with_systems();
        let mut state = PlayingState::new();
        while matches!(state.enter(&mut ctx).unwrap(), Progress::Pending) {}

        state.pause(&mut ctx);
        assert!(state.is_paused());
        let frozen = ctx
            .world
            .query::<(&hordefall_core::components::Enemy, &hordefall_core::components::Frozen)>()
            .iter()
            .count();
        assert_eq!(frozen, 6, "every live enemy freezes on pause");

        state.resume(&mut ctx);
        assert!(!state.is_paused());
        let still_frozen = ctx
            .world
            .query::<(&hordefall_core::components::Enemy, &hordefall_core::components::Frozen)>()
            .iter()
            .count();
        assert_eq!(still_frozen, 0);
    }

    #[test]
    fn test_menu_and_game_over_toggle_screens() {
        let mut ctx = ctx_with_systems();
        let ui = ctx.registry.get::<UiSystem>().unwrap();

        let mut menu = MenuState;
        menu.enter(&mut ctx).unwrap();
        assert!(ui.borrow().is_screen_active(ScreenId::MainMenu));
        menu.exit(&mut ctx).unwrap();
        assert!(!ui.borrow().is_screen_active(ScreenId::MainMenu));

        let mut over = GameOverState;
        over.enter(&mut ctx).unwrap();
        assert!(ui.borrow().is_screen_active(ScreenId::GameOver));
        over.exit(&mut ctx).unwrap();
        assert!(!ui.borrow().is_screen_active(ScreenId::GameOver));
    }
}
