//! The game engine: command intake, tick orchestration, snapshot output.
//!
//! Single-threaded and deterministic for a given seed and command script.
//! Each tick: queued commands, then time, then the scheduler (systems, fixed
//! step, state machine), then a snapshot of what the tick produced.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, info, warn};

use hordefall_core::commands::GameCommand;
use hordefall_core::config::{
    default_enemy_roster, default_upgrade_pool, EnemyConfig, RuntimeConfig, UpgradeConfig,
};
use hordefall_core::constants::DT;
use hordefall_core::state::RunSnapshot;
use hordefall_runtime::{GameContext, GameStateMachine, SystemScheduler};

use crate::snapshot;
use crate::states::{GameOverState, MenuState, PlayingState};
use crate::systems::pause::PauseCoordinator;
use crate::systems::score::ScoreSystem;
use crate::systems::spawn::SpawnDirector;
use crate::systems::{self, EnemyDatabase};

pub struct GameEngine {
    ctx: GameContext,
    scheduler: SystemScheduler,
    command_queue: VecDeque<GameCommand>,
    started: bool,
}

impl GameEngine {
    /// Engine over the default content set.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_content(config, default_enemy_roster(), default_upgrade_pool())
    }

    /// Engine over a custom enemy roster and upgrade pool.
    pub fn with_content(
        config: RuntimeConfig,
        roster: Vec<EnemyConfig>,
        pool: Vec<UpgradeConfig>,
    ) -> Self {
        let ctx = GameContext::new(config);
        let scheduler = SystemScheduler::new(systems::default_system_factory(roster, pool));
        Self {
            ctx,
            scheduler,
            command_queue: VecDeque::new(),
            started: false,
        }
    }

    /// Boots the engine: initializes the system set, then registers the
    /// state machine and enters the menu. The scheduler polls for the
    /// machine, so registration order is load-bearing only in that ticks
    /// before registration do nothing.
    pub fn start(&mut self) {
        if self.started {
            warn!("engine start called twice; ignored");
            return;
        }
        self.scheduler.initialize_all(&mut self.ctx);

        let machine = Rc::new(RefCell::new(GameStateMachine::new()));
        machine.borrow_mut().change_state(Box::new(MenuState));
        self.ctx.registry.insert(machine);
        self.started = true;
        info!("engine started");
    }

    pub fn queue_command(&mut self, command: GameCommand) {
        self.command_queue.push_back(command);
    }

    /// Advances the simulation one frame and returns its snapshot.
    pub fn tick(&mut self) -> RunSnapshot {
        self.process_commands();
        self.ctx.time.advance(DT, self.ctx.time_scale);
        self.scheduler.tick(&mut self.ctx);
        snapshot::build_snapshot(&mut self.ctx)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::StartRun => {
                self.force_resume_if_paused();
                self.change_state(Box::new(PlayingState::new()));
            }
            GameCommand::EndRun => {
                self.force_resume_if_paused();
                self.change_state(Box::new(GameOverState));
            }
            GameCommand::ReturnToMenu => {
                self.force_resume_if_paused();
                self.change_state(Box::new(MenuState));
            }
            GameCommand::RestartSystems => {
                self.scheduler.restart_all(&mut self.ctx);
            }
            GameCommand::ReportKill { enemy_id } => self.handle_kill(&enemy_id),
            GameCommand::SelectUpgrade { index } => {
                let Some(coordinator) = self.ctx.registry.get::<PauseCoordinator>() else {
                    warn!("select upgrade with no pause coordinator; ignored");
                    return;
                };
                coordinator
                    .borrow_mut()
                    .on_upgrade_selected(&mut self.ctx, index);
            }
            GameCommand::SetTimeScale { scale } => {
                let paused = self
                    .ctx
                    .registry
                    .get::<PauseCoordinator>()
                    .map(|c| c.borrow().is_paused())
                    .unwrap_or(false);
                if paused {
                    warn!(scale, "time scale change rejected while paused");
                    return;
                }
                self.ctx.time_scale = scale.clamp(0.0, 4.0);
                debug!(scale = self.ctx.time_scale, "time scale set");
            }
            GameCommand::GrantExperience { amount } => {
                if let Some(score) = self.ctx.registry.get::<ScoreSystem>() {
                    score.borrow_mut().add_experience(&mut self.ctx, amount);
                }
            }
            GameCommand::GrantScore { points } => {
                if let Some(score) = self.ctx.registry.get::<ScoreSystem>() {
                    score.borrow_mut().add_score(&mut self.ctx, points);
                }
            }
        }
    }

    /// A confirmed kill: remove one matching live enemy and award its
    /// difficulty value as experience (rounded to whole points).
    fn handle_kill(&mut self, enemy_id: &str) {
        let Some(database) = self.ctx.registry.get::<EnemyDatabase>() else {
            warn!(enemy_id, "kill reported with no enemy database; ignored");
            return;
        };
        let Some(config) = database.borrow_mut().by_id(enemy_id) else {
            warn!(enemy_id, "kill reported for unknown enemy; ignored");
            return;
        };

        if let Some(director) = self.ctx.registry.get::<SpawnDirector>() {
            if !director.borrow_mut().despawn_one(&mut self.ctx, enemy_id) {
                debug!(enemy_id, "kill reported with no live instance");
            }
        }

        let experience = config.difficulty_value.round() as u64;
        if let Some(score) = self.ctx.registry.get::<ScoreSystem>() {
            score.borrow_mut().add_experience(&mut self.ctx, experience);
        }
    }

    fn change_state(&mut self, state: Box<dyn hordefall_runtime::GameState>) {
        let Some(machine) = self.ctx.registry.get::<GameStateMachine>() else {
            warn!("state change requested before engine start; ignored");
            return;
        };
        machine.borrow_mut().change_state(state);
    }

    fn force_resume_if_paused(&mut self) {
        let Some(coordinator) = self.ctx.registry.get::<PauseCoordinator>() else {
            return;
        };
        let paused = coordinator.borrow().is_paused();
        if paused {
            warn!("leaving paused gameplay; forcing resume");
            coordinator.borrow_mut().resume_game(&mut self.ctx);
        }
    }

    #[cfg(test)]
    pub(crate) fn context(&self) -> &GameContext {
        &self.ctx
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &SystemScheduler {
        &self.scheduler
    }
}
