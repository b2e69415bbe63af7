//! Gameplay systems and the default system set.
//!
//! Initialization order is the only ordering the scheduler honors, so the
//! constants below define the boot sequence: content databases first, then
//! presentation and input, then the systems that depend on all of them.

pub mod enemy_db;
pub mod input;
pub mod pause;
pub mod score;
pub mod spawn;
pub mod ui;
pub mod upgrades;

pub use enemy_db::EnemyDatabase;
pub use input::InputRouter;
pub use pause::PauseCoordinator;
pub use score::ScoreSystem;
pub use spawn::SpawnDirector;
pub use ui::{UiController, UiSystem, UpgradeSelectionController};
pub use upgrades::UpgradeSystem;

use hordefall_core::config::{EnemyConfig, RuntimeConfig, UpgradeConfig};
use hordefall_runtime::scheduler::SystemFactory;
use hordefall_runtime::{Capabilities, InstalledSystem};

// --- Initialization order ---

pub const ORDER_ENEMY_DATABASE: i32 = 10;
pub const ORDER_UPGRADE_SYSTEM: i32 = 20;
pub const ORDER_UI_SYSTEM: i32 = 30;
pub const ORDER_INPUT_ROUTER: i32 = 40;
pub const ORDER_SCORE_SYSTEM: i32 = 50;
pub const ORDER_SPAWN_DIRECTOR: i32 = 60;
pub const ORDER_PAUSE_COORDINATOR: i32 = 70;

/// Factory for the full gameplay system set over the given content.
///
/// The scheduler calls this on every initialization pass, including
/// restarts, so each pass starts from fresh system state.
pub fn default_system_factory(
    roster: Vec<EnemyConfig>,
    pool: Vec<UpgradeConfig>,
) -> SystemFactory {
    Box::new(move |_config: &RuntimeConfig| {
        vec![
            InstalledSystem::new(
                ORDER_ENEMY_DATABASE,
                Capabilities::none().database_backed(),
                EnemyDatabase::new(roster.clone()),
            ),
            InstalledSystem::new(
                ORDER_UPGRADE_SYSTEM,
                Capabilities::none().database_backed(),
                UpgradeSystem::new(pool.clone()),
            ),
            InstalledSystem::new(ORDER_UI_SYSTEM, Capabilities::none(), UiSystem::new()),
            InstalledSystem::new(ORDER_INPUT_ROUTER, Capabilities::none(), InputRouter::new()),
            InstalledSystem::new(ORDER_SCORE_SYSTEM, Capabilities::none(), ScoreSystem::new()),
            InstalledSystem::new(
                ORDER_SPAWN_DIRECTOR,
                Capabilities::none().update().fixed_update(),
                SpawnDirector::new(),
            ),
            InstalledSystem::new(
                ORDER_PAUSE_COORDINATOR,
                Capabilities::none().update(),
                PauseCoordinator::new(),
            ),
        ]
    })
}
