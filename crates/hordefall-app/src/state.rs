//! State shared between the host and the game loop thread.

use std::sync::{Arc, Mutex};

use hordefall_core::commands::GameCommand;
use hordefall_core::state::RunSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A game command to forward to the engine.
    Game(GameCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop thread after each tick and
/// read synchronously by the host.
pub type SharedSnapshot = Arc<Mutex<Option<RunSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}
