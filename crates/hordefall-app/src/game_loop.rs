//! Game loop thread — runs the engine at the tick rate and publishes
//! snapshots.
//!
//! The engine is created inside the thread; it is single-threaded by design
//! and never crosses the boundary. Commands arrive over an `mpsc` channel
//! and the latest snapshot is stored in shared state for synchronous reads.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::info;

use hordefall_core::config::RuntimeConfig;
use hordefall_core::constants::TICK_RATE;
use hordefall_sim::GameEngine;

use crate::state::{LoopCommand, SharedSnapshot};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle for a clean join on
/// shutdown.
pub fn spawn_game_loop(
    config: RuntimeConfig,
    latest_snapshot: SharedSnapshot,
) -> (mpsc::Sender<LoopCommand>, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("hordefall-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot);
        })
        .expect("failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until a Shutdown command or channel disconnect.
fn run_game_loop(
    config: RuntimeConfig,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<hordefall_core::state::RunSnapshot>>,
) {
    let mut engine = GameEngine::new(config);
    engine.start();
    let mut next_tick_time = Instant::now();
    info!("game loop running");

    loop {
        // 1. Drain all pending commands.
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Game(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) => {
                    info!("game loop shutting down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick. Time scaling happens inside the engine's
        //    clock, so the loop itself always runs at the nominal rate;
        //    a paused game keeps ticking to drive the unscaled resume timer.
        let snapshot = engine.tick();

        // 3. Publish for synchronous polling.
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick boundary.
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral.
            next_tick_time = now;
        }
    }
}
