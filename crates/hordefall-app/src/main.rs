//! Headless scripted session: boots the loop thread, plays through a short
//! run (kills, a level-up, an upgrade pick, a restart), and shuts down.

use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hordefall_app::game_loop::spawn_game_loop;
use hordefall_app::state::{shared_snapshot, LoopCommand, SharedSnapshot};
use hordefall_core::commands::GameCommand;
use hordefall_core::config::RuntimeConfig;
use hordefall_core::enums::Phase;
use hordefall_core::state::RunSnapshot;

fn main() {
    init_tracing();

    let shared = shared_snapshot();
    let (tx, handle) = spawn_game_loop(RuntimeConfig::default(), shared.clone());

    if !wait_for_phase(&shared, Phase::Menu, Duration::from_secs(5)) {
        warn!("menu never settled; aborting session");
        let _ = tx.send(LoopCommand::Shutdown);
        let _ = handle.join();
        return;
    }

    let _ = tx.send(LoopCommand::Game(GameCommand::StartRun));
    if !wait_for_phase(&shared, Phase::Playing, Duration::from_secs(10)) {
        warn!("run never started; aborting session");
        let _ = tx.send(LoopCommand::Shutdown);
        let _ = handle.join();
        return;
    }
    log_summary("run started", &shared);

    // Report a few kills against the tier-one roster; the warm-up pack is
    // all tier one, so these ids are usually live. The awarded experience
    // pushes toward a level-up.
    for enemy_id in ["shambler", "walker", "shambler", "walker"] {
        let _ = tx.send(LoopCommand::Game(GameCommand::ReportKill {
            enemy_id: enemy_id.to_string(),
        }));
        std::thread::sleep(Duration::from_millis(100));
    }
    let _ = tx.send(LoopCommand::Game(GameCommand::GrantExperience { amount: 120 }));

    // The level-up pauses the game behind the upgrade prompt.
    if wait_for(&shared, Duration::from_secs(5), |s| s.pause.paused) {
        log_summary("paused for upgrade", &shared);
        let _ = tx.send(LoopCommand::Game(GameCommand::SelectUpgrade { index: 0 }));
        if wait_for(&shared, Duration::from_secs(5), |s| !s.pause.paused) {
            log_summary("resumed", &shared);
        }
    } else {
        warn!("upgrade prompt never appeared");
    }

    std::thread::sleep(Duration::from_secs(2));
    log_summary("mid-run", &shared);

    let _ = tx.send(LoopCommand::Game(GameCommand::EndRun));
    if wait_for_phase(&shared, Phase::GameOver, Duration::from_secs(5)) {
        log_summary("run over", &shared);
    }

    // Rebuild the system roster in place: progression and wave state reset
    // while the state machine carries on in the current phase.
    let _ = tx.send(LoopCommand::Game(GameCommand::RestartSystems));
    if wait_for(&shared, Duration::from_secs(5), |s| s.progression.score == 0) {
        log_summary("systems restarted", &shared);
    }

    let _ = tx.send(LoopCommand::Game(GameCommand::ReturnToMenu));
    if wait_for_phase(&shared, Phase::Menu, Duration::from_secs(5)) {
        log_summary("back at menu", &shared);
    }

    let _ = tx.send(LoopCommand::Shutdown);
    if handle.join().is_err() {
        warn!("game loop thread panicked");
    }
    info!("session complete");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hordefall=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Polls the shared snapshot until the predicate holds or time runs out.
fn wait_for(
    shared: &SharedSnapshot,
    timeout: Duration,
    predicate: impl Fn(&RunSnapshot) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(lock) = shared.lock() {
            if let Some(snapshot) = lock.as_ref() {
                if predicate(snapshot) {
                    return true;
                }
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

fn wait_for_phase(shared: &SharedSnapshot, phase: Phase, timeout: Duration) -> bool {
    wait_for(shared, timeout, |snapshot| {
        snapshot.phase == phase && !snapshot.transitioning
    })
}

fn log_summary(label: &str, shared: &SharedSnapshot) {
    if let Ok(lock) = shared.lock() {
        if let Some(snapshot) = lock.as_ref() {
            info!(
                label,
                phase = ?snapshot.phase,
                score = snapshot.progression.score,
                level = snapshot.progression.level,
                wave = snapshot.wave.wave_number,
                live = snapshot.wave.live_enemies,
                spawned = snapshot.wave.total_spawned,
                "snapshot"
            );
        }
    }
}
