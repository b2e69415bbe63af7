//! Snapshot assembly.

use hordefall_core::enums::Phase;
use hordefall_core::state::{PauseView, RunSnapshot, WaveView};
use hordefall_runtime::{GameContext, GameStateMachine};

use crate::systems::pause::PauseCoordinator;
use crate::systems::score::ScoreSystem;
use crate::systems::spawn::{self, SpawnDirector};

/// Collects the visible state of the tick that just ran. Drains the event
/// queue; each event appears in exactly one snapshot.
pub fn build_snapshot(ctx: &mut GameContext) -> RunSnapshot {
    let (phase, transitioning) = match ctx.registry.get::<GameStateMachine>() {
        Some(machine) => {
            let machine = machine.borrow();
            (machine.current_phase(), machine.is_transitioning())
        }
        None => (Phase::Boot, false),
    };

    let progression = ctx
        .registry
        .get::<ScoreSystem>()
        .map(|score| score.borrow().view())
        .unwrap_or_default();

    let pause = ctx
        .registry
        .get::<PauseCoordinator>()
        .map(|coordinator| {
            let coordinator = coordinator.borrow();
            PauseView {
                paused: coordinator.is_paused(),
                offers: coordinator.offers().to_vec(),
                resume_pending: coordinator.resume_pending(),
            }
        })
        .unwrap_or_default();

    let wave = ctx
        .registry
        .get::<SpawnDirector>()
        .map(|director| {
            let director = director.borrow();
            WaveView {
                wave_number: director.wave_number(),
                live_enemies: spawn::live_enemy_count(&ctx.world),
                total_spawned: director.total_spawned(),
                spawning: director.is_spawning(),
            }
        })
        .unwrap_or_default();

    RunSnapshot {
        time: ctx.time,
        phase,
        transitioning,
        time_scale: ctx.time_scale,
        progression,
        pause,
        wave,
        events: ctx.drain_events(),
    }
}
