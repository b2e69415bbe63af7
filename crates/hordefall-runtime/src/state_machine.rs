//! Top-level game state machine with a polled enter/exit protocol.
//!
//! States suspend by returning `Progress::Pending` from `enter` or `exit`;
//! the machine polls them once per tick until they complete. Exactly one
//! transition can be in flight; further `change_state` calls while
//! transitioning are dropped.

use tracing::{debug, error, info};

use hordefall_core::enums::Phase;
use hordefall_core::error::Result;

use crate::context::GameContext;

/// Completion signal for a polled suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Still working; poll again next tick.
    Pending,
    /// Done.
    Complete,
}

/// A top-level game state (menu, playing, game over).
///
/// `enter` and `exit` are polled once per tick until they report
/// `Complete`, so multi-frame setup (staged world warm-up, teardown) is
/// expressed by returning `Pending` until finished.
pub trait GameState {
    fn name(&self) -> &'static str;

    /// Phase tag reported in snapshots while this state is current.
    fn phase(&self) -> Phase;

    fn enter(&mut self, ctx: &mut GameContext) -> Result<Progress>;

    fn exit(&mut self, ctx: &mut GameContext) -> Result<Progress>;

    /// Steady-state per-tick update; suppressed while transitioning.
    fn update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
        Ok(())
    }

    /// Pause capability, if this state has one.
    fn as_pausable(&mut self) -> Option<&mut dyn PausableState> {
        None
    }
}

/// Pause/resume capability for states that participate in the pause gate.
pub trait PausableState {
    fn pause(&mut self, ctx: &mut GameContext);
    fn resume(&mut self, ctx: &mut GameContext);
    fn is_paused(&self) -> bool;
}

enum Stage {
    Exiting,
    Entering,
}

struct Transition {
    /// The state being transitioned to. Taken when the swap happens.
    incoming: Option<Box<dyn GameState>>,
    stage: Stage,
}

/// Holds the single current state and drives transitions.
///
/// The machine lives in the registry for process lifetime; the scheduler
/// calls `update` every tick once it finds it there.
#[derive(Default)]
pub struct GameStateMachine {
    current: Option<Box<dyn GameState>>,
    transition: Option<Transition>,
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a transition to `next`.
    ///
    /// Dropped silently (debug log) when a transition is already in
    /// flight. When no state is current yet, the swap happens immediately
    /// and only `enter` is polled.
    pub fn change_state(&mut self, next: Box<dyn GameState>) {
        if self.transition.is_some() {
            debug!(requested = next.name(), "change_state while transitioning; dropped");
            return;
        }
        info!(state = next.name(), "state change requested");
        if self.current.is_some() {
            self.transition = Some(Transition {
                incoming: Some(next),
                stage: Stage::Exiting,
            });
        } else {
            self.current = Some(next);
            self.transition = Some(Transition {
                incoming: None,
                stage: Stage::Entering,
            });
        }
    }

    /// Drive the in-flight transition, or delegate to the current state.
    ///
    /// The transition is taken out of `self` at the top; every path that
    /// does not put it back leaves the machine not-transitioning, so a
    /// failing enter or exit can never wedge it.
    pub fn update(&mut self, ctx: &mut GameContext, dt: f64) {
        if let Some(mut transition) = self.transition.take() {
            match transition.stage {
                Stage::Exiting => {
                    let Some(current) = self.current.as_mut() else {
                        // Current vanished before exit ran; swap and enter.
                        self.current = transition.incoming.take();
                        transition.stage = Stage::Entering;
                        self.poll_enter(ctx, transition);
                        return;
                    };
                    match current.exit(ctx) {
                        Ok(Progress::Pending) => self.transition = Some(transition),
                        Ok(Progress::Complete) => {
                            debug!(state = current.name(), "state exited");
                            self.current = transition.incoming.take();
                            transition.stage = Stage::Entering;
                            // Poll enter in the same tick so trivial
                            // transitions complete in one update.
                            self.poll_enter(ctx, transition);
                        }
                        Err(err) => {
                            // Exit failure abandons the transition: the
                            // current state is not swapped.
                            error!(
                                state = current.name(),
                                error = %err,
                                "state exit failed; transition abandoned"
                            );
                        }
                    }
                }
                Stage::Entering => self.poll_enter(ctx, transition),
            }
            return;
        }

        let Some(current) = self.current.as_mut() else {
            return;
        };
        if let Err(err) = current.update(ctx, dt) {
            error!(state = current.name(), error = %err, "state update failed");
        }
    }

    fn poll_enter(&mut self, ctx: &mut GameContext, transition: Transition) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        match current.enter(ctx) {
            Ok(Progress::Pending) => self.transition = Some(transition),
            Ok(Progress::Complete) => {
                info!(state = current.name(), "state entered");
            }
            Err(err) => {
                // Enter failure keeps the swap in place; the machine
                // carries on with the new state.
                error!(state = current.name(), error = %err, "state enter failed");
            }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn has_state(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|state| state.name())
    }

    /// Phase tag for snapshots; `Boot` until a first state exists.
    pub fn current_phase(&self) -> Phase {
        self.current
            .as_ref()
            .map(|state| state.phase())
            .unwrap_or(Phase::Boot)
    }

    /// Pause the current state if it is pausable.
    pub fn pause_current(&mut self, ctx: &mut GameContext) {
        if let Some(state) = self.current.as_mut() {
            if let Some(pausable) = state.as_pausable() {
                pausable.pause(ctx);
            }
        }
    }

    /// Resume the current state if it is pausable.
    pub fn resume_current(&mut self, ctx: &mut GameContext) {
        if let Some(state) = self.current.as_mut() {
            if let Some(pausable) = state.as_pausable() {
                pausable.resume(ctx);
            }
        }
    }

    /// Whether the current state reports itself paused.
    pub fn current_paused(&mut self) -> bool {
        self.current
            .as_mut()
            .and_then(|state| state.as_pausable())
            .map(|pausable| pausable.is_paused())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use hordefall_core::config::RuntimeConfig;
    use hordefall_core::error::GameError;

    /// Test state with configurable enter/exit latency and failure.
    struct ProbeState {
        name: &'static str,
        enter_pending_ticks: u32,
        exit_pending_ticks: u32,
        fail_enter: bool,
        fail_exit: bool,
        updates: Rc<Cell<u32>>,
    }

    impl ProbeState {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                enter_pending_ticks: 0,
                exit_pending_ticks: 0,
                fail_enter: false,
                fail_exit: false,
                updates: Rc::new(Cell::new(0)),
            }
        }

        fn with_update_counter(mut self, counter: Rc<Cell<u32>>) -> Self {
            self.updates = counter;
            self
        }

        fn slow_enter(mut self, ticks: u32) -> Self {
            self.enter_pending_ticks = ticks;
            self
        }

        fn slow_exit(mut self, ticks: u32) -> Self {
            self.exit_pending_ticks = ticks;
            self
        }

        fn failing_enter(mut self) -> Self {
            self.fail_enter = true;
            self
        }

        fn failing_exit(mut self) -> Self {
            self.fail_exit = true;
            self
        }
    }

    impl GameState for ProbeState {
        fn name(&self) -> &'static str {
            self.name
        }

        fn phase(&self) -> Phase {
            Phase::Playing
        }

        fn enter(&mut self, _ctx: &mut GameContext) -> Result<Progress> {
            if self.fail_enter {
                return Err(GameError::SystemInit {
                    system: self.name.to_string(),
                    reason: "enter failure".to_string(),
                });
            }
            if self.enter_pending_ticks > 0 {
                self.enter_pending_ticks -= 1;
                return Ok(Progress::Pending);
            }
            Ok(Progress::Complete)
        }

        fn exit(&mut self, _ctx: &mut GameContext) -> Result<Progress> {
            if self.fail_exit {
                return Err(GameError::SystemInit {
                    system: self.name.to_string(),
                    reason: "exit failure".to_string(),
                });
            }
            if self.exit_pending_ticks > 0 {
                self.exit_pending_ticks -= 1;
                return Ok(Progress::Pending);
            }
            Ok(Progress::Complete)
        }

        fn update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
            self.updates.set(self.updates.get() + 1);
            Ok(())
        }
    }

    fn ctx() -> GameContext {
        GameContext::new(RuntimeConfig::fast())
    }

    #[test]
    fn test_first_change_state_enters_without_exit() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        assert!(!machine.has_state());
        assert_eq!(machine.current_phase(), Phase::Boot);

        machine.change_state(Box::new(ProbeState::new("first")));
        assert!(machine.is_transitioning());

        machine.update(&mut ctx, 0.016);
        assert!(!machine.is_transitioning());
        assert_eq!(machine.current_name(), Some("first"));
        assert_eq!(machine.current_phase(), Phase::Playing);
    }

    #[test]
    fn test_second_change_state_while_transitioning_is_dropped() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        machine.change_state(Box::new(ProbeState::new("a")));
        machine.update(&mut ctx, 0.016);

        // "b" exits "a" then enters over several ticks; the request for
        // "c" arrives while that transition is still in flight.
        machine.change_state(Box::new(ProbeState::new("b").slow_enter(3)));
        machine.update(&mut ctx, 0.016);
        assert!(machine.is_transitioning());

        machine.change_state(Box::new(ProbeState::new("c")));

        for _ in 0..5 {
            machine.update(&mut ctx, 0.016);
        }
        assert!(!machine.is_transitioning());
        assert_eq!(
            machine.current_name(),
            Some("b"),
            "exactly one transition should have executed; the second request is a no-op"
        );
    }

    #[test]
    fn test_update_suppressed_while_transitioning() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        let updates = Rc::new(Cell::new(0));
        machine.change_state(Box::new(
            ProbeState::new("slow")
                .slow_enter(2)
                .with_update_counter(Rc::clone(&updates)),
        ));

        // Three polls: two pending, one complete. No steady-state updates.
        machine.update(&mut ctx, 0.016);
        machine.update(&mut ctx, 0.016);
        machine.update(&mut ctx, 0.016);
        assert!(!machine.is_transitioning());
        assert_eq!(updates.get(), 0, "update must be suppressed while transitioning");

        machine.update(&mut ctx, 0.016);
        machine.update(&mut ctx, 0.016);
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn test_exit_failure_abandons_transition_without_swap() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        machine.change_state(Box::new(ProbeState::new("sticky").failing_exit()));
        machine.update(&mut ctx, 0.016);
        assert_eq!(machine.current_name(), Some("sticky"));

        machine.change_state(Box::new(ProbeState::new("next")));
        machine.update(&mut ctx, 0.016);

        assert!(!machine.is_transitioning(), "flag must clear on failure");
        assert_eq!(
            machine.current_name(),
            Some("sticky"),
            "exit failure must not swap the current state"
        );

        // The machine is not wedged: it accepts a new request afterwards.
        machine.change_state(Box::new(ProbeState::new("again")));
        assert!(machine.is_transitioning());
        machine.update(&mut ctx, 0.016);
        assert!(!machine.is_transitioning());
    }

    #[test]
    fn test_enter_failure_keeps_swap_and_clears_flag() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        machine.change_state(Box::new(ProbeState::new("ok")));
        machine.update(&mut ctx, 0.016);

        machine.change_state(Box::new(ProbeState::new("broken").failing_enter()));
        machine.update(&mut ctx, 0.016);

        assert!(!machine.is_transitioning(), "flag must clear on failure");
        assert_eq!(
            machine.current_name(),
            Some("broken"),
            "enter failure leaves the swap in place"
        );
    }

    #[test]
    fn test_slow_exit_then_enter_completes_over_ticks() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        machine.change_state(Box::new(ProbeState::new("a").slow_exit(2)));
        machine.update(&mut ctx, 0.016);

        machine.change_state(Box::new(ProbeState::new("b").slow_enter(2)));
        // Exit pending x2, exit complete + first enter poll, enter pending,
        // enter complete.
        let mut ticks = 0;
        while machine.is_transitioning() && ticks < 10 {
            machine.update(&mut ctx, 0.016);
            ticks += 1;
        }
        assert_eq!(machine.current_name(), Some("b"));
        assert!(ticks >= 3, "multi-tick suspension should take several polls, took {ticks}");
    }

    #[test]
    fn test_update_with_no_state_is_noop() {
        let mut ctx = ctx();
        let mut machine = GameStateMachine::new();
        machine.update(&mut ctx, 0.016);
        assert!(!machine.has_state());
    }
}
