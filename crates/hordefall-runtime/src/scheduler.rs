//! System lifecycle scheduler.
//!
//! Owns the fixed system set: constructs it from a factory, initializes it
//! in ascending order, drives per-tick and fixed-cadence updates plus the
//! state machine, and tears everything down for cleanup or restart. Every
//! per-system call is failure-isolated; an error in one system never stops
//! the others or the loop.

use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use hordefall_core::config::RuntimeConfig;

use crate::clock::FixedStep;
use crate::context::GameContext;
use crate::state_machine::GameStateMachine;
use crate::system::{InstalledSystem, SystemHandle};

/// Builds the fixed, hardcoded system set. Run again on every restart so
/// each initialization gets fresh instances.
pub type SystemFactory = Box<dyn Fn(&RuntimeConfig) -> Vec<InstalledSystem>>;

pub struct SystemScheduler {
    factory: SystemFactory,
    systems: Vec<InstalledSystem>,
    update_list: Vec<SystemHandle>,
    fixed_list: Vec<SystemHandle>,
    fixed_step: FixedStep,
    initialized: bool,
}

impl SystemScheduler {
    pub fn new(factory: SystemFactory) -> Self {
        Self {
            factory,
            systems: Vec::new(),
            update_list: Vec::new(),
            fixed_list: Vec::new(),
            fixed_step: FixedStep::new(),
            initialized: false,
        }
    }

    /// Construct the fixed system set and initialize it in order.
    ///
    /// Systems are stable-sorted ascending by order (ties keep factory
    /// order). Each system is initialized in sequence; database-backed
    /// systems then get a bounded readiness wait. Only systems that
    /// initialize successfully are registered and added to the update
    /// lists; a failure is logged and the remaining systems still run.
    pub fn initialize_all(&mut self, ctx: &mut GameContext) {
        if self.initialized {
            warn!("initialize_all called while already initialized; ignored");
            return;
        }
        info!("initializing systems");
        self.systems = (self.factory)(&ctx.config);
        self.systems.sort_by_key(|entry| entry.order);

        for index in 0..self.systems.len() {
            let name = self.systems[index].name;
            let caps = self.systems[index].caps;
            let handle = Rc::clone(&self.systems[index].handle);

            if let Err(err) = handle.borrow_mut().initialize(ctx) {
                error!(system = name, error = %err, "system failed to initialize");
                continue;
            }
            if caps.database_backed {
                wait_until_ready(&handle, name, &ctx.config);
            }

            (self.systems[index].register)(&mut ctx.registry);
            self.systems[index].initialized = true;
            if caps.updatable {
                self.update_list.push(Rc::clone(&handle));
            }
            if caps.fixed_updatable {
                self.fixed_list.push(Rc::clone(&handle));
            }
            debug!(system = name, order = self.systems[index].order, "system initialized");
        }

        self.initialized = true;
        info!(
            initialized = self.systems.iter().filter(|s| s.initialized).count(),
            total = self.systems.len(),
            "system initialization complete"
        );
    }

    /// One tick of the steady-state loop.
    ///
    /// A no-op until `initialize_all` has run, and until the game state
    /// machine shows up in the registry (polled once per tick, never
    /// faster than the frame). Then: updatable systems in list order,
    /// fixed-update catch-up, the state machine, and finally any state
    /// transition requests queued during the updates.
    pub fn tick(&mut self, ctx: &mut GameContext) {
        if !self.initialized {
            return;
        }
        let Some(machine) = ctx.registry.get::<GameStateMachine>() else {
            trace!("state machine not yet registered; waiting");
            return;
        };

        let dt = ctx.time.delta;
        for handle in &self.update_list {
            let mut system = handle.borrow_mut();
            if let Err(err) = system.update(ctx, dt) {
                error!(system = system.name(), error = %err, "system update failed");
            }
        }

        self.fixed_step.accumulate(dt);
        while self.fixed_step.should_step() {
            self.fixed_step.consume();
            for handle in &self.fixed_list {
                let mut system = handle.borrow_mut();
                if let Err(err) = system.fixed_update(ctx, self.fixed_step.timestep()) {
                    error!(system = system.name(), error = %err, "system fixed_update failed");
                }
            }
        }

        let mut machine = machine.borrow_mut();
        machine.update(ctx, dt);
        for requested in ctx.take_state_requests() {
            machine.change_state(requested);
        }
    }

    /// Tear down every system and clear all scheduler state.
    ///
    /// Cleanup is called on each constructed system (failure-isolated),
    /// the scheduler's registry entries are removed, the update lists and
    /// fixed-step backlog are cleared, and the context drops its transient
    /// state (events, queued transitions, live entities). The state
    /// machine's registration is not the scheduler's and survives.
    pub fn cleanup(&mut self, ctx: &mut GameContext) {
        info!("cleaning up systems");
        for entry in &self.systems {
            let mut system = entry.handle.borrow_mut();
            if let Err(err) = system.cleanup(ctx) {
                error!(system = system.name(), error = %err, "system cleanup failed");
            }
        }
        for entry in &self.systems {
            ctx.registry.remove_id(entry.type_id);
        }
        self.systems.clear();
        self.update_list.clear();
        self.fixed_list.clear();
        self.fixed_step.reset();
        ctx.clear_transient();
        self.initialized = false;
    }

    /// Cleanup, settle, and initialize again. Idempotent: repeated calls
    /// land in the same fully-initialized end state.
    pub fn restart_all(&mut self, ctx: &mut GameContext) {
        info!("restarting all systems");
        self.cleanup(ctx);
        let settle = ctx.config.restart_settle_secs;
        if settle > 0.0 {
            thread::sleep(Duration::from_secs_f64(settle));
        }
        self.initialize_all(ctx);
    }

    /// Add a system to the live set.
    ///
    /// Rejected (warning, no-op) before `initialize_all` and when a system
    /// of the same type is already installed. Dynamically added systems do
    /// not survive a restart; the factory rebuilds the fixed set.
    pub fn add_system(&mut self, ctx: &mut GameContext, entry: InstalledSystem) {
        if !self.initialized {
            warn!(system = entry.name, "add_system before initialize_all; dropped");
            return;
        }
        if self.systems.iter().any(|existing| existing.type_id == entry.type_id) {
            warn!(system = entry.name, "add_system for a type already installed; dropped");
            return;
        }

        let mut entry = entry;
        let handle = Rc::clone(&entry.handle);
        if let Err(err) = handle.borrow_mut().initialize(ctx) {
            error!(system = entry.name, error = %err, "added system failed to initialize");
            return;
        }
        if entry.caps.database_backed {
            wait_until_ready(&handle, entry.name, &ctx.config);
        }
        (entry.register)(&mut ctx.registry);
        entry.initialized = true;
        if entry.caps.updatable {
            self.update_list.push(Rc::clone(&handle));
        }
        if entry.caps.fixed_updatable {
            self.fixed_list.push(Rc::clone(&handle));
        }
        info!(system = entry.name, "system added");
        self.systems.push(entry);
    }

    /// Remove the system of type `T` from the live set.
    ///
    /// A warning no-op when no such system is installed. The removed
    /// system gets its cleanup call and loses its registry entry.
    pub fn remove_system<T: 'static>(&mut self, ctx: &mut GameContext) {
        let target = std::any::TypeId::of::<T>();
        let Some(position) = self.systems.iter().position(|entry| entry.type_id == target) else {
            warn!(
                system = std::any::type_name::<T>(),
                "remove_system for a type not installed; ignored"
            );
            return;
        };

        let entry = self.systems.remove(position);
        {
            let mut system = entry.handle.borrow_mut();
            if let Err(err) = system.cleanup(ctx) {
                error!(system = system.name(), error = %err, "system cleanup failed during removal");
            }
        }
        self.update_list.retain(|handle| !Rc::ptr_eq(handle, &entry.handle));
        self.fixed_list.retain(|handle| !Rc::ptr_eq(handle, &entry.handle));
        ctx.registry.remove_id(entry.type_id);
        info!(system = entry.name, "system removed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of installed systems (including any that failed to
    /// initialize this cycle).
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Names of the updatable systems in tick order.
    pub fn update_list_names(&self) -> Vec<&'static str> {
        self.update_list.iter().map(|handle| handle.borrow().name()).collect()
    }

    /// Initialization orders of the updatable systems in tick order.
    pub fn update_list_orders(&self) -> Vec<i32> {
        self.update_list
            .iter()
            .filter_map(|handle| {
                self.systems
                    .iter()
                    .find(|entry| Rc::ptr_eq(&entry.handle, handle))
                    .map(|entry| entry.order)
            })
            .collect()
    }

    /// Initialization orders of the fixed-updatable systems in tick order.
    pub fn fixed_list_orders(&self) -> Vec<i32> {
        self.fixed_list
            .iter()
            .filter_map(|handle| {
                self.systems
                    .iter()
                    .find(|entry| Rc::ptr_eq(&entry.handle, handle))
                    .map(|entry| entry.order)
            })
            .collect()
    }
}

/// Bounded poll for a database-backed system's readiness.
///
/// On timeout a warning is logged and initialization continues; a slow
/// database is degraded service, not a failure.
fn wait_until_ready(handle: &SystemHandle, name: &str, config: &RuntimeConfig) {
    let timeout = Duration::from_secs_f64(config.database_wait_timeout_secs);
    let poll = Duration::from_secs_f64(config.database_poll_interval_secs);
    let start = Instant::now();
    loop {
        if handle.borrow().ready() {
            return;
        }
        if start.elapsed() >= timeout {
            warn!(
                system = name,
                timeout_secs = config.database_wait_timeout_secs,
                "database load timed out; continuing"
            );
            return;
        }
        thread::sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use hordefall_core::enums::Phase;
    use hordefall_core::error::{GameError, Result};

    use crate::state_machine::{GameState, Progress};
    use crate::system::{Capabilities, GameSystem};

    /// Shared log of lifecycle calls, written by every probe system.
    type CallLog = Rc<RefCell<Vec<String>>>;

    struct ProbeSystem {
        name: &'static str,
        log: CallLog,
        fail_init: bool,
        fail_update: bool,
        ready: bool,
    }

    impl ProbeSystem {
        fn new(name: &'static str, log: CallLog) -> Self {
            Self {
                name,
                log,
                fail_init: false,
                fail_update: false,
                ready: true,
            }
        }

        fn failing_init(mut self) -> Self {
            self.fail_init = true;
            self
        }

        fn failing_update(mut self) -> Self {
            self.fail_update = true;
            self
        }

        fn never_ready(mut self) -> Self {
            self.ready = false;
            self
        }
    }

    impl GameSystem for ProbeSystem {
        fn name(&self) -> &'static str {
            self.name
        }

        fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
            self.log.borrow_mut().push(format!("init:{}", self.name));
            if self.fail_init {
                return Err(GameError::SystemInit {
                    system: self.name.to_string(),
                    reason: "probe failure".to_string(),
                });
            }
            Ok(())
        }

        fn update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
            self.log.borrow_mut().push(format!("update:{}", self.name));
            if self.fail_update {
                return Err(GameError::SystemInit {
                    system: self.name.to_string(),
                    reason: "update failure".to_string(),
                });
            }
            Ok(())
        }

        fn fixed_update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
            self.log.borrow_mut().push(format!("fixed:{}", self.name));
            Ok(())
        }

        fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
            self.log.borrow_mut().push(format!("cleanup:{}", self.name));
            Ok(())
        }

        fn ready(&self) -> bool {
            self.ready
        }
    }

    // Distinct wrapper types so each probe has its own TypeId in the
    // registry. Delegation keeps the log plumbing in one place.
    macro_rules! probe_wrapper {
        ($wrapper:ident) => {
            struct $wrapper(ProbeSystem);

            impl GameSystem for $wrapper {
                fn name(&self) -> &'static str {
                    self.0.name()
                }
                fn initialize(&mut self, ctx: &mut GameContext) -> Result<()> {
                    self.0.initialize(ctx)
                }
                fn update(&mut self, ctx: &mut GameContext, dt: f64) -> Result<()> {
                    self.0.update(ctx, dt)
                }
                fn fixed_update(&mut self, ctx: &mut GameContext, dt: f64) -> Result<()> {
                    self.0.fixed_update(ctx, dt)
                }
                fn cleanup(&mut self, ctx: &mut GameContext) -> Result<()> {
                    self.0.cleanup(ctx)
                }
                fn ready(&self) -> bool {
                    self.0.ready()
                }
            }
        };
    }

    probe_wrapper!(AlphaSystem);
    probe_wrapper!(BetaSystem);
    probe_wrapper!(GammaSystem);

    fn ctx() -> GameContext {
        GameContext::new(hordefall_core::config::RuntimeConfig::fast())
    }

    fn register_machine(ctx: &mut GameContext) {
        ctx.registry.insert(Rc::new(RefCell::new(GameStateMachine::new())));
    }

    fn advance(ctx: &mut GameContext, scheduler: &mut SystemScheduler) {
        ctx.time.advance(hordefall_core::constants::DT, ctx.time_scale);
        scheduler.tick(ctx);
    }

    /// Queues a transition to `ArrivalState` from inside its first update.
    struct HandoffSystem {
        requested: bool,
    }

    impl GameSystem for HandoffSystem {
        fn name(&self) -> &'static str {
            "handoff"
        }

        fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, ctx: &mut GameContext, _dt: f64) -> Result<()> {
            if !self.requested {
                self.requested = true;
                ctx.request_state(Box::new(ArrivalState));
            }
            Ok(())
        }

        fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
            Ok(())
        }
    }

    struct ArrivalState;

    impl GameState for ArrivalState {
        fn name(&self) -> &'static str {
            "arrival"
        }

        fn phase(&self) -> Phase {
            Phase::Playing
        }

        fn enter(&mut self, _ctx: &mut GameContext) -> Result<Progress> {
            Ok(Progress::Complete)
        }

        fn exit(&mut self, _ctx: &mut GameContext) -> Result<Progress> {
            Ok(Progress::Complete)
        }
    }

    #[test]
    fn test_initialization_sorts_by_order() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![
                // Installed out of order on purpose.
                InstalledSystem::new(
                    30,
                    Capabilities::none().update(),
                    GammaSystem(ProbeSystem::new("gamma", Rc::clone(&factory_log))),
                ),
                InstalledSystem::new(
                    10,
                    Capabilities::none().update(),
                    AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
                ),
                InstalledSystem::new(
                    20,
                    Capabilities::none().update(),
                    BetaSystem(ProbeSystem::new("beta", Rc::clone(&factory_log))),
                ),
            ]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);

        assert_eq!(
            log.borrow().as_slice(),
            &["init:alpha".to_string(), "init:beta".to_string(), "init:gamma".to_string()],
            "initialization must run in ascending order"
        );

        // Update list order is non-decreasing by initialization order.
        let orders = scheduler.update_list_orders();
        assert!(
            orders.windows(2).all(|pair| pair[0] <= pair[1]),
            "update list must be sorted by order, got {orders:?}"
        );
        assert_eq!(orders, vec![10, 20, 30]);
    }

    #[test]
    fn test_init_failure_skips_registration_but_not_others() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![
                InstalledSystem::new(
                    10,
                    Capabilities::none().update(),
                    AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log)).failing_init()),
                ),
                InstalledSystem::new(
                    20,
                    Capabilities::none().update(),
                    BetaSystem(ProbeSystem::new("beta", Rc::clone(&factory_log))),
                ),
            ]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);

        assert!(ctx.registry.get::<AlphaSystem>().is_none(), "failed system must not register");
        assert!(ctx.registry.get::<BetaSystem>().is_some(), "later systems still initialize");
        assert_eq!(scheduler.update_list_names(), vec!["beta"]);
    }

    #[test]
    fn test_database_wait_times_out_nonfatally() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().database_backed(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log)).never_ready()),
            )]
        }));

        // Fast config keeps the timeout in the tens of milliseconds.
        let mut ctx = ctx();
        let start = Instant::now();
        scheduler.initialize_all(&mut ctx);
        assert!(start.elapsed() < Duration::from_secs(2), "timeout must be bounded");

        // Timed-out system is still registered; the flow is degraded, not dead.
        assert!(ctx.registry.get::<AlphaSystem>().is_some());
        assert!(scheduler.is_initialized());
    }

    #[test]
    fn test_tick_waits_for_state_machine() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().update(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);
        log.borrow_mut().clear();

        // No machine registered: ticks do nothing.
        advance(&mut ctx, &mut scheduler);
        advance(&mut ctx, &mut scheduler);
        assert!(log.borrow().is_empty(), "updates must wait for the state machine");

        register_machine(&mut ctx);
        advance(&mut ctx, &mut scheduler);
        assert_eq!(log.borrow().as_slice(), &["update:alpha".to_string()]);
    }

    #[test]
    fn test_update_failure_is_isolated() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![
                InstalledSystem::new(
                    10,
                    Capabilities::none().update(),
                    AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log)).failing_update()),
                ),
                InstalledSystem::new(
                    20,
                    Capabilities::none().update(),
                    BetaSystem(ProbeSystem::new("beta", Rc::clone(&factory_log))),
                ),
            ]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);
        register_machine(&mut ctx);
        log.borrow_mut().clear();

        advance(&mut ctx, &mut scheduler);
        advance(&mut ctx, &mut scheduler);

        let calls = log.borrow();
        let beta_updates = calls.iter().filter(|c| c.as_str() == "update:beta").count();
        assert_eq!(beta_updates, 2, "a failing system must not stop the others or later ticks");
    }

    #[test]
    fn test_fixed_update_cadence_follows_time_scale() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().fixed_update(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);
        register_machine(&mut ctx);
        log.borrow_mut().clear();

        // One second of scaled time: expect roughly 1/FIXED_TIMESTEP calls.
        for _ in 0..60 {
            advance(&mut ctx, &mut scheduler);
        }
        let fixed_calls = log.borrow().iter().filter(|c| c.starts_with("fixed:")).count();
        assert!(
            (45..=55).contains(&fixed_calls),
            "expected ~50 fixed updates in one second, got {fixed_calls}"
        );

        // At time scale zero the fixed cadence stops entirely.
        log.borrow_mut().clear();
        ctx.time_scale = 0.0;
        for _ in 0..60 {
            advance(&mut ctx, &mut scheduler);
        }
        assert!(
            log.borrow().iter().all(|c| !c.starts_with("fixed:")),
            "no fixed updates at time scale zero"
        );
    }

    #[test]
    fn test_state_requests_queued_by_systems_reach_the_machine() {
        let mut scheduler = SystemScheduler::new(Box::new(|_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().update(),
                HandoffSystem { requested: false },
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);
        register_machine(&mut ctx);

        // First tick: the system queues the request during its update and
        // the scheduler hands it to the machine after the machine's update.
        advance(&mut ctx, &mut scheduler);
        let machine = ctx.registry.get::<GameStateMachine>().unwrap();
        assert_eq!(machine.borrow().current_name(), Some("arrival"));
        assert!(machine.borrow().is_transitioning(), "enter has not been polled yet");

        // Second tick polls enter to completion.
        advance(&mut ctx, &mut scheduler);
        assert!(!machine.borrow().is_transitioning());
        assert_eq!(machine.borrow().current_phase(), Phase::Playing);
    }

    #[test]
    fn test_cleanup_clears_everything() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().update(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);
        register_machine(&mut ctx);
        scheduler.cleanup(&mut ctx);

        assert!(log.borrow().iter().any(|c| c == "cleanup:alpha"));
        assert_eq!(scheduler.system_count(), 0);
        assert!(ctx.registry.get::<AlphaSystem>().is_none());
        assert!(
            ctx.registry.get::<GameStateMachine>().is_some(),
            "the state machine registration is not the scheduler's to remove"
        );
        assert!(!scheduler.is_initialized());
    }

    #[test]
    fn test_restart_all_is_idempotent() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![
                InstalledSystem::new(
                    10,
                    Capabilities::none().update(),
                    AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
                ),
                InstalledSystem::new(
                    20,
                    Capabilities::none(),
                    BetaSystem(ProbeSystem::new("beta", Rc::clone(&factory_log))),
                ),
            ]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);

        scheduler.restart_all(&mut ctx);
        let count_once = scheduler.system_count();
        let registry_len_once = ctx.registry.len();

        scheduler.restart_all(&mut ctx);
        assert_eq!(scheduler.system_count(), count_once);
        assert_eq!(ctx.registry.len(), registry_len_once);
        assert!(ctx.registry.get::<AlphaSystem>().is_some());
        assert!(ctx.registry.get::<BetaSystem>().is_some());
    }

    #[test]
    fn test_add_system_rejects_duplicates() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().update(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);

        scheduler.add_system(
            &mut ctx,
            InstalledSystem::new(
                99,
                Capabilities::none().update(),
                AlphaSystem(ProbeSystem::new("alpha2", Rc::clone(&log))),
            ),
        );
        assert_eq!(scheduler.system_count(), 1, "duplicate type must be dropped");

        scheduler.add_system(
            &mut ctx,
            InstalledSystem::new(
                99,
                Capabilities::none().update(),
                BetaSystem(ProbeSystem::new("beta", Rc::clone(&log))),
            ),
        );
        assert_eq!(scheduler.system_count(), 2);
        assert!(ctx.registry.get::<BetaSystem>().is_some());
    }

    #[test]
    fn test_remove_system_absent_is_noop() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let factory_log = Rc::clone(&log);
        let mut scheduler = SystemScheduler::new(Box::new(move |_config| {
            vec![InstalledSystem::new(
                10,
                Capabilities::none().update(),
                AlphaSystem(ProbeSystem::new("alpha", Rc::clone(&factory_log))),
            )]
        }));

        let mut ctx = ctx();
        scheduler.initialize_all(&mut ctx);

        // Removing a type that was never installed changes nothing.
        scheduler.remove_system::<BetaSystem>(&mut ctx);
        assert_eq!(scheduler.system_count(), 1);

        scheduler.remove_system::<AlphaSystem>(&mut ctx);
        assert_eq!(scheduler.system_count(), 0);
        assert!(ctx.registry.get::<AlphaSystem>().is_none());
        assert!(log.borrow().iter().any(|c| c == "cleanup:alpha"));
    }
}
