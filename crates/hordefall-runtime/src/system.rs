//! The system trait and its registration wrapper.

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

use hordefall_core::error::Result;

use crate::context::GameContext;
use crate::registry::Registry;

/// A gameplay system driven by the scheduler.
///
/// `initialize` runs once per scheduler initialization, `cleanup` on
/// teardown or restart. `update` and `fixed_update` are only invoked when
/// the matching capability was declared at registration. Database-backed
/// systems additionally report readiness through `ready`, which the
/// scheduler polls with a bounded wait during initialization.
pub trait GameSystem {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, ctx: &mut GameContext) -> Result<()>;

    /// Per-tick update with the scaled delta.
    fn update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
        Ok(())
    }

    /// Fixed-cadence update with the fixed timestep.
    fn fixed_update(&mut self, _ctx: &mut GameContext, _dt: f64) -> Result<()> {
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut GameContext) -> Result<()>;

    /// Readiness probe for database-backed systems. Defaults to ready.
    fn ready(&self) -> bool {
        true
    }
}

/// Shared handle to an erased system.
pub type SystemHandle = Rc<RefCell<dyn GameSystem>>;

/// Capability set declared at registration time. The scheduler never
/// inspects a system's runtime type to discover what it can do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub updatable: bool,
    pub fixed_updatable: bool,
    pub database_backed: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn update(mut self) -> Self {
        self.updatable = true;
        self
    }

    pub fn fixed_update(mut self) -> Self {
        self.fixed_updatable = true;
        self
    }

    pub fn database_backed(mut self) -> Self {
        self.database_backed = true;
        self
    }
}

/// A system plus everything the scheduler needs to run and register it:
/// initialization order, declared capabilities, and a registrar closure
/// that re-inserts the concrete-typed handle into the registry.
pub struct InstalledSystem {
    pub(crate) name: &'static str,
    pub(crate) order: i32,
    pub(crate) caps: Capabilities,
    pub(crate) type_id: TypeId,
    pub(crate) handle: SystemHandle,
    pub(crate) register: Box<dyn Fn(&mut Registry)>,
    pub(crate) initialized: bool,
}

impl InstalledSystem {
    /// Wrap `system` for installation at the given order. Ties in `order`
    /// keep installation order (the scheduler sorts stably).
    pub fn new<T: GameSystem + 'static>(order: i32, caps: Capabilities, system: T) -> Self {
        let concrete = Rc::new(RefCell::new(system));
        let name = concrete.borrow().name();
        let handle: SystemHandle = concrete.clone();
        Self {
            name,
            order,
            caps,
            type_id: TypeId::of::<T>(),
            handle,
            register: Box::new(move |registry| registry.insert(Rc::clone(&concrete))),
            initialized: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn caps(&self) -> Capabilities {
        self.caps
    }
}
