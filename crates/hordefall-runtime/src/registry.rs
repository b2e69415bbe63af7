//! Service registry: typed lookup of singleton system instances.
//!
//! Systems are owned by the scheduler; the registry hands out shared
//! `Rc<RefCell<T>>` handles so any component can reach a collaborator by
//! concrete type. All access happens on the game-loop thread.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

/// One live instance per type. Registering a new instance for an existing
/// type replaces it (last write wins); lookups return `None` rather than
/// panicking.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Rc<dyn Any>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its concrete type.
    pub fn insert<T: 'static>(&mut self, instance: Rc<RefCell<T>>) {
        let replaced = self
            .entries
            .insert(TypeId::of::<T>(), instance as Rc<dyn Any>);
        if replaced.is_some() {
            debug!(type_name = std::any::type_name::<T>(), "registry entry replaced");
        }
    }

    /// Look up the registered instance of `T`, if any.
    pub fn get<T: 'static>(&self) -> Option<Rc<RefCell<T>>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| Rc::clone(entry).downcast::<RefCell<T>>().ok())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Remove the entry for `T`. Returns whether anything was removed.
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    /// Remove by raw type id; used by the scheduler, which tracks its
    /// systems' type ids after erasure.
    pub fn remove_id(&mut self, id: TypeId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
