//! Runtime mechanism for HORDEFALL: the service registry, the system
//! lifecycle scheduler, the game state machine, and the shared context
//! they all operate on.
//!
//! This crate knows nothing about concrete gameplay systems; those live in
//! `hordefall-sim` and are installed through the scheduler's factory.

pub mod clock;
pub mod context;
pub mod registry;
pub mod scheduler;
pub mod state_machine;
pub mod system;

pub use context::GameContext;
pub use registry::Registry;
pub use scheduler::SystemScheduler;
pub use state_machine::{GameState, GameStateMachine, PausableState, Progress};
pub use system::{Capabilities, GameSystem, InstalledSystem, SystemHandle};
