//! HORDEFALL gameplay simulation.
//!
//! Wires the lifecycle scheduler from `hordefall-runtime` together with the
//! concrete gameplay systems: enemy content, upgrades, progression, spawning,
//! UI routing, and the pause/upgrade coordinator. The [`GameEngine`] is the
//! single entry point; callers queue [`hordefall_core::commands::GameCommand`]s
//! and pull a [`hordefall_core::state::RunSnapshot`] per tick.

pub mod engine;
pub mod snapshot;
pub mod states;
pub mod systems;

pub use engine::GameEngine;
