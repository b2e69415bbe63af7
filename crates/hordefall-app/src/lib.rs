//! HORDEFALL host application.
//!
//! Owns the game loop thread and the channel plumbing around the engine;
//! `main` drives a scripted session against it.

pub mod game_loop;
pub mod state;
