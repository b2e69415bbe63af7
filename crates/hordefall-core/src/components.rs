//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::Tier;

/// Marks an entity as a live enemy and records which config spawned it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Id of the enemy config this entity was spawned from.
    pub enemy_id: String,
    pub tier: Tier,
    /// Tick at which the entity was spawned.
    pub spawned_tick: u64,
}

/// 2D position in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }
}

/// Marks an entity as frozen by the pause gate.
/// Removed (idempotently) on resume wake-up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Frozen;
