//! Wave timing and enemy spawning.
//!
//! The wave clock runs on scaled time; spawn attempts run on the fixed step.
//! Tier weights shift with the wave number so later waves pull from heavier
//! tiers, and the enemy database filters candidates by the wave's minimum.
//! Spawned enemies are placed on a ring around the origin.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;
use hecs::{Entity, World};
use hordefall_core::components::{Enemy, Frozen, Health, Position};
use hordefall_core::constants::SPAWN_RING_RADIUS;
use hordefall_core::enums::Tier;
use hordefall_core::error::Result;
use hordefall_core::events::GameEvent;
use hordefall_runtime::{GameContext, GameSystem};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::systems::enemy_db::EnemyDatabase;

pub struct SpawnDirector {
    spawning: bool,
    wave_number: u32,
    wave_timer: f64,
    spawn_timer: f64,
    total_spawned: u64,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self {
            spawning: false,
            wave_number: 1,
            wave_timer: 0.0,
            spawn_timer: 0.0,
            total_spawned: 0,
        }
    }
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn start_spawning(&mut self) {
        if !self.spawning {
            self.spawning = true;
            self.spawn_timer = 0.0;
            debug!(wave = self.wave_number, "spawning started");
        }
    }

    pub fn stop_spawning(&mut self) {
        if self.spawning {
            self.spawning = false;
            debug!("spawning stopped");
        }
    }

    /// Tier weights for a wave. Early waves lean on low tiers; each band
    /// opens another tier and shifts weight toward the newest one. A tier
    /// missing from the map (or carrying zero weight) never spawns.
    pub fn tier_weights(wave_number: u32) -> HashMap<Tier, f64> {
        let mut weights = HashMap::new();
        match wave_number {
            0..=2 => {
                weights.insert(Tier::Tier1, 1.0);
            }
            3..=5 => {
                weights.insert(Tier::Tier1, 0.7);
                weights.insert(Tier::Tier2, 0.3);
            }
            6..=9 => {
                weights.insert(Tier::Tier1, 0.45);
                weights.insert(Tier::Tier2, 0.35);
                weights.insert(Tier::Tier3, 0.2);
            }
            10..=14 => {
                weights.insert(Tier::Tier1, 0.25);
                weights.insert(Tier::Tier2, 0.3);
                weights.insert(Tier::Tier3, 0.3);
                weights.insert(Tier::Tier4, 0.15);
            }
            _ => {
                weights.insert(Tier::Tier1, 0.15);
                weights.insert(Tier::Tier2, 0.2);
                weights.insert(Tier::Tier3, 0.3);
                weights.insert(Tier::Tier4, 0.25);
                weights.insert(Tier::Tier5, 0.1);
            }
        }
        weights
    }

    /// Attempts one spawn immediately. Returns true when an enemy entered
    /// the world; false when the cap, the database, or eligibility blocked it.
    pub fn spawn_now(&mut self, ctx: &mut GameContext) -> bool {
        if live_enemy_count(&ctx.world) >= ctx.config.max_live_enemies {
            debug!(cap = ctx.config.max_live_enemies, "live enemy cap reached; spawn skipped");
            return false;
        }
        let Some(database) = ctx.registry.get::<EnemyDatabase>() else {
            warn!("enemy database unavailable; spawn skipped");
            return false;
        };
        let weights = Self::tier_weights(self.wave_number);
        let available = database
            .borrow_mut()
            .available_for_wave(self.wave_number, &weights);
        if available.is_empty() {
            debug!(wave = self.wave_number, "no eligible enemies; spawn skipped");
            return false;
        }

        // Weighted pick over the tiers that actually have eligible entries,
        // then a uniform pick within the chosen tier.
        let mut pools: Vec<(f64, Vec<usize>)> = Vec::new();
        for tier in Tier::ALL {
            let weight = weights.get(&tier).copied().unwrap_or(0.0);
            if weight <= 0.0 {
                continue;
            }
            let pool: Vec<usize> = available
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.tier == tier)
                .map(|(index, _)| index)
                .collect();
            if !pool.is_empty() {
                pools.push((weight, pool));
            }
        }
        let total_weight: f64 = pools.iter().map(|(weight, _)| weight).sum();
        let mut roll = ctx.rng.gen_range(0.0..total_weight);
        let mut chosen = None;
        for (weight, pool) in &pools {
            if roll < *weight {
                chosen = Some(pool[ctx.rng.gen_range(0..pool.len())]);
                break;
            }
            roll -= weight;
        }
        let Some(index) = chosen.or_else(|| {
            // Floating point roll landed on the boundary; take the last pool.
            pools.last().map(|(_, pool)| pool[pool.len() - 1])
        }) else {
            return false;
        };
        let config = &available[index];

        let bearing = ctx.rng.gen_range(0.0..TAU);
        let position = Vec2::new(bearing.cos(), bearing.sin()) * SPAWN_RING_RADIUS;
        ctx.world.spawn((
            Enemy {
                enemy_id: config.enemy_id.clone(),
                tier: config.tier,
                spawned_tick: ctx.time.tick,
            },
            Position(position),
            Health::full(config.max_health),
        ));
        self.total_spawned += 1;
        ctx.push_event(GameEvent::EnemySpawned {
            enemy_id: config.enemy_id.clone(),
        });
        true
    }

    /// Removes one live enemy with the given id. Returns false if none match.
    pub fn despawn_one(&mut self, ctx: &mut GameContext, enemy_id: &str) -> bool {
        let target: Option<Entity> = ctx
            .world
            .query::<&Enemy>()
            .iter()
            .find(|(_, enemy)| enemy.enemy_id == enemy_id)
            .map(|(entity, _)| entity);
        match target {
            Some(entity) => ctx.world.despawn(entity).is_ok(),
            None => false,
        }
    }
}

impl GameSystem for SpawnDirector {
    fn name(&self) -> &'static str {
        "spawn_director"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f64) -> Result<()> {
        if !self.spawning {
            return Ok(());
        }
        self.wave_timer += dt;
        while self.wave_timer >= ctx.config.wave_duration_secs {
            self.wave_timer -= ctx.config.wave_duration_secs;
            self.wave_number += 1;
            info!(wave = self.wave_number, "wave advanced");
            ctx.push_event(GameEvent::WaveAdvanced {
                wave: self.wave_number,
            });
        }
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut GameContext, dt: f64) -> Result<()> {
        if !self.spawning {
            return Ok(());
        }
        self.spawn_timer += dt;
        while self.spawn_timer >= ctx.config.spawn_interval_secs {
            self.spawn_timer -= ctx.config.spawn_interval_secs;
            self.spawn_now(ctx);
        }
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut GameContext) -> Result<()> {
        let removed = despawn_all_enemies(&mut ctx.world);
        if removed > 0 {
            debug!(removed, "despawned remaining enemies");
        }
        *self = Self::default();
        Ok(())
    }
}

/// Number of live enemy entities.
pub fn live_enemy_count(world: &World) -> usize {
    world.query::<&Enemy>().iter().count()
}

/// Tags every unfrozen enemy with [`Frozen`]. Returns how many were tagged.
pub fn freeze_enemies(world: &mut World) -> usize {
    let targets: Vec<Entity> = world
        .query::<(&Enemy, Option<&Frozen>)>()
        .iter()
        .filter(|(_, (_, frozen))| frozen.is_none())
        .map(|(entity, _)| entity)
        .collect();
    for entity in &targets {
        let _ = world.insert_one(*entity, Frozen);
    }
    targets.len()
}

/// Clears [`Frozen`] from every enemy carrying it. Safe to call when nothing
/// is frozen; a second call finds no work.
pub fn wake_enemies(world: &mut World) -> usize {
    let frozen: Vec<Entity> = world
        .query::<(&Enemy, &Frozen)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in &frozen {
        let _ = world.remove_one::<Frozen>(*entity);
    }
    frozen.len()
}

/// Removes every enemy entity. Returns how many were removed.
pub fn despawn_all_enemies(world: &mut World) -> usize {
    let targets: Vec<Entity> = world
        .query::<&Enemy>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in &targets {
        let _ = world.despawn(*entity);
    }
    targets.len()
}
