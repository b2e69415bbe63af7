//! Upgrade pool and per-run upgrade levels.
//!
//! The pool is static content; levels are per-run state that the pause
//! coordinator advances when the player picks an offer. Stat multipliers are
//! derived on demand from the levels, so nothing else has to track them.

use std::collections::HashMap;

use hordefall_core::config::UpgradeConfig;
use hordefall_core::enums::UpgradeKind;
use hordefall_core::error::{GameError, Result};
use hordefall_runtime::{GameContext, GameSystem};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub struct UpgradeSystem {
    pool: Vec<UpgradeConfig>,
    by_id: HashMap<String, usize>,
    levels: HashMap<String, u32>,
    loaded: bool,
}

impl UpgradeSystem {
    pub fn new(pool: Vec<UpgradeConfig>) -> Self {
        Self {
            pool,
            by_id: HashMap::new(),
            levels: HashMap::new(),
            loaded: false,
        }
    }

    fn build_index(&mut self) {
        self.by_id.clear();
        for (index, entry) in self.pool.iter().enumerate() {
            self.by_id.entry(entry.upgrade_id.clone()).or_insert(index);
        }
        self.loaded = true;
    }

    /// True once the pool index exists. Offers are skipped until then.
    pub fn is_database_loaded(&self) -> bool {
        self.loaded
    }

    /// Current level of an upgrade, zero when never taken.
    pub fn level(&self, upgrade_id: &str) -> u32 {
        self.levels.get(upgrade_id).copied().unwrap_or(0)
    }

    /// Picks up to `count` distinct upgrades that still have room to level.
    ///
    /// Returns fewer entries when the eligible pool is smaller, and an empty
    /// vec when everything is maxed out.
    pub fn generate_upgrade_options(
        &self,
        rng: &mut ChaCha8Rng,
        count: usize,
    ) -> Vec<UpgradeConfig> {
        let mut eligible: Vec<usize> = self
            .pool
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.level(&entry.upgrade_id) < entry.max_level)
            .map(|(index, _)| index)
            .collect();
        let take = count.min(eligible.len());
        // Partial shuffle: each draw swaps a random remaining index forward.
        for slot in 0..take {
            let pick = rng.gen_range(slot..eligible.len());
            eligible.swap(slot, pick);
        }
        eligible
            .into_iter()
            .take(take)
            .map(|index| self.pool[index].clone())
            .collect()
    }

    /// Applies one level of the given upgrade and returns the new level.
    pub fn select_upgrade(&mut self, upgrade_id: &str) -> Result<u32> {
        if !self.loaded {
            return Err(GameError::DatabaseNotLoaded("upgrade pool"));
        }
        let index = *self
            .by_id
            .get(upgrade_id)
            .ok_or_else(|| GameError::UnknownUpgrade {
                id: upgrade_id.to_string(),
            })?;
        let entry = &self.pool[index];
        let current = self.level(upgrade_id);
        if current >= entry.max_level {
            return Err(GameError::UpgradeAtMaxLevel {
                id: upgrade_id.to_string(),
                max: entry.max_level,
            });
        }
        let new_level = current + 1;
        self.levels.insert(upgrade_id.to_string(), new_level);
        debug!(upgrade = upgrade_id, level = new_level, "upgrade applied");
        Ok(new_level)
    }

    /// Combined multiplier for a stat kind across all taken upgrades of that
    /// kind. Returns 1.0 when nothing applies.
    pub fn multiplier(&self, kind: UpgradeKind) -> f64 {
        self.pool
            .iter()
            .filter(|entry| entry.kind == kind)
            .fold(1.0, |acc, entry| {
                let level = self.level(&entry.upgrade_id);
                acc * entry.multiplier_per_level.powi(level as i32)
            })
    }
}

impl GameSystem for UpgradeSystem {
    fn name(&self) -> &'static str {
        "upgrade_system"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.build_index();
        self.levels.clear();
        info!(pool = self.pool.len(), "upgrade pool indexed");
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.by_id.clear();
        self.levels.clear();
        self.loaded = false;
        Ok(())
    }

    fn ready(&self) -> bool {
        self.loaded
    }
}
