//! Enemy content database.
//!
//! Holds the enemy roster and serves tier and wave queries. Entries are
//! validated and indexed during initialization; the database reports itself
//! ready only once the indices exist, which is what the scheduler's bounded
//! wait polls for.

use std::collections::HashMap;

use hordefall_core::config::EnemyConfig;
use hordefall_core::enums::Tier;
use hordefall_core::error::Result;
use hordefall_runtime::{GameContext, GameSystem};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Indexed enemy roster with tier and wave lookups.
pub struct EnemyDatabase {
    entries: Vec<EnemyConfig>,
    by_id: HashMap<String, usize>,
    by_tier: HashMap<Tier, Vec<usize>>,
    validation_errors: Vec<String>,
    indexed: bool,
}

impl EnemyDatabase {
    pub fn new(entries: Vec<EnemyConfig>) -> Self {
        Self {
            entries,
            by_id: HashMap::new(),
            by_tier: HashMap::new(),
            validation_errors: Vec::new(),
            indexed: false,
        }
    }

    /// Checks every entry and returns one message per problem found.
    /// Does not touch the indices, so it is safe to call at any time.
    pub fn validate(&self) -> Vec<String> {
        Self::scan(&self.entries).1
    }

    /// Splits the roster into valid entry indices and validation errors.
    /// Later entries that reuse an id are rejected; the first one stays.
    fn scan(entries: &[EnemyConfig]) -> (Vec<usize>, Vec<String>) {
        let mut valid = Vec::new();
        let mut errors = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.enemy_id.is_empty() {
                errors.push(format!("enemy at index {index} has an empty id"));
                continue;
            }
            if seen.contains_key(entry.enemy_id.as_str()) {
                errors.push(format!(
                    "duplicate enemy id '{}' at index {index}; keeping the first entry",
                    entry.enemy_id
                ));
                continue;
            }
            if entry.difficulty_value <= 0.0 {
                errors.push(format!(
                    "enemy '{}' has non-positive difficulty value {}",
                    entry.enemy_id, entry.difficulty_value
                ));
                continue;
            }
            if entry.max_health <= 0.0 {
                errors.push(format!(
                    "enemy '{}' has non-positive max health {}",
                    entry.enemy_id, entry.max_health
                ));
                continue;
            }
            if entry.min_wave_number < 1 {
                errors.push(format!(
                    "enemy '{}' has invalid minimum wave {}",
                    entry.enemy_id, entry.min_wave_number
                ));
                continue;
            }
            seen.insert(entry.enemy_id.as_str(), index);
            valid.push(index);
        }
        (valid, errors)
    }

    fn build_indices(&mut self) {
        let (valid, errors) = Self::scan(&self.entries);
        self.by_id.clear();
        self.by_tier.clear();
        for &index in &valid {
            let entry = &self.entries[index];
            self.by_id.insert(entry.enemy_id.clone(), index);
            self.by_tier.entry(entry.tier).or_default().push(index);
        }
        self.validation_errors = errors;
        self.indexed = true;
    }

    fn ensure_indexed(&mut self) {
        if !self.indexed {
            debug!("enemy database queried before initialization; indexing now");
            self.build_indices();
        }
    }

    /// True once the indices have been built.
    pub fn is_loaded(&self) -> bool {
        self.indexed
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Number of entries that passed validation.
    pub fn len(&mut self) -> usize {
        self.ensure_indexed();
        self.by_id.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// All valid entries of the given tier, in roster order.
    pub fn by_tier(&mut self, tier: Tier) -> Vec<EnemyConfig> {
        self.ensure_indexed();
        self.by_tier
            .get(&tier)
            .map(|indices| indices.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Uniform random pick from the given tier, or `None` if the tier is empty.
    pub fn random_by_tier(&mut self, tier: Tier, rng: &mut ChaCha8Rng) -> Option<EnemyConfig> {
        self.ensure_indexed();
        let indices = self.by_tier.get(&tier)?;
        if indices.is_empty() {
            return None;
        }
        let pick = indices[rng.gen_range(0..indices.len())];
        Some(self.entries[pick].clone())
    }

    /// Looks up an enemy by id. A duplicated id resolves to its first entry.
    pub fn by_id(&mut self, enemy_id: &str) -> Option<EnemyConfig> {
        self.ensure_indexed();
        let index = *self.by_id.get(enemy_id)?;
        Some(self.entries[index].clone())
    }

    /// Enemies eligible for the given wave under the given tier weights.
    ///
    /// A tier contributes only when its weight is strictly positive, so a
    /// zero-weighted tier stays excluded even when its enemies meet the wave
    /// requirement. Results keep tier order, then roster order.
    pub fn available_for_wave(
        &mut self,
        wave_number: u32,
        tier_weights: &HashMap<Tier, f64>,
    ) -> Vec<EnemyConfig> {
        self.ensure_indexed();
        let mut out = Vec::new();
        for tier in Tier::ALL {
            let weight = tier_weights.get(&tier).copied().unwrap_or(0.0);
            if weight <= 0.0 {
                continue;
            }
            let Some(indices) = self.by_tier.get(&tier) else {
                continue;
            };
            for &index in indices {
                let entry = &self.entries[index];
                if entry.min_wave_number <= wave_number {
                    out.push(entry.clone());
                }
            }
        }
        out
    }
}

impl GameSystem for EnemyDatabase {
    fn name(&self) -> &'static str {
        "enemy_database"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.build_indices();
        for error in &self.validation_errors {
            warn!(error = error.as_str(), "enemy roster validation");
        }
        info!(
            entries = self.by_id.len(),
            rejected = self.validation_errors.len(),
            "enemy database indexed"
        );
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.by_id.clear();
        self.by_tier.clear();
        self.validation_errors.clear();
        self.indexed = false;
        Ok(())
    }

    fn ready(&self) -> bool {
        self.indexed
    }
}
