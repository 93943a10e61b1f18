//! One character's mutable computation state.

use super::{BonusEntry, ConditionSet, EffectRegistry, OverrideSystem, NAMESPACE_SEPARATOR};

/// Effect registry, override store and active conditions for exactly one
/// character computation.
///
/// Build one per recompute and hand it by `&mut` to each contributing system;
/// never share one between two characters.
#[derive(Debug, Default)]
pub struct StatSession {
    pub effects: EffectRegistry,
    pub overrides: OverrideSystem,
    conditions: ConditionSet,
}

impl StatSession {
    pub fn new(conditions: ConditionSet) -> Self {
        Self {
            effects: EffectRegistry::new(),
            overrides: OverrideSystem::new(),
            conditions,
        }
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    /// Drop everything a contributing system registered under its namespace.
    ///
    /// Returns the number of effects and overrides removed.
    pub fn clear_namespace(&mut self, namespace: &str) -> usize {
        let prefix = format!("{namespace}{NAMESPACE_SEPARATOR}");
        self.effects.remove_effects_by_source_prefix(&prefix)
            + self.overrides.remove_overrides_by_prefix(&prefix)
    }

    pub fn clear_all(&mut self) {
        self.effects.clear_all();
        self.overrides.clear();
    }

    /// Empty the session and start over under `conditions`.
    pub fn reset(&mut self, conditions: ConditionSet) {
        self.clear_all();
        self.conditions = conditions;
    }

    /// Active numeric entries for a target under this session's conditions.
    pub fn entries(&self, target: &str) -> Vec<BonusEntry> {
        self.effects.numeric_entries(target, &self.conditions)
    }

    /// Active numeric entries for several targets, concatenated in target order.
    pub fn entries_for(&self, targets: &[&str]) -> Vec<BonusEntry> {
        targets.iter().flat_map(|target| self.entries(target)).collect()
    }

    pub fn flag(&self, target: &str, default: bool) -> bool {
        self.effects
            .apply_boolean_effects(target, default, &self.conditions)
    }
}
