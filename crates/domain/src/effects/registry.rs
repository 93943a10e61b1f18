//! Per-session effect store.
//!
//! Records are held in an arena keyed by [`EffectId`], each stamped with the
//! sequence number of its first registration. Two indexes sit beside the arena:
//! one by source namespace (for bulk clearing) and one by target (for lookup in
//! registration order). Replacing an id keeps its original sequence number, so
//! re-applying a system does not reorder breakdowns.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{BonusEntry, ConditionSet, Effect, EffectId};

#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    effect: Effect,
}

/// Mutable store of [`Effect`] records for one character computation.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    next_seq: u64,
    slots: HashMap<EffectId, Slot>,
    by_namespace: HashMap<String, BTreeSet<EffectId>>,
    by_target: HashMap<String, BTreeMap<u64, EffectId>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an effect, replacing any record with the same id.
    ///
    /// Returns the replaced effect, if any.
    pub fn add_effect(&mut self, effect: Effect) -> Option<Effect> {
        let id = effect.id.clone();

        if let Some(slot) = self.slots.get_mut(&id) {
            let seq = slot.seq;
            let previous = std::mem::replace(&mut slot.effect, effect);
            let new_target = slot.effect.target.clone();
            if previous.target != new_target {
                self.unindex_target(&previous.target, seq);
                self.by_target
                    .entry(new_target)
                    .or_default()
                    .insert(seq, id);
            }
            return Some(previous);
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_namespace
            .entry(id.namespace().to_string())
            .or_default()
            .insert(id.clone());
        self.by_target
            .entry(effect.target.clone())
            .or_default()
            .insert(seq, id.clone());
        self.slots.insert(id, Slot { seq, effect });
        None
    }

    /// Remove a single effect by id.
    pub fn remove_effect(&mut self, id: &EffectId) -> Option<Effect> {
        let slot = self.slots.remove(id)?;

        let namespace = id.namespace();
        if let Some(ids) = self.by_namespace.get_mut(namespace) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_namespace.remove(namespace);
            }
        }
        self.unindex_target(&slot.effect.target, slot.seq);

        Some(slot.effect)
    }

    /// Remove exactly the effects whose id starts with `prefix`.
    ///
    /// Every id in a namespace starts with that namespace, so a namespace is
    /// dropped whole when it extends the prefix, scanned when the prefix extends
    /// it, and skipped otherwise.
    pub fn remove_effects_by_source_prefix(&mut self, prefix: &str) -> usize {
        let mut doomed: Vec<EffectId> = Vec::new();

        for (namespace, ids) in &self.by_namespace {
            if namespace.starts_with(prefix) {
                doomed.extend(ids.iter().cloned());
            } else if prefix.starts_with(namespace.as_str()) {
                doomed.extend(ids.iter().filter(|id| id.starts_with(prefix)).cloned());
            }
        }

        doomed
            .iter()
            .filter(|id| self.remove_effect(id).is_some())
            .count()
    }

    /// Remove every effect registered under a namespace.
    pub fn remove_namespace(&mut self, namespace: &str) -> usize {
        let Some(ids) = self.by_namespace.get(namespace) else {
            return 0;
        };
        let doomed: Vec<EffectId> = ids.iter().cloned().collect();
        doomed
            .iter()
            .filter(|id| self.remove_effect(id).is_some())
            .count()
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
        self.by_namespace.clear();
        self.by_target.clear();
    }

    pub fn get(&self, id: &EffectId) -> Option<&Effect> {
        self.slots.get(id).map(|slot| &slot.effect)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All effects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_unstable_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.effect)
    }

    /// Effects for a target in registration order, regardless of kind or condition.
    pub fn get_effects_for_target(&self, target: &str) -> Vec<&Effect> {
        self.by_target
            .get(target)
            .map(|ids| {
                ids.values()
                    .filter_map(|id| self.slots.get(id))
                    .map(|slot| &slot.effect)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Numeric effects for a target whose condition (if any) is active.
    pub fn get_numeric_effects(&self, target: &str, conditions: &ConditionSet) -> Vec<&Effect> {
        self.get_effects_for_target(target)
            .into_iter()
            .filter(|effect| effect.value.as_numeric().is_some() && effect.is_active(conditions))
            .collect()
    }

    /// Active numeric effects for a target as stacking-engine entries.
    pub fn numeric_entries(&self, target: &str, conditions: &ConditionSet) -> Vec<BonusEntry> {
        self.get_numeric_effects(target, conditions)
            .into_iter()
            .filter_map(|effect| {
                effect.value.as_numeric().map(|value| {
                    BonusEntry::new(effect.source.clone(), value, effect.bonus_type.clone())
                })
            })
            .collect()
    }

    /// Highest-priority active boolean for a target, or `default`.
    pub fn apply_boolean_effects(
        &self,
        target: &str,
        default: bool,
        conditions: &ConditionSet,
    ) -> bool {
        self.highest_priority(target, conditions, |effect| effect.value.as_boolean())
            .unwrap_or(default)
    }

    /// Highest-priority active override for a target, or `default`.
    pub fn apply_override_effects(
        &self,
        target: &str,
        default: &str,
        conditions: &ConditionSet,
    ) -> String {
        self.highest_priority(target, conditions, |effect| {
            effect.value.as_override().map(str::to_string)
        })
        .unwrap_or_else(|| default.to_string())
    }

    fn highest_priority<T>(
        &self,
        target: &str,
        conditions: &ConditionSet,
        extract: impl Fn(&Effect) -> Option<T>,
    ) -> Option<T> {
        let mut best: Option<(i32, T)> = None;
        for effect in self.get_effects_for_target(target) {
            if !effect.is_active(conditions) {
                continue;
            }
            let Some(value) = extract(effect) else {
                continue;
            };
            // strict comparison: the first registered wins ties
            if best.as_ref().map_or(true, |(p, _)| effect.priority > *p) {
                best = Some((effect.priority, value));
            }
        }
        best.map(|(_, value)| value)
    }

    fn unindex_target(&mut self, target: &str, seq: u64) {
        if let Some(ids) = self.by_target.get_mut(target) {
            ids.remove(&seq);
            if ids.is_empty() {
                self.by_target.remove(target);
            }
        }
    }
}

impl EffectRegistry {
    /// Namespaces currently present, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.by_namespace.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }

    /// Number of effects held under a namespace.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.by_namespace
            .get(namespace)
            .map(BTreeSet::len)
            .unwrap_or(0)
    }
}
