//! Bonus stacking resolution.
//!
//! Entries are grouped by [`BonusType`]. Stacking groups (dodge, circumstance,
//! untyped) contribute the sum of their values. Every other group contributes a
//! single entry:
//!
//! - the highest value when the group holds any bonus (value >= 0)
//! - the most severe value when every entry is a penalty
//!
//! Equal candidates resolve to the entry registered first. The breakdown lists
//! contributing entries in the order they were supplied, and resolving the same
//! input twice produces the same output.

use std::collections::HashMap;

use super::BonusType;
use crate::value_objects::{BreakdownModifier, ValueWithBreakdown};

/// One typed numeric contribution to a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusEntry {
    pub source: String,
    pub value: i32,
    pub bonus_type: BonusType,
}

impl BonusEntry {
    pub fn new(source: impl Into<String>, value: i32, bonus_type: BonusType) -> Self {
        Self {
            source: source.into(),
            value,
            bonus_type,
        }
    }

    pub fn untyped(source: impl Into<String>, value: i32) -> Self {
        Self::new(source, value, BonusType::Untyped)
    }
}

/// Stateless stacking resolver.
pub struct BonusEngine;

impl BonusEngine {
    /// Resolve a set of entries for one target into a total and breakdown.
    pub fn resolve(label: impl Into<String>, entries: &[BonusEntry]) -> ValueWithBreakdown {
        let contributing = Self::contributing_indices(entries);

        let modifiers = contributing
            .into_iter()
            .map(|index| {
                let entry = &entries[index];
                BreakdownModifier::typed(
                    entry.source.clone(),
                    entry.value,
                    entry.bonus_type.clone(),
                )
            })
            .collect();

        ValueWithBreakdown::summed(label, modifiers)
    }

    /// Total only, for callers that do not need the breakdown.
    pub fn stacked_total(entries: &[BonusEntry]) -> i32 {
        Self::contributing_indices(entries)
            .into_iter()
            .map(|index| entries[index].value)
            .sum()
    }

    /// Indices of the entries that survive stacking, in input order.
    fn contributing_indices(entries: &[BonusEntry]) -> Vec<usize> {
        let mut groups: HashMap<&BonusType, Vec<usize>> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            groups.entry(&entry.bonus_type).or_default().push(index);
        }

        let mut contributing = Vec::with_capacity(entries.len());
        for (bonus_type, members) in groups {
            if bonus_type.is_stacking() {
                contributing.extend(members);
            } else if let Some(winner) = Self::non_stacking_winner(entries, &members) {
                contributing.push(winner);
            }
        }

        contributing.sort_unstable();
        contributing
    }

    /// Pick the single entry a non-stacking group contributes.
    ///
    /// `members` is in input order, so strict comparisons keep the first of
    /// equal candidates.
    fn non_stacking_winner(entries: &[BonusEntry], members: &[usize]) -> Option<usize> {
        let has_bonus = members.iter().any(|&i| entries[i].value >= 0);

        let mut winner: Option<usize> = None;
        for &index in members {
            let value = entries[index].value;
            let better = match winner {
                None => true,
                Some(current) if has_bonus => value > entries[current].value,
                Some(current) => value < entries[current].value,
            };
            if better {
                winner = Some(index);
            }
        }
        winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, value: i32, bonus_type: &str) -> BonusEntry {
        BonusEntry::new(source, value, BonusType::from(bonus_type))
    }

    #[test]
    fn empty_input_resolves_to_zero() {
        let result = BonusEngine::resolve("AC", &[]);
        assert_eq!(result.total, 0);
        assert!(result.modifiers.is_empty());
        assert_eq!(result.label, "AC");
    }

    #[test]
    fn dodge_bonuses_stack() {
        let entries = vec![entry("Dodge feat", 1, "dodge"), entry("Haste", 2, "dodge")];
        assert_eq!(BonusEngine::resolve("AC", &entries).total, 3);
    }

    #[test]
    fn enhancement_bonuses_take_highest() {
        let entries = vec![
            entry("Bull's Strength", 1, "enhancement"),
            entry("Belt", 3, "enhancement"),
        ];
        let result = BonusEngine::resolve("STR", &entries);
        assert_eq!(result.total, 3);
        assert_eq!(result.modifiers.len(), 1);
        assert_eq!(result.modifiers[0].source, "Belt");
    }

    #[test]
    fn different_non_stacking_types_both_apply() {
        let entries = vec![entry("Weapon", 2, "enhancement"), entry("Heroism", 1, "morale")];
        assert_eq!(BonusEngine::resolve("Attack", &entries).total, 3);
    }

    #[test]
    fn unknown_types_take_highest() {
        let entries = vec![entry("Boon A", 2, "mythic"), entry("Boon B", 4, "mythic")];
        assert_eq!(BonusEngine::resolve("Will", &entries).total, 4);
    }

    #[test]
    fn all_penalty_group_applies_most_severe() {
        let entries = vec![entry("Enlarge", -1, "size"), entry("Giant form", -2, "size")];
        let result = BonusEngine::resolve("Attack", &entries);
        assert_eq!(result.total, -2);
        assert_eq!(result.modifiers[0].source, "Giant form");
    }

    #[test]
    fn ties_keep_first_registered() {
        let entries = vec![entry("Cloak", 2, "resistance"), entry("Ring", 2, "resistance")];
        let result = BonusEngine::resolve("Fort", &entries);
        assert_eq!(result.modifiers.len(), 1);
        assert_eq!(result.modifiers[0].source, "Cloak");
    }

    #[test]
    fn breakdown_preserves_registration_order() {
        let entries = vec![
            entry("Base", 4, "untyped"),
            entry("Small ring", 1, "deflection"),
            entry("Bless", 1, "morale"),
            entry("Big ring", 2, "deflection"),
            entry("Dodge", 1, "dodge"),
        ];
        let result = BonusEngine::resolve("AC", &entries);
        let sources: Vec<_> = result.modifiers.iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["Base", "Bless", "Big ring", "Dodge"]);
        assert_eq!(result.total, 8);
    }

    #[test]
    fn resolution_is_idempotent() {
        let entries = vec![
            entry("A", 2, "luck"),
            entry("B", 2, "luck"),
            entry("C", 1, "circumstance"),
            entry("D", 3, "circumstance"),
            entry("E", -1, "untyped"),
        ];
        let first = BonusEngine::resolve("Reflex", &entries);
        let second = BonusEngine::resolve("Reflex", &entries);
        assert_eq!(first, second);
        assert_eq!(BonusEngine::stacked_total(&entries), first.total);
    }
}
