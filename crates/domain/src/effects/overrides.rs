//! Non-additive overrides resolved by priority.
//!
//! An override says "for this `original_value`, use `override_value` instead"
//! (e.g. use Charisma for Intimidate). Lookups filter by kind and original
//! value, skip overrides whose condition is inactive, then take the highest
//! priority. Equal priorities resolve to the override registered first.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConditionSet;
use crate::value_objects::{Ability, SizeCategory};

/// Original value that matches every weapon for weapon-finesse overrides.
pub const ALL_WEAPONS: &str = "*";

/// What an override substitutes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverrideKind {
    /// Replace a skill's key ability (original: skill id)
    AbilityForSkill,
    /// Replace the ability used for an attack type (original: `melee`, `ranged`, `cmb`)
    AbilityForAttack,
    /// Change whether a skill needs ranks (original: skill id, value: "true"/"false")
    SkillTrainedOnly,
    /// Allow Dexterity on attacks with a weapon (original: weapon id or `*`)
    WeaponFinesse,
    /// Force an effective size category (original: `size`)
    SizeCategory,
    Other(String),
}

impl OverrideKind {
    pub fn name(&self) -> &str {
        match self {
            OverrideKind::AbilityForSkill => "ability_for_skill",
            OverrideKind::AbilityForAttack => "ability_for_attack",
            OverrideKind::SkillTrainedOnly => "skill_trained_only",
            OverrideKind::WeaponFinesse => "weapon_finesse",
            OverrideKind::SizeCategory => "size_category",
            OverrideKind::Other(name) => name,
        }
    }

    /// Parse a rules-table type name; `None` for names that are not override kinds.
    pub fn recognize(raw: &str) -> Option<OverrideKind> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "ability_for_skill" | "skill_ability" => Some(OverrideKind::AbilityForSkill),
            "ability_for_attack" | "attack_ability" => Some(OverrideKind::AbilityForAttack),
            "skill_trained_only" | "trained_only" => Some(OverrideKind::SkillTrainedOnly),
            "weapon_finesse" => Some(OverrideKind::WeaponFinesse),
            "size_category" | "size" => Some(OverrideKind::SizeCategory),
            _ => None,
        }
    }

    /// Target prefix stripped from rules-table targets to get the original value.
    pub fn target_prefix(&self) -> Option<&'static str> {
        match self {
            OverrideKind::AbilityForSkill | OverrideKind::SkillTrainedOnly => Some("skill."),
            OverrideKind::AbilityForAttack => Some("attack."),
            OverrideKind::WeaponFinesse => Some("weapon."),
            _ => None,
        }
    }
}

impl From<String> for OverrideKind {
    fn from(raw: String) -> Self {
        OverrideKind::recognize(&raw).unwrap_or(OverrideKind::Other(raw))
    }
}

impl From<OverrideKind> for String {
    fn from(value: OverrideKind) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A priority-ranked substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub id: String,
    pub kind: OverrideKind,
    pub original_value: String,
    pub override_value: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

impl Override {
    pub fn new(
        id: impl Into<String>,
        kind: OverrideKind,
        original_value: impl Into<String>,
        override_value: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            original_value: original_value.into(),
            override_value: override_value.into(),
            source: source.into(),
            condition: None,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Store of [`Override`] records for one character computation.
///
/// Records keep insertion order; replacing an id keeps its position.
#[derive(Debug, Default)]
pub struct OverrideSystem {
    overrides: Vec<Override>,
}

impl OverrideSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an override, replacing any record with the same id.
    pub fn add_override(&mut self, record: Override) -> Option<Override> {
        match self.overrides.iter_mut().find(|o| o.id == record.id) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.overrides.push(record);
                None
            }
        }
    }

    pub fn remove_override(&mut self, id: &str) -> Option<Override> {
        let index = self.overrides.iter().position(|o| o.id == id)?;
        Some(self.overrides.remove(index))
    }

    pub fn remove_overrides_by_source(&mut self, source: &str) -> usize {
        self.remove_where(|o| o.source == source)
    }

    pub fn remove_overrides_by_type(&mut self, kind: &OverrideKind) -> usize {
        self.remove_where(|o| &o.kind == kind)
    }

    /// Remove overrides whose id starts with `prefix` (namespace clearing).
    pub fn remove_overrides_by_prefix(&mut self, prefix: &str) -> usize {
        self.remove_where(|o| o.id.starts_with(prefix))
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn get_overrides_by_type(&self, kind: &OverrideKind) -> Vec<&Override> {
        self.overrides.iter().filter(|o| &o.kind == kind).collect()
    }

    /// Ability a skill should use instead of its key ability.
    pub fn get_ability_override_for_skill(
        &self,
        skill_id: &str,
        conditions: &ConditionSet,
    ) -> Option<Ability> {
        self.resolve(&OverrideKind::AbilityForSkill, skill_id, conditions)
            .and_then(|o| o.override_value.parse().ok())
    }

    /// Ability an attack type (`melee`, `ranged`, `cmb`) should use.
    pub fn get_ability_override_for_attack(
        &self,
        attack_type: &str,
        conditions: &ConditionSet,
    ) -> Option<Ability> {
        self.resolve(&OverrideKind::AbilityForAttack, attack_type, conditions)
            .and_then(|o| o.override_value.parse().ok())
    }

    /// Replacement trained-only flag for a skill, if any override applies.
    pub fn get_skill_trained_only_override(
        &self,
        skill_id: &str,
        conditions: &ConditionSet,
    ) -> Option<bool> {
        self.resolve(&OverrideKind::SkillTrainedOnly, skill_id, conditions)
            .and_then(|o| parse_flag(&o.override_value))
    }

    /// Whether weapon finesse applies to a weapon, directly or through `*`.
    pub fn has_weapon_finesse(&self, weapon_id: &str, conditions: &ConditionSet) -> bool {
        self.best(&OverrideKind::WeaponFinesse, conditions, |o| {
            o.original_value == weapon_id || o.original_value == ALL_WEAPONS
        })
        .map(|o| parse_flag(&o.override_value).unwrap_or(true))
        .unwrap_or(false)
    }

    /// Size overrides, highest priority first (ties in registration order).
    pub fn get_size_overrides(&self, conditions: &ConditionSet) -> Vec<(&Override, SizeCategory)> {
        let mut sizes: Vec<(&Override, SizeCategory)> = self
            .overrides
            .iter()
            .filter(|o| {
                o.kind == OverrideKind::SizeCategory && conditions.allows(o.condition.as_deref())
            })
            .filter_map(|o| o.override_value.parse().ok().map(|size| (o, size)))
            .collect();
        sizes.sort_by(|a, b| b.0.priority.cmp(&a.0.priority));
        sizes
    }

    fn resolve(
        &self,
        kind: &OverrideKind,
        original_value: &str,
        conditions: &ConditionSet,
    ) -> Option<&Override> {
        self.best(kind, conditions, |o| o.original_value == original_value)
    }

    fn best(
        &self,
        kind: &OverrideKind,
        conditions: &ConditionSet,
        matches: impl Fn(&Override) -> bool,
    ) -> Option<&Override> {
        let mut best: Option<&Override> = None;
        for record in &self.overrides {
            if &record.kind != kind
                || !matches(record)
                || !conditions.allows(record.condition.as_deref())
            {
                continue;
            }
            if best.map_or(true, |b| record.priority > b.priority) {
                best = Some(record);
            }
        }
        best
    }

    fn remove_where(&mut self, doomed: impl Fn(&Override) -> bool) -> usize {
        let before = self.overrides.len();
        self.overrides.retain(|o| !doomed(o));
        before - self.overrides.len()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
