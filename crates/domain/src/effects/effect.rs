//! Effect records and the active-condition set used to gate them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::BonusType;

/// Separator between the namespace and the rest of an effect id.
pub const NAMESPACE_SEPARATOR: char = '_';

/// Registry-unique effect identifier.
///
/// The text before the first `_` is the source namespace of the contributing
/// system that registered it (e.g. `feat_power-attack_attack.melee`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministic id for a definition contributed by one rule element.
    pub fn derive(namespace: &str, element_id: &str, target: &str) -> Self {
        Self(format!(
            "{namespace}{NAMESPACE_SEPARATOR}{element_id}{NAMESPACE_SEPARATOR}{target}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        namespace_of(&self.0)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EffectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EffectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Namespace portion of an id: everything before the first separator.
pub fn namespace_of(id: &str) -> &str {
    id.split(NAMESPACE_SEPARATOR).next().unwrap_or(id)
}

/// Strongly typed effect payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EffectValue {
    Numeric(i32),
    Boolean(bool),
    Override(String),
}

impl EffectValue {
    pub fn as_numeric(&self) -> Option<i32> {
        match self {
            EffectValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            EffectValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_override(&self) -> Option<&str> {
        match self {
            EffectValue::Override(v) => Some(v),
            _ => None,
        }
    }
}

/// A tagged contribution to a named target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: EffectId,
    /// Stat, ability or skill affected (e.g. `ability.strength`, `ac`, `save_all`)
    pub target: String,
    pub bonus_type: BonusType,
    pub value: EffectValue,
    /// Display name of the rule element that contributed it
    pub source: String,
    #[serde(default)]
    pub priority: i32,
    /// Only applies while this condition is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Effect {
    pub fn numeric(
        id: impl Into<EffectId>,
        target: impl Into<String>,
        bonus_type: BonusType,
        value: i32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            bonus_type,
            value: EffectValue::Numeric(value),
            source: source.into(),
            priority: 0,
            condition: None,
        }
    }

    pub fn boolean(
        id: impl Into<EffectId>,
        target: impl Into<String>,
        value: bool,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            bonus_type: BonusType::Untyped,
            value: EffectValue::Boolean(value),
            source: source.into(),
            priority: 0,
            condition: None,
        }
    }

    pub fn override_value(
        id: impl Into<EffectId>,
        target: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            bonus_type: BonusType::Untyped,
            value: EffectValue::Override(value.into()),
            source: source.into(),
            priority: 0,
            condition: None,
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

    /// Whether this effect applies under the given active conditions.
    pub fn is_active(&self, conditions: &ConditionSet) -> bool {
        conditions.allows(self.condition.as_deref())
    }
}

/// Conditions currently in force for a character (e.g. `against_traps`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(BTreeSet<String>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, condition: impl Into<String>) {
        self.0.insert(condition.into());
    }

    pub fn with(mut self, condition: impl Into<String>) -> Self {
        self.insert(condition);
        self
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.0.contains(condition)
    }

    /// Unconditional effects always pass; conditional ones need their condition.
    pub fn allows(&self, condition: Option<&str>) -> bool {
        condition.map(|c| self.contains(c)).unwrap_or(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
