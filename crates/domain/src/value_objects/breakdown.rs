//! ValueWithBreakdown - the output shape for every derived statistic.

use serde::{Deserialize, Serialize};

use crate::effects::BonusType;
use crate::value_objects::Ability;

/// One contributing line of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownModifier {
    /// Where the value came from (e.g., "Power Attack", "DEX", "Ranks")
    pub source: String,
    pub value: i32,
    /// Bonus type when the value went through stacking resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_type: Option<BonusType>,
}

impl BreakdownModifier {
    pub fn new(source: impl Into<String>, value: i32) -> Self {
        Self {
            source: source.into(),
            value,
            bonus_type: None,
        }
    }

    pub fn typed(source: impl Into<String>, value: i32, bonus_type: BonusType) -> Self {
        Self {
            source: source.into(),
            value,
            bonus_type: Some(bonus_type),
        }
    }
}

/// Non-additive adjustments that shaped a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownOverrides {
    /// The stat could not be used (trained-only skill with no ranks)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trained_only: bool,
    /// Ability substituted for the default key ability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<Ability>,
}

impl BreakdownOverrides {
    pub fn is_empty(&self) -> bool {
        !self.trained_only && self.ability.is_none()
    }
}

/// A final value together with the ordered list of modifiers that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueWithBreakdown {
    pub label: String,
    pub total: i32,
    pub modifiers: Vec<BreakdownModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BreakdownOverrides>,
}

impl ValueWithBreakdown {
    /// Empty result: total 0, no modifiers.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            total: 0,
            modifiers: Vec::new(),
            overrides: None,
        }
    }

    /// Build a result whose total is the plain sum of the given modifiers.
    pub fn summed(label: impl Into<String>, modifiers: Vec<BreakdownModifier>) -> Self {
        let total = modifiers.iter().map(|m| m.value).sum();
        Self {
            label: label.into(),
            total,
            modifiers,
            overrides: None,
        }
    }

    /// Append a modifier and fold it into the total.
    pub fn push(&mut self, modifier: BreakdownModifier) {
        self.total += modifier.value;
        self.modifiers.push(modifier);
    }

    /// Append an untyped line.
    pub fn add(&mut self, source: impl Into<String>, value: i32) {
        self.push(BreakdownModifier::new(source, value));
    }

    /// Append every line of another breakdown.
    pub fn absorb(&mut self, other: ValueWithBreakdown) {
        for modifier in other.modifiers {
            self.push(modifier);
        }
    }

    pub fn with_overrides(mut self, overrides: BreakdownOverrides) -> Self {
        self.overrides = if overrides.is_empty() {
            None
        } else {
            Some(overrides)
        };
        self
    }

    /// Whether the stat was blocked by the trained-only rule.
    pub fn is_trained_only_blocked(&self) -> bool {
        self.overrides
            .as_ref()
            .map(|o| o.trained_only)
            .unwrap_or(false)
    }
}

/// Format a modifier with an explicit sign.
pub fn format_signed(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_total_in_sync() {
        let mut value = ValueWithBreakdown::new("Climb");
        value.add("STR", 4);
        value.add("Ranks", 2);
        value.add("Armor check penalty", -1);
        assert_eq!(value.total, 5);
        assert_eq!(value.modifiers.len(), 3);
        assert_eq!(value.modifiers[2].source, "Armor check penalty");
    }

    #[test]
    fn empty_overrides_are_dropped() {
        let value =
            ValueWithBreakdown::new("Perception").with_overrides(BreakdownOverrides::default());
        assert!(value.overrides.is_none());
        assert!(!value.is_trained_only_blocked());
    }

    #[test]
    fn signed_formatting() {
        assert_eq!(format_signed(0), "+0");
        assert_eq!(format_signed(7), "+7");
        assert_eq!(format_signed(-3), "-3");
    }

    #[test]
    fn serializes_trained_only_flag_in_camel_case() {
        let value = ValueWithBreakdown::new("Disable Device").with_overrides(BreakdownOverrides {
            trained_only: true,
            ability: None,
        });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["overrides"]["trainedOnly"], serde_json::json!(true));
        assert_eq!(json["total"], serde_json::json!(0));
    }
}
