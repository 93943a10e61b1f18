//! Effect definitions: the game-content records the engine is generic over.

use serde::{Deserialize, Serialize};

use crate::effects::{BonusType, EffectValue, OverrideKind};

/// Payload of a definition, tagged by `kind` so a value can never disagree
/// with its declared kind once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefinitionValue {
    Numeric { value: i32 },
    Boolean { value: bool },
    Override { value: String },
}

impl From<DefinitionValue> for EffectValue {
    fn from(value: DefinitionValue) -> Self {
        match value {
            DefinitionValue::Numeric { value } => EffectValue::Numeric(value),
            DefinitionValue::Boolean { value } => EffectValue::Boolean(value),
            DefinitionValue::Override { value } => EffectValue::Override(value),
        }
    }
}

/// One effect contributed by a named rule element.
///
/// ```json
/// { "kind": "numeric", "target": "ac", "type": "dodge", "value": 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDefinition {
    pub target: String,
    #[serde(rename = "type", default)]
    pub bonus_type: String,
    #[serde(flatten)]
    pub value: DefinitionValue,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl EffectDefinition {
    pub fn numeric(target: impl Into<String>, bonus_type: impl Into<String>, value: i32) -> Self {
        Self {
            target: target.into(),
            bonus_type: bonus_type.into(),
            value: DefinitionValue::Numeric { value },
            priority: 0,
            condition: None,
        }
    }

    pub fn boolean(target: impl Into<String>, value: bool) -> Self {
        Self {
            target: target.into(),
            bonus_type: String::new(),
            value: DefinitionValue::Boolean { value },
            priority: 0,
            condition: None,
        }
    }

    pub fn override_value(
        target: impl Into<String>,
        bonus_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            bonus_type: bonus_type.into(),
            value: DefinitionValue::Override {
                value: value.into(),
            },
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

    pub fn parsed_bonus_type(&self) -> BonusType {
        BonusType::from(self.bonus_type.as_str())
    }

    /// Override kind when this is an override definition aimed at the
    /// [`OverrideSystem`](crate::effects::OverrideSystem).
    pub fn override_kind(&self) -> Option<OverrideKind> {
        match self.value {
            DefinitionValue::Override { .. } => OverrideKind::recognize(&self.bonus_type),
            _ => None,
        }
    }
}
