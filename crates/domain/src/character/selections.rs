//! Rule elements a character has selected, as they appear in a snapshot.

use serde::{Deserialize, Serialize};

use crate::value_objects::SizeCategory;

/// A feat, trait or ancestry trait picked by the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedElement {
    pub id: String,
    pub name: String,
    /// Character level at which the element becomes active
    #[serde(default)]
    pub level: u32,
}

impl SelectedElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 0,
        }
    }

    pub fn at_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}

/// A corruption and how far it has progressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorruptionSelection {
    pub id: String,
    pub name: String,
    /// Number of manifestations gained so far
    #[serde(default)]
    pub manifestation_level: u32,
}

/// A manifestation taken from a corruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationSelection {
    pub id: String,
    pub name: String,
    pub corruption_id: String,
    /// Manifestation level the corruption must reach first
    #[serde(default)]
    pub threshold: u32,
}

/// A class feature, either from the snapshot or from the data port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeatureSelection {
    pub id: String,
    pub name: String,
    /// Class granting the feature; gating uses that class's level when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub level: u32,
}

impl ClassFeatureSelection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_name: None,
            level,
        }
    }

    pub fn for_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// A selected ABP node, plus ordered sub-choices (abilities for prowess).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbpChoice {
    pub node_id: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// A size-changing effect active on the character (enlarge person, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeChange {
    pub id: String,
    pub source: String,
    /// Categories to grow (+) or shrink (-)
    #[serde(default)]
    pub steps: i32,
    /// Forces a category instead of shifting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<SizeCategory>,
    #[serde(default)]
    pub priority: i32,
}

/// Worn armor and shield as far as the calculators care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArmorLoadout {
    pub armor_bonus: i32,
    pub shield_bonus: i32,
    /// Dexterity cap imposed by armor; `None` when unarmored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dex: Option<i32>,
    /// Penalty as a positive or negative number; applied as negative
    pub armor_check_penalty: i32,
}

/// Combat toggles that change attack calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatOptions {
    pub power_attack: bool,
    pub deadly_aim: bool,
    pub rapid_shot: bool,
    pub two_weapon_fighting: bool,
    /// Weapon in hand, checked against weapon finesse overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_weapon: Option<String>,
}
