//! Plain records returned by the data-access boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effects::{targets, BonusType};

/// Automatic Bonus Progression category of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AbpCategory {
    ArmorAttunement,
    ShieldAttunement,
    Resistance,
    Deflection,
    Toughening,
    MentalProwess,
    PhysicalProwess,
    WeaponAttunement,
    Other(String),
}

/// Formula parameters `(offset, starting level)` for the scaling categories.
const ARMOR_FORMULA: (i32, u32) = (1, 3);
const SHIELD_FORMULA: (i32, u32) = (2, 4);
const RESISTANCE_FORMULA: (i32, u32) = (3, 5);

/// `floor((level - offset) / 4) + 1`, or 0 before the starting level.
pub fn abp_progression(level: u32, offset: i32, starting_level: u32) -> i32 {
    if level < starting_level {
        return 0;
    }
    (level as i32 - offset).div_euclid(4) + 1
}

impl AbpCategory {
    pub fn name(&self) -> &str {
        match self {
            AbpCategory::ArmorAttunement => "armor_attunement",
            AbpCategory::ShieldAttunement => "shield_attunement",
            AbpCategory::Resistance => "resistance",
            AbpCategory::Deflection => "deflection",
            AbpCategory::Toughening => "toughening",
            AbpCategory::MentalProwess => "mental_prowess",
            AbpCategory::PhysicalProwess => "physical_prowess",
            AbpCategory::WeaponAttunement => "weapon_attunement",
            AbpCategory::Other(name) => name,
        }
    }

    /// Level-scaled magnitude for formula categories; `None` when the node's
    /// own value applies.
    pub fn scaled_bonus(&self, level: u32) -> Option<i32> {
        let (offset, start) = match self {
            AbpCategory::ArmorAttunement => ARMOR_FORMULA,
            AbpCategory::ShieldAttunement => SHIELD_FORMULA,
            AbpCategory::Resistance => RESISTANCE_FORMULA,
            _ => return None,
        };
        Some(abp_progression(level, offset, start))
    }

    /// Fixed target, or `None` for prowess (ability picked per character)
    /// and unknown categories.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            AbpCategory::ArmorAttunement => Some(targets::AC_ARMOR),
            AbpCategory::ShieldAttunement => Some(targets::AC_SHIELD),
            AbpCategory::Resistance => Some(targets::SAVE_ALL),
            AbpCategory::Deflection => Some(targets::AC),
            AbpCategory::Toughening => Some(targets::AC_NATURAL),
            AbpCategory::WeaponAttunement => Some(targets::ATTACK),
            _ => None,
        }
    }

    pub fn bonus_type(&self) -> BonusType {
        match self {
            AbpCategory::Resistance => BonusType::Resistance,
            AbpCategory::Deflection => BonusType::Deflection,
            _ => BonusType::Enhancement,
        }
    }

    pub fn is_prowess(&self) -> bool {
        matches!(self, AbpCategory::MentalProwess | AbpCategory::PhysicalProwess)
    }
}

impl From<String> for AbpCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "armor_attunement" | "armor" => AbpCategory::ArmorAttunement,
            "shield_attunement" | "shield" => AbpCategory::ShieldAttunement,
            "resistance" => AbpCategory::Resistance,
            "deflection" => AbpCategory::Deflection,
            "toughening" => AbpCategory::Toughening,
            "mental_prowess" => AbpCategory::MentalProwess,
            "physical_prowess" => AbpCategory::PhysicalProwess,
            "weapon_attunement" => AbpCategory::WeaponAttunement,
            _ => AbpCategory::Other(value),
        }
    }
}

impl From<AbpCategory> for String {
    fn from(value: AbpCategory) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for AbpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of the ABP table available at some level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbpNode {
    pub id: String,
    pub name: String,
    pub category: AbpCategory,
    /// Level at which the node unlocks
    pub level: u32,
    #[serde(default)]
    pub value: i32,
    /// Counts only when the character picked it
    #[serde(default)]
    pub is_choice: bool,
    /// Mutually exclusive group shared with choice nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// `first`/`second`/`third` or an ability name, for prowess nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    /// Target for categories with no fixed target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// All ABP nodes unlocked at a character level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbpCacheData {
    pub level: u32,
    #[serde(default)]
    pub nodes: Vec<AbpNode>,
}

/// What a favored class bonus was spent on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FavoredClassChoice {
    HitPoint,
    SkillRank,
    /// Alternate racial option, resolved through the rules table
    Named(String),
}

impl From<String> for FavoredClassChoice {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hp" | "hit_point" | "hitpoint" => FavoredClassChoice::HitPoint,
            "skill" | "skill_rank" | "skillrank" => FavoredClassChoice::SkillRank,
            _ => FavoredClassChoice::Named(value),
        }
    }
}

impl From<FavoredClassChoice> for String {
    fn from(value: FavoredClassChoice) -> Self {
        match value {
            FavoredClassChoice::HitPoint => "hp".to_string(),
            FavoredClassChoice::SkillRank => "skill".to_string(),
            FavoredClassChoice::Named(name) => name,
        }
    }
}

/// One favored class bonus taken at a class level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoredClassBonus {
    pub class_name: String,
    pub level: u32,
    pub choice: FavoredClassChoice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_attunement_thresholds() {
        let armor = AbpCategory::ArmorAttunement;
        assert_eq!(armor.scaled_bonus(2), Some(0));
        assert_eq!(armor.scaled_bonus(3), Some(1));
        assert_eq!(armor.scaled_bonus(7), Some(2));
        assert_eq!(armor.scaled_bonus(20), Some(5));
    }

    #[test]
    fn shield_and_resistance_start_later() {
        assert_eq!(AbpCategory::ShieldAttunement.scaled_bonus(3), Some(0));
        assert_eq!(AbpCategory::ShieldAttunement.scaled_bonus(4), Some(1));
        assert_eq!(AbpCategory::Resistance.scaled_bonus(4), Some(0));
        assert_eq!(AbpCategory::Resistance.scaled_bonus(5), Some(1));
        assert_eq!(AbpCategory::Resistance.scaled_bonus(11), Some(3));
        assert_eq!(AbpCategory::Deflection.scaled_bonus(10), None);
    }

    #[test]
    fn categories_parse_loosely() {
        assert_eq!(AbpCategory::from("Mental Prowess".to_string()), AbpCategory::MentalProwess);
        assert_eq!(
            AbpCategory::from("legendary_gifts".to_string()),
            AbpCategory::Other("legendary_gifts".to_string())
        );
    }

    #[test]
    fn favored_class_choices() {
        let bonus: FavoredClassBonus = serde_json::from_str(
            r#"{"className": "Rogue", "level": 2, "choice": "hp"}"#,
        )
        .unwrap();
        assert_eq!(bonus.choice, FavoredClassChoice::HitPoint);
        assert_eq!(
            FavoredClassChoice::from("Elf Wizard Arcane Bond".to_string()),
            FavoredClassChoice::Named("Elf Wizard Arcane Bond".to_string())
        );
    }
}
