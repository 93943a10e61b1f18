//! Calculation settings value object
//!
//! Settings toggle optional rules for one computation. They carry serde derives
//! because the engine loads them from the environment and callers may pass them
//! through as JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How skill effect bonuses are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillBonusStacking {
    /// Every registered effect and misc bonus is summed (saves still stack by type)
    #[default]
    Sum,
    /// Effect and misc bonuses go through the same type-based stacking as saves
    ByType,
}

impl fmt::Display for SkillBonusStacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::ByType => write!(f, "by_type"),
        }
    }
}

impl FromStr for SkillBonusStacking {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "by_type" | "bytype" | "by-type" => Ok(Self::ByType),
            _ => Err(DomainError::parse(format!("Unknown skill stacking mode: {}", s))),
        }
    }
}

/// Optional-rule toggles for a character computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSettings {
    /// Automatic Bonus Progression variant rule
    #[serde(default = "default_abp_enabled")]
    pub abp_enabled: bool,

    #[serde(default)]
    pub skill_bonus_stacking: SkillBonusStacking,

    /// Flat bonus for a class skill with at least one rank
    #[serde(default = "default_class_skill_bonus")]
    pub class_skill_bonus: i32,
}

fn default_abp_enabled() -> bool { true }
fn default_class_skill_bonus() -> i32 { 3 }

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            abp_enabled: default_abp_enabled(),
            skill_bonus_stacking: SkillBonusStacking::default(),
            class_skill_bonus: default_class_skill_bonus(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: CalculationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, CalculationSettings::default());
        assert!(settings.abp_enabled);
        assert_eq!(settings.class_skill_bonus, 3);
    }

    #[test]
    fn stacking_mode_parses() {
        assert_eq!("by_type".parse::<SkillBonusStacking>().unwrap(), SkillBonusStacking::ByType);
        assert_eq!("SUM".parse::<SkillBonusStacking>().unwrap(), SkillBonusStacking::Sum);
        assert!("highest".parse::<SkillBonusStacking>().is_err());
    }
}
