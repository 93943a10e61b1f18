//! Bonus type tags and their stacking classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The type tag carried by every numeric effect.
///
/// Unknown names are kept as [`BonusType::Other`] and treated as non-stacking.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BonusType {
    Alchemical,
    Armor,
    Circumstance,
    Competence,
    Deflection,
    Dodge,
    Enhancement,
    Inherent,
    Insight,
    Luck,
    Morale,
    NaturalArmor,
    Profane,
    Racial,
    Resistance,
    Sacred,
    Shield,
    Size,
    Trait,
    #[default]
    Untyped,
    Other(String),
}

impl BonusType {
    /// Whether same-type values sum instead of taking the highest.
    pub fn is_stacking(&self) -> bool {
        matches!(
            self,
            BonusType::Dodge | BonusType::Circumstance | BonusType::Untyped
        )
    }

    pub fn name(&self) -> &str {
        match self {
            BonusType::Alchemical => "alchemical",
            BonusType::Armor => "armor",
            BonusType::Circumstance => "circumstance",
            BonusType::Competence => "competence",
            BonusType::Deflection => "deflection",
            BonusType::Dodge => "dodge",
            BonusType::Enhancement => "enhancement",
            BonusType::Inherent => "inherent",
            BonusType::Insight => "insight",
            BonusType::Luck => "luck",
            BonusType::Morale => "morale",
            BonusType::NaturalArmor => "natural_armor",
            BonusType::Profane => "profane",
            BonusType::Racial => "racial",
            BonusType::Resistance => "resistance",
            BonusType::Sacred => "sacred",
            BonusType::Shield => "shield",
            BonusType::Size => "size",
            BonusType::Trait => "trait",
            BonusType::Untyped => "untyped",
            BonusType::Other(name) => name,
        }
    }

    /// Lowercase, with spaces and hyphens folded to underscores.
    fn normalize(raw: &str) -> String {
        raw.trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect()
    }
}

impl From<&str> for BonusType {
    fn from(raw: &str) -> Self {
        let normalized = Self::normalize(raw);
        match normalized.as_str() {
            "alchemical" => BonusType::Alchemical,
            "armor" => BonusType::Armor,
            "circumstance" => BonusType::Circumstance,
            "competence" => BonusType::Competence,
            "deflection" => BonusType::Deflection,
            "dodge" => BonusType::Dodge,
            "enhancement" => BonusType::Enhancement,
            "inherent" => BonusType::Inherent,
            "insight" => BonusType::Insight,
            "luck" => BonusType::Luck,
            "morale" => BonusType::Morale,
            "natural_armor" | "natural" => BonusType::NaturalArmor,
            "profane" => BonusType::Profane,
            "racial" => BonusType::Racial,
            "resistance" => BonusType::Resistance,
            "sacred" => BonusType::Sacred,
            "shield" => BonusType::Shield,
            "size" => BonusType::Size,
            "trait" => BonusType::Trait,
            "untyped" | "" => BonusType::Untyped,
            _ => BonusType::Other(normalized),
        }
    }
}

impl From<String> for BonusType {
    fn from(raw: String) -> Self {
        BonusType::from(raw.as_str())
    }
}

impl From<BonusType> for String {
    fn from(value: BonusType) -> Self {
        value.name().to_string()
    }
}

impl FromStr for BonusType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BonusType::from(s))
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dodge_circumstance_and_untyped_stack() {
        assert!(BonusType::Dodge.is_stacking());
        assert!(BonusType::Circumstance.is_stacking());
        assert!(BonusType::Untyped.is_stacking());
        assert!(!BonusType::Enhancement.is_stacking());
        assert!(!BonusType::Racial.is_stacking());
        assert!(!BonusType::Size.is_stacking());
    }

    #[test]
    fn default_is_untyped() {
        assert_eq!(BonusType::default(), BonusType::Untyped);
    }

    #[test]
    fn unknown_types_do_not_stack() {
        let bonus = BonusType::from("Mythic");
        assert_eq!(bonus, BonusType::Other("mythic".into()));
        assert!(!bonus.is_stacking());
    }

    #[test]
    fn parsing_is_forgiving() {
        assert_eq!(BonusType::from("Natural Armor"), BonusType::NaturalArmor);
        assert_eq!(BonusType::from("natural-armor"), BonusType::NaturalArmor);
        assert_eq!(BonusType::from(" DODGE "), BonusType::Dodge);
        assert_eq!(BonusType::from(""), BonusType::Untyped);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&BonusType::NaturalArmor).unwrap();
        assert_eq!(json, "\"natural_armor\"");
        let back: BonusType = serde_json::from_str("\"sacred\"").unwrap();
        assert_eq!(back, BonusType::Sacred);
    }
}
