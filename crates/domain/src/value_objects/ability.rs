//! Ability scores and modifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Lowercase full name, used in effect targets.
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// Effect target for bonuses to this ability score (`ability.strength`).
    pub fn target(&self) -> String {
        format!("ability.{}", self.name())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("ability.").unwrap_or(&normalized);
        match normalized {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// Modifier for an ability score: floor((score - 10) / 2).
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Raw ability scores as supplied by the character snapshot.
///
/// Stored as a map so that a snapshot missing a score deserializes cleanly and
/// is rejected later by validation with a precise error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScores(BTreeMap<Ability, i32>);

impl AbilityScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a full set of scores in STR, DEX, CON, INT, WIS, CHA order.
    pub fn from_array(scores: [i32; 6]) -> Self {
        Self(Ability::ALL.iter().copied().zip(scores).collect())
    }

    pub fn with(mut self, ability: Ability, score: i32) -> Self {
        self.0.insert(ability, score);
        self
    }

    pub fn get(&self, ability: Ability) -> Option<i32> {
        self.0.get(&ability).copied()
    }

    /// Score for an ability, failing when the snapshot omitted it.
    pub fn require(&self, ability: Ability) -> Result<i32, DomainError> {
        self.get(ability)
            .ok_or(DomainError::MissingAbilityScore(ability))
    }

    /// Ensure all six scores are present.
    pub fn validate(&self) -> Result<(), DomainError> {
        for ability in Ability::ALL {
            self.require(ability)?;
        }
        Ok(())
    }
}
