//! Class levels and the base progressions derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Ability;

/// Base attack bonus progression of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BabProgression {
    /// Fighter, paladin, ranger, barbarian
    #[serde(alias = "fast")]
    Full,
    /// Cleric, rogue, bard and similar
    #[default]
    #[serde(alias = "medium")]
    ThreeQuarter,
    /// Wizard, sorcerer
    #[serde(alias = "slow")]
    Half,
}

impl BabProgression {
    pub fn at_level(&self, level: u32) -> i32 {
        let level = level as i32;
        match self {
            BabProgression::Full => level,
            BabProgression::ThreeQuarter => level * 3 / 4,
            BabProgression::Half => level / 2,
        }
    }
}

/// The three saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    Fortitude,
    Reflex,
    Will,
}

impl SaveType {
    pub const ALL: [SaveType; 3] = [SaveType::Fortitude, SaveType::Reflex, SaveType::Will];

    pub fn name(&self) -> &'static str {
        match self {
            SaveType::Fortitude => "Fortitude",
            SaveType::Reflex => "Reflex",
            SaveType::Will => "Will",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SaveType::Fortitude => "fortitude",
            SaveType::Reflex => "reflex",
            SaveType::Will => "will",
        }
    }

    pub fn ability(&self) -> Ability {
        match self {
            SaveType::Fortitude => Ability::Constitution,
            SaveType::Reflex => Ability::Dexterity,
            SaveType::Will => Ability::Wisdom,
        }
    }

    /// Base save for one class: good `2 + level/2`, poor `level/3`.
    pub fn base_for(level: u32, good: bool) -> i32 {
        let level = level as i32;
        if good {
            2 + level / 2
        } else {
            level / 3
        }
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Levels taken in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevel {
    pub name: String,
    pub level: u32,
    /// Die size for hit points (d6 → 6)
    pub hit_die: u32,
    #[serde(default)]
    pub bab: BabProgression,
    #[serde(default)]
    pub good_saves: Vec<SaveType>,
}

impl ClassLevel {
    pub fn new(name: impl Into<String>, level: u32, hit_die: u32) -> Self {
        Self {
            name: name.into(),
            level,
            hit_die,
            bab: BabProgression::default(),
            good_saves: Vec::new(),
        }
    }

    pub fn with_bab(mut self, bab: BabProgression) -> Self {
        self.bab = bab;
        self
    }

    pub fn with_good_saves(mut self, saves: &[SaveType]) -> Self {
        self.good_saves = saves.to_vec();
        self
    }

    pub fn base_attack_bonus(&self) -> i32 {
        self.bab.at_level(self.level)
    }

    pub fn base_save(&self, save: SaveType) -> i32 {
        SaveType::base_for(self.level, self.good_saves.contains(&save))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bab_progressions() {
        assert_eq!(BabProgression::Full.at_level(6), 6);
        assert_eq!(BabProgression::ThreeQuarter.at_level(6), 4);
        assert_eq!(BabProgression::ThreeQuarter.at_level(1), 0);
        assert_eq!(BabProgression::Half.at_level(7), 3);
    }

    #[test]
    fn base_saves() {
        let fighter = ClassLevel::new("Fighter", 5, 10).with_good_saves(&[SaveType::Fortitude]);
        assert_eq!(fighter.base_save(SaveType::Fortitude), 4);
        assert_eq!(fighter.base_save(SaveType::Reflex), 1);
        assert_eq!(fighter.base_save(SaveType::Will), 1);
    }

    #[test]
    fn bab_aliases_deserialize() {
        let class: ClassLevel =
            serde_json::from_str(r#"{"name": "Wizard", "level": 3, "hitDie": 6, "bab": "slow"}"#)
                .unwrap();
        assert_eq!(class.bab, BabProgression::Half);
        assert!(class.good_saves.is_empty());
    }
}
