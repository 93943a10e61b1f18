//! Size categories and their fixed modifier tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Creature size category, ordered from smallest to largest.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Fine,
    Diminutive,
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
}

const ORDERED: [SizeCategory; 9] = [
    SizeCategory::Fine,
    SizeCategory::Diminutive,
    SizeCategory::Tiny,
    SizeCategory::Small,
    SizeCategory::Medium,
    SizeCategory::Large,
    SizeCategory::Huge,
    SizeCategory::Gargantuan,
    SizeCategory::Colossal,
];

impl SizeCategory {
    fn index(&self) -> usize {
        match self {
            SizeCategory::Fine => 0,
            SizeCategory::Diminutive => 1,
            SizeCategory::Tiny => 2,
            SizeCategory::Small => 3,
            SizeCategory::Medium => 4,
            SizeCategory::Large => 5,
            SizeCategory::Huge => 6,
            SizeCategory::Gargantuan => 7,
            SizeCategory::Colossal => 8,
        }
    }

    /// Shift by a number of size steps, clamped to Fine..=Colossal.
    pub fn shifted(&self, steps: i32) -> SizeCategory {
        let index = (self.index() as i32 + steps).clamp(0, ORDERED.len() as i32 - 1);
        ORDERED[index as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeCategory::Fine => "fine",
            SizeCategory::Diminutive => "diminutive",
            SizeCategory::Tiny => "tiny",
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Huge => "huge",
            SizeCategory::Gargantuan => "gargantuan",
            SizeCategory::Colossal => "colossal",
        }
    }

    /// Modifier applied to AC and attack rolls.
    pub fn ac_attack_modifier(&self) -> i32 {
        [8, 4, 2, 1, 0, -1, -2, -4, -8][self.index()]
    }

    /// Special size modifier for CMB and CMD.
    pub fn special_modifier(&self) -> i32 {
        [-8, -4, -2, -1, 0, 1, 2, 4, 8][self.index()]
    }

    pub fn stealth_modifier(&self) -> i32 {
        [16, 12, 8, 4, 0, -4, -8, -12, -16][self.index()]
    }

    pub fn fly_modifier(&self) -> i32 {
        [8, 6, 4, 2, 0, -2, -4, -6, -8][self.index()]
    }

    /// Space occupied, in feet.
    pub fn space_ft(&self) -> f32 {
        [0.5, 1.0, 2.5, 5.0, 5.0, 10.0, 15.0, 20.0, 30.0][self.index()]
    }

    /// Natural reach for a tall creature, in feet.
    pub fn reach_ft(&self) -> u32 {
        [0, 0, 0, 5, 5, 10, 15, 20, 30][self.index()]
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizeCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ORDERED
            .iter()
            .copied()
            .find(|size| size.name() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown size category: {}", s)))
    }
}

/// Space, reach and the fixed modifiers derived from an effective size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeProfile {
    pub base: SizeCategory,
    pub effective: SizeCategory,
    pub ac_attack_modifier: i32,
    pub special_modifier: i32,
    pub stealth_modifier: i32,
    pub fly_modifier: i32,
    pub space_ft: f32,
    pub reach_ft: u32,
}

impl SizeProfile {
    pub fn new(base: SizeCategory, effective: SizeCategory) -> Self {
        Self {
            base,
            effective,
            ac_attack_modifier: effective.ac_attack_modifier(),
            special_modifier: effective.special_modifier(),
            stealth_modifier: effective.stealth_modifier(),
            fly_modifier: effective.fly_modifier(),
            space_ft: effective.space_ft(),
            reach_ft: effective.reach_ft(),
        }
    }
}

impl Default for SizeProfile {
    fn default() -> Self {
        Self::new(SizeCategory::Medium, SizeCategory::Medium)
    }
}
