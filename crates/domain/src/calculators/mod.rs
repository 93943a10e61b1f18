//! Derived calculators: read a fully applied [`StatSession`] and produce
//! [`ValueWithBreakdown`] results.
//!
//! [`StatSession`]: crate::effects::StatSession
//! [`ValueWithBreakdown`]: crate::value_objects::ValueWithBreakdown

mod ability;
mod combat;
mod hit_points;
mod saving_throw;
mod skill;
mod stats;

pub use ability::{AbilityBlock, AbilityStat};
pub use combat::{
    attack_string, iterative_attacks, power_attack_penalty, ArmorClassSet, AttackProfile,
    CombatBuilder,
};
pub use hit_points::{average_roll, maximum_hit_points};
pub use saving_throw::SavingThrowEngine;
pub use skill::{
    applies_armor_check_penalty, find_skill, SkillCheck, SkillDefinition, SkillEngine,
    ARMOR_CHECK_SKILLS, SKILLS,
};
pub use stats::CharacterStats;
