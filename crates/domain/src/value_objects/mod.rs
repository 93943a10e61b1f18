//! Value objects - Immutable objects defined by their attributes

mod ability;
mod breakdown;
mod settings;
mod size;

pub use ability::{ability_modifier, Ability, AbilityScores};
pub use breakdown::{format_signed, BreakdownModifier, BreakdownOverrides, ValueWithBreakdown};
pub use settings::{CalculationSettings, SkillBonusStacking};
pub use size::{SizeCategory, SizeProfile};
