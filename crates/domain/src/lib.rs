//! Pathsheet domain: bonus stacking, effect registration and the derived
//! character statistics of a Pathfinder-1e style ruleset.
//!
//! Everything here is synchronous and free of I/O. The engine crate feeds in
//! a [`CharacterSnapshot`] and a [`RulesTable`], applies the contributing
//! [`systems`] to a fresh [`StatSession`] and reads the result back through
//! [`CharacterStats`].

pub mod calculators;
pub mod character;
pub mod effects;
pub mod error;
pub mod ids;
pub mod rules;
pub mod systems;
pub mod value_objects;

pub use calculators::{AbilityBlock, ArmorClassSet, AttackProfile, CharacterStats};
pub use character::{
    AbpCacheData, AbpCategory, AbpNode, CharacterSnapshot, ClassFeatureSelection, ClassLevel,
    FavoredClassBonus, FavoredClassChoice, SaveType,
};
pub use effects::{
    BonusEngine, BonusEntry, BonusType, ConditionSet, Effect, EffectId, EffectRegistry,
    EffectValue, Override, OverrideKind, OverrideSystem, StatSession,
};
pub use error::DomainError;
pub use ids::CharacterId;
pub use rules::{EffectDefinition, RulesTable};
pub use systems::{
    AbpSystem, ApplyReport, ClassFeatureSystem, ContributingSystem, CorruptionSystem,
    FavoredClassSystem, FeatSystem, SizeSystem, TraitSystem,
};
pub use value_objects::{
    Ability, AbilityScores, CalculationSettings, SizeCategory, SkillBonusStacking,
    ValueWithBreakdown,
};
