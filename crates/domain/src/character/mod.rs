//! Character snapshot and the plain records that accompany it.

mod lookups;
mod progression;
mod selections;
mod snapshot;

pub use lookups::{
    abp_progression, AbpCacheData, AbpCategory, AbpNode, FavoredClassBonus, FavoredClassChoice,
};
pub use progression::{BabProgression, ClassLevel, SaveType};
pub use selections::{
    AbpChoice, ArmorLoadout, ClassFeatureSelection, CombatOptions, CorruptionSelection,
    ManifestationSelection, SelectedElement, SizeChange,
};
pub use snapshot::CharacterSnapshot;
