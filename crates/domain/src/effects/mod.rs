//! Effect registration and bonus stacking.
//!
//! ```text
//! [ Contributing systems ] --register--> [ StatSession: EffectRegistry + OverrideSystem ]
//!                                                   |
//!                                                   v
//!                          [ Calculators ] --entries--> [ BonusEngine::resolve ]
//! ```

mod bonus_engine;
mod bonus_type;
mod effect;
mod overrides;
mod registry;
mod session;

pub use bonus_engine::{BonusEngine, BonusEntry};
pub use bonus_type::BonusType;
pub use effect::{namespace_of, ConditionSet, Effect, EffectId, EffectValue, NAMESPACE_SEPARATOR};
pub use overrides::{Override, OverrideKind, OverrideSystem, ALL_WEAPONS};
pub use registry::EffectRegistry;
pub use session::StatSession;

/// Well-known effect targets read by the calculators.
pub mod targets {
    pub const AC: &str = "ac";
    pub const AC_ARMOR: &str = "ac.armor";
    pub const AC_SHIELD: &str = "ac.shield";
    pub const AC_NATURAL: &str = "ac.natural";
    pub const ATTACK: &str = "attack";
    pub const ATTACK_MELEE: &str = "attack.melee";
    pub const ATTACK_RANGED: &str = "attack.ranged";
    pub const CMB: &str = "cmb";
    pub const CMD: &str = "cmd";
    pub const SAVE_ALL: &str = "save_all";
    pub const SAVE_DC: &str = "save_dc";
    pub const HP_MAX: &str = "hp_max";
    pub const SKILL_RANKS: &str = "skill_ranks";
    pub const UNTRAINED_ALL: &str = "skill.untrained_all";

    /// Target for bonuses to one skill (`skill.stealth`).
    pub fn skill(skill_id: &str) -> String {
        format!("skill.{skill_id}")
    }

    /// Boolean target permitting untrained use for a skill category.
    pub fn untrained_category(category: &str) -> String {
        format!("skill.untrained_{category}")
    }

    /// Target for one saving throw (`save_fortitude`).
    pub fn save(save_type: &str) -> String {
        format!("save_{save_type}")
    }
}
