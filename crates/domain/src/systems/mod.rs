//! Contributing systems: turn a character's selections into effects.
//!
//! Each system owns one id namespace. Applying a system first clears its
//! namespace, so reapplying to the same session replaces rather than
//! accumulates. Systems must run in the order Size, ABP, Feat, Trait,
//! ClassFeature, Corruption, FavoredClass.

mod abp;
mod class_feature;
mod corruption;
mod favored_class;
mod feat;
mod registration;
mod size;
mod traits;

use std::fmt;

pub use abp::AbpSystem;
pub use class_feature::ClassFeatureSystem;
pub use corruption::CorruptionSystem;
pub use favored_class::FavoredClassSystem;
pub use feat::FeatSystem;
pub use registration::{parse_level_condition, LevelContext};
pub use size::SizeSystem;
pub use traits::TraitSystem;

use crate::character::CharacterSnapshot;
use crate::effects::StatSession;
use crate::rules::RulesTable;

/// A source of effects for one kind of rule element.
pub trait ContributingSystem: Send + Sync {
    /// Id namespace this system registers under (no `_` allowed).
    fn namespace(&self) -> &'static str;

    /// Clear previous contributions, then register this system's effects.
    fn apply(
        &self,
        character: &CharacterSnapshot,
        session: &mut StatSession,
        rules: &RulesTable,
    ) -> ApplyReport;
}

/// What one system application did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub namespace: &'static str,
    /// Records dropped by the clear-before-apply step
    pub cleared: usize,
    pub effects: usize,
    pub overrides: usize,
    /// Elements or definitions skipped by level, threshold or choice gating
    pub gated: usize,
    /// Elements with no rules-table entry
    pub missing: usize,
}

impl ApplyReport {
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            ..Self::default()
        }
    }

    pub fn registered(&self) -> usize {
        self.effects + self.overrides
    }

    /// Fold another report for the same system into this one.
    pub fn merge(&mut self, other: ApplyReport) {
        self.cleared += other.cleared;
        self.effects += other.effects;
        self.overrides += other.overrides;
        self.gated += other.gated;
        self.missing += other.missing;
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} effects, {} overrides, {} gated, {} missing",
            self.namespace, self.effects, self.overrides, self.gated, self.missing
        )
    }
}
