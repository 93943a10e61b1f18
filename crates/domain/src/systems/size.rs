//! Size: effective category and the fixed modifiers it implies.

use super::{ApplyReport, ContributingSystem};
use crate::character::{CharacterSnapshot, SizeChange};
use crate::effects::{
    namespace_of, targets, BonusType, Effect, EffectId, Override, OverrideKind, StatSession,
};
use crate::rules::RulesTable;
use crate::value_objects::{SizeCategory, SizeProfile};

const NAMESPACE: &str = "size";

/// Registers `size`-typed effects for the character's effective size.
///
/// Size changes that force a category become `SizeCategory` overrides and the
/// highest priority one wins. Only overrides in the `size` namespace count;
/// one registered by a feat or trait is ignored. Otherwise the base category is shifted by the
/// single most extreme change; changes never add up.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeSystem;

impl SizeSystem {
    pub fn new() -> Self {
        Self
    }

    /// Size profile for the character given the size overrides in the session.
    pub fn profile(character: &CharacterSnapshot, session: &StatSession) -> SizeProfile {
        let forced = session
            .overrides
            .get_size_overrides(session.conditions())
            .into_iter()
            .find(|(record, _)| namespace_of(&record.id) == NAMESPACE)
            .map(|(_, size)| size);
        let effective = forced
            .unwrap_or_else(|| character.size.shifted(most_extreme_shift(&character.size_changes)));
        SizeProfile::new(character.size, effective)
    }
}

/// Steps of the largest-magnitude shifting change; first one wins ties.
fn most_extreme_shift(changes: &[SizeChange]) -> i32 {
    changes
        .iter()
        .filter(|change| change.set.is_none())
        .fold(0, |best, change| {
            if change.steps.abs() > best.abs() {
                change.steps
            } else {
                best
            }
        })
}

fn forced_size(change: &SizeChange, size: SizeCategory) -> Override {
    Override::new(
        EffectId::derive(NAMESPACE, &change.id, "size").as_str(),
        OverrideKind::SizeCategory,
        "size",
        size.name(),
        change.source.as_str(),
    )
    .with_priority(change.priority)
}

impl ContributingSystem for SizeSystem {
    fn namespace(&self) -> &'static str {
        NAMESPACE
    }

    fn apply(
        &self,
        character: &CharacterSnapshot,
        session: &mut StatSession,
        _rules: &RulesTable,
    ) -> ApplyReport {
        let mut report = ApplyReport::new(NAMESPACE);
        report.cleared = session.clear_namespace(NAMESPACE);

        for change in &character.size_changes {
            if let Some(size) = change.set {
                session.overrides.add_override(forced_size(change, size));
                report.overrides += 1;
            }
        }

        let profile = Self::profile(character, session);
        let source = format!("Size ({})", profile.effective);
        let modifiers = [
            (targets::AC, profile.ac_attack_modifier),
            (targets::ATTACK, profile.ac_attack_modifier),
            (targets::CMB, profile.special_modifier),
            (targets::CMD, profile.special_modifier),
            ("skill.stealth", profile.stealth_modifier),
            ("skill.fly", profile.fly_modifier),
        ];

        for (target, value) in modifiers {
            if value == 0 {
                continue;
            }
            session.effects.add_effect(Effect::numeric(
                EffectId::derive(NAMESPACE, "category", target),
                target,
                BonusType::Size,
                value,
                source.as_str(),
            ));
            report.effects += 1;
        }

        tracing::debug!(
            base = %profile.base,
            effective = %profile.effective,
            "Size applied"
        );
        report
    }
}
