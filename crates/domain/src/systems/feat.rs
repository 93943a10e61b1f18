//! Feats.

use super::registration::{register_named, ElementSource, LevelContext};
use super::{ApplyReport, ContributingSystem};
use crate::character::CharacterSnapshot;
use crate::effects::StatSession;
use crate::rules::RulesTable;

const NAMESPACE: &str = "feat";

/// Registers the rules-table effects of every feat the character has reached
/// the level for.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatSystem;

impl ContributingSystem for FeatSystem {
    fn namespace(&self) -> &'static str {
        NAMESPACE
    }

    fn apply(
        &self,
        character: &CharacterSnapshot,
        session: &mut StatSession,
        rules: &RulesTable,
    ) -> ApplyReport {
        let mut report = ApplyReport::new(NAMESPACE);
        report.cleared = session.clear_namespace(NAMESPACE);

        let levels = LevelContext::for_character(character);
        let level = character.level();

        for feat in &character.feats {
            if feat.level > level {
                report.gated += 1;
                continue;
            }
            let element = ElementSource {
                namespace: NAMESPACE,
                element_id: &feat.id,
                name: &feat.name,
            };
            register_named(session, &mut report, rules, &element, &levels);
        }

        report
    }
}
