//! Character traits and ancestry (racial) traits.

use super::registration::{register_named, ElementSource, LevelContext};
use super::{ApplyReport, ContributingSystem};
use crate::character::{CharacterSnapshot, SelectedElement};
use crate::effects::StatSession;
use crate::rules::RulesTable;

const NAMESPACE: &str = "trait";
const ANCESTRY_NAMESPACE: &str = "ancestry";

/// Registers traits under `trait` and ancestry traits under `ancestry`.
///
/// Racial bonuses from ancestry traits are ordinary registry effects; how they
/// combine is left to the calculators' stacking rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraitSystem;

impl TraitSystem {
    fn register_all(
        namespace: &'static str,
        elements: &[SelectedElement],
        character: &CharacterSnapshot,
        session: &mut StatSession,
        rules: &RulesTable,
        report: &mut ApplyReport,
    ) {
        let levels = LevelContext::for_character(character);
        let level = character.level();

        for element in elements {
            if element.level > level {
                report.gated += 1;
                continue;
            }
            let source = ElementSource {
                namespace,
                element_id: &element.id,
                name: &element.name,
            };
            register_named(session, report, rules, &source, &levels);
        }
    }
}

impl ContributingSystem for TraitSystem {
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
        report.cleared =
            session.clear_namespace(NAMESPACE) + session.clear_namespace(ANCESTRY_NAMESPACE);

        Self::register_all(
            NAMESPACE,
            &character.traits,
            character,
            session,
            rules,
            &mut report,
        );
        Self::register_all(
            ANCESTRY_NAMESPACE,
            &character.ancestry_traits,
            character,
            session,
            rules,
            &mut report,
        );

        report
    }
}
