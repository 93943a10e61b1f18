//! Corruptions and their manifestations.

use super::registration::{register_named, ElementSource, LevelContext};
use super::{ApplyReport, ContributingSystem};
use crate::character::CharacterSnapshot;
use crate::effects::StatSession;
use crate::rules::RulesTable;

const NAMESPACE: &str = "corruption";

/// Registers manifestation effects, gated by how far the owning corruption
/// has progressed. `manifestation_level_<n>+` conditions are checked against
/// the same count.
#[derive(Debug, Default, Clone, Copy)]
pub struct CorruptionSystem;

impl ContributingSystem for CorruptionSystem {
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

        for manifestation in &character.manifestations {
            let Some(corruption) = character.corruption(&manifestation.corruption_id) else {
                tracing::warn!(
                    manifestation = %manifestation.name,
                    corruption_id = %manifestation.corruption_id,
                    "Manifestation references an unknown corruption, skipping"
                );
                report.missing += 1;
                continue;
            };
            if manifestation.threshold > corruption.manifestation_level {
                report.gated += 1;
                continue;
            }

            let levels = LevelContext::for_character(character)
                .with("manifestation_level", corruption.manifestation_level);
            let element = ElementSource {
                namespace: NAMESPACE,
                element_id: &manifestation.id,
                name: &manifestation.name,
            };
            register_named(session, &mut report, rules, &element, &levels);
        }

        report
    }
}
