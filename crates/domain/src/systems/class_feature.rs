//! Class features.

use std::collections::HashSet;

use super::registration::{register_named, ElementSource, LevelContext};
use super::{ApplyReport, ContributingSystem};
use crate::character::{CharacterSnapshot, ClassFeatureSelection};
use crate::effects::StatSession;
use crate::rules::RulesTable;

const NAMESPACE: &str = "classfeature";

/// Registers class feature effects.
///
/// Features come from the data port (already processed for the character's
/// level) and from the snapshot; a snapshot feature whose id the port
/// already returned is ignored.
#[derive(Debug, Clone, Default)]
pub struct ClassFeatureSystem {
    processed: Vec<ClassFeatureSelection>,
}

impl ClassFeatureSystem {
    pub fn new(processed: Vec<ClassFeatureSelection>) -> Self {
        Self { processed }
    }

    fn features<'a>(&'a self, character: &'a CharacterSnapshot) -> Vec<&'a ClassFeatureSelection> {
        let mut seen = HashSet::new();
        let mut features = Vec::new();
        for feature in self.processed.iter().chain(&character.class_features) {
            if seen.insert(feature.id.as_str()) {
                features.push(feature);
            }
        }
        features
    }
}

impl ContributingSystem for ClassFeatureSystem {
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

        for feature in self.features(character) {
            let class_level = feature
                .class_name
                .as_deref()
                .map(|class| character.class_level(class))
                .unwrap_or_else(|| character.level());
            if feature.level > class_level {
                report.gated += 1;
                continue;
            }

            let levels = LevelContext::for_character(character).with("class_level", class_level);
            let element = ElementSource {
                namespace: NAMESPACE,
                element_id: &feature.id,
                name: &feature.name,
            };
            register_named(session, &mut report, rules, &element, &levels);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ClassLevel;
    use crate::effects::{BonusEngine, ConditionSet};
    use crate::rules::EffectDefinition;
    use crate::value_objects::{Ability, AbilityScores};

    fn multiclass() -> CharacterSnapshot {
        let mut character = CharacterSnapshot::new("Test", AbilityScores::from_array([10; 6]));
        character.classes = vec![
            ClassLevel::new("Rogue", 3, 8),
            ClassLevel::new("Fighter", 4, 10),
        ];
        character
    }

    #[test]
    fn gates_by_owning_class_level() {
        let rules = RulesTable::new()
            .with(
                "Trap Sense",
                vec![
                    EffectDefinition::numeric("save_reflex", "untyped", 1),
                    EffectDefinition::numeric("save_reflex", "untyped", 1)
                        .with_condition("class_level_6+"),
                ],
            )
            .with(
                "Armor Training",
                vec![EffectDefinition::numeric("ac.armor", "untyped", 1)],
            );
        let system = ClassFeatureSystem::new(vec![
            ClassFeatureSelection::new("trap-sense", "Trap Sense", 3).for_class("Rogue"),
            ClassFeatureSelection::new("armor-training", "Armor Training", 5).for_class("Fighter"),
        ]);

        let mut session = StatSession::default();
        let report = system.apply(&multiclass(), &mut session, &rules);

        assert_eq!(report.effects, 1);
        // one feature gated by fighter level, one definition by rogue level
        assert_eq!(report.gated, 2);
        assert_eq!(
            BonusEngine::resolve("Reflex", &session.entries("save_reflex")).total,
            1
        );
    }

    #[test]
    fn port_features_shadow_snapshot_duplicates() {
        let rules = RulesTable::new().with(
            "Rage Power: Intimidating Glare",
            vec![EffectDefinition::override_value(
                "skill.intimidate",
                "ability_for_skill",
                "strength",
            )],
        );
        let mut character = multiclass();
        character.class_features.push(ClassFeatureSelection::new(
            "glare",
            "Rage Power: Intimidating Glare",
            1,
        ));
        let system = ClassFeatureSystem::new(vec![ClassFeatureSelection::new(
            "glare",
            "Rage Power: Intimidating Glare",
            1,
        )]);

        let mut session = StatSession::default();
        let report = system.apply(&character, &mut session, &rules);
        assert_eq!(report.overrides, 1);
        assert_eq!(
            session
                .overrides
                .get_ability_override_for_skill("intimidate", &ConditionSet::new()),
            Some(Ability::Strength)
        );
    }
}
