//! Favored class bonuses.

use super::registration::{register_named, ElementSource, LevelContext};
use super::{ApplyReport, ContributingSystem};
use crate::character::{CharacterSnapshot, FavoredClassBonus, FavoredClassChoice};
use crate::effects::{targets, BonusType, Effect, EffectId, StatSession};
use crate::rules::{normalize_name, RulesTable};

const NAMESPACE: &str = "fcb";

/// Registers one effect per favored class bonus: +1 hit point, +1 skill rank,
/// or the rules-table effects of an alternate option.
#[derive(Debug, Clone, Default)]
pub struct FavoredClassSystem {
    bonuses: Vec<FavoredClassBonus>,
}

impl FavoredClassSystem {
    pub fn new(bonuses: Vec<FavoredClassBonus>) -> Self {
        Self { bonuses }
    }
}

impl ContributingSystem for FavoredClassSystem {
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

        for bonus in &self.bonuses {
            let class_level = character.class_level(&bonus.class_name);
            if bonus.level == 0 || bonus.level > class_level {
                report.gated += 1;
                continue;
            }

            let element_id = format!("{}-{}", normalize_name(&bonus.class_name), bonus.level);
            let source = format!("Favored class ({})", bonus.class_name);
            let target = match &bonus.choice {
                FavoredClassChoice::HitPoint => targets::HP_MAX,
                FavoredClassChoice::SkillRank => targets::SKILL_RANKS,
                FavoredClassChoice::Named(option) => {
                    let levels = LevelContext::for_character(character)
                        .with("class_level", class_level);
                    let element = ElementSource {
                        namespace: NAMESPACE,
                        element_id: &element_id,
                        name: option,
                    };
                    register_named(session, &mut report, rules, &element, &levels);
                    continue;
                }
            };

            session.effects.add_effect(Effect::numeric(
                EffectId::derive(NAMESPACE, &element_id, target),
                target,
                BonusType::Untyped,
                1,
                source,
            ));
            report.effects += 1;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ClassLevel;
    use crate::effects::BonusEngine;
    use crate::rules::EffectDefinition;
    use crate::value_objects::AbilityScores;

    fn bonus(level: u32, choice: &str) -> FavoredClassBonus {
        FavoredClassBonus {
            class_name: "Rogue".to_string(),
            level,
            choice: FavoredClassChoice::from(choice.to_string()),
        }
    }

    #[test]
    fn hit_points_and_skill_ranks_stack() {
        let mut character = CharacterSnapshot::new("Test", AbilityScores::from_array([10; 6]));
        character.classes = vec![ClassLevel::new("Rogue", 3, 8)];
        let system = FavoredClassSystem::new(vec![
            bonus(1, "hp"),
            bonus(2, "hp"),
            bonus(3, "skill"),
            bonus(4, "hp"),
        ]);

        let mut session = StatSession::default();
        let report = system.apply(&character, &mut session, &RulesTable::new());
        assert_eq!(report.effects, 3);
        assert_eq!(report.gated, 1);
        assert_eq!(
            BonusEngine::resolve("HP", &session.entries(targets::HP_MAX)).total,
            2
        );
        assert_eq!(session.entries(targets::SKILL_RANKS).len(), 1);
    }

    #[test]
    fn named_options_use_rules_table() {
        let rules = RulesTable::new().with(
            "Halfling Rogue Trap Bonus",
            vec![EffectDefinition::numeric("skill.disable_device", "untyped", 1)],
        );
        let mut character = CharacterSnapshot::new("Test", AbilityScores::from_array([10; 6]));
        character.classes = vec![ClassLevel::new("Rogue", 1, 8)];
        let system = FavoredClassSystem::new(vec![bonus(1, "Halfling Rogue Trap Bonus")]);

        let mut session = StatSession::default();
        system.apply(&character, &mut session, &rules);
        assert!(session
            .effects
            .get(&EffectId::new("fcb_rogue-1_skill.disable_device"))
            .is_some());
    }
}
