//! Character stats use case.
//!
//! Runs every contributing system against a fresh [`StatSession`] in a fixed
//! order, then reads the derived statistics back out of it.

mod error;

pub use error::CharacterStatsError;

use std::sync::Arc;

use pathsheet_domain::{
    AbpCacheData, AbpSystem, ApplyReport, CalculationSettings, CharacterSnapshot, CharacterStats,
    ClassFeatureSystem, ContributingSystem, CorruptionSystem, FavoredClassSystem, FeatSystem,
    RulesTable, SizeSystem, StatSession, TraitSystem,
};

use crate::infrastructure::ports::CharacterDataPort;

/// Result of computing a character's stats.
#[derive(Debug, Clone)]
pub struct CharacterStatsResult {
    pub stats: CharacterStats,
    /// One report per system, in application order.
    pub reports: Vec<ApplyReport>,
}

impl CharacterStatsResult {
    /// Rule elements that had no rules table entry, across all systems.
    pub fn missing_elements(&self) -> usize {
        self.reports.iter().map(|report| report.missing).sum()
    }
}

/// Computes derived stats for character snapshots.
///
/// Holds no per-character state, so one instance can serve many tasks.
pub struct CharacterStatsUseCase {
    data: Arc<dyn CharacterDataPort>,
    rules: Arc<RulesTable>,
    settings: CalculationSettings,
}

impl CharacterStatsUseCase {
    pub fn new(
        data: Arc<dyn CharacterDataPort>,
        rules: Arc<RulesTable>,
        settings: CalculationSettings,
    ) -> Self {
        Self {
            data,
            rules,
            settings,
        }
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Compute stats in a session of their own.
    pub async fn execute(
        &self,
        character: &CharacterSnapshot,
    ) -> Result<CharacterStatsResult, CharacterStatsError> {
        let mut session = StatSession::new(character.conditions.clone());
        self.recompute(character, &mut session).await
    }

    /// Apply every system to `session` and read the stats back.
    ///
    /// The session is reset to the character's current conditions before any
    /// system runs, so calling this again on the same session gives the same
    /// stats as [`execute`](Self::execute).
    pub async fn recompute(
        &self,
        character: &CharacterSnapshot,
        session: &mut StatSession,
    ) -> Result<CharacterStatsResult, CharacterStatsError> {
        character.validate()?;
        let level = character.level();

        let favored_class_bonuses = self.data.get_favored_class_bonuses(character.id).await?;
        let class_features = self
            .data
            .get_processed_class_features(character.id, level)
            .await?;
        let abp_cache = if self.settings.abp_enabled {
            self.data.get_abp_cache_data(level).await?
        } else {
            AbpCacheData::default()
        };

        session.reset(character.conditions.clone());

        let systems: Vec<Box<dyn ContributingSystem>> = vec![
            Box::new(SizeSystem::new()),
            Box::new(AbpSystem::new(abp_cache, self.settings.abp_enabled)),
            Box::new(FeatSystem),
            Box::new(TraitSystem),
            Box::new(ClassFeatureSystem::new(class_features)),
            Box::new(CorruptionSystem),
            Box::new(FavoredClassSystem::new(favored_class_bonuses)),
        ];

        let mut reports = Vec::with_capacity(systems.len());
        for system in &systems {
            let report = system.apply(character, session, &self.rules);
            tracing::debug!(
                character_id = %character.id,
                namespace = system.namespace(),
                %report,
                "System applied"
            );
            reports.push(report);
        }

        let stats = CharacterStats::calculate(character, session, &self.settings)?;

        tracing::info!(
            character_id = %character.id,
            name = %character.name,
            level,
            effects = session.effects.len(),
            overrides = session.overrides.len(),
            "Character stats computed"
        );

        Ok(CharacterStatsResult { stats, reports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterDataPort, PortError};
    use mockall::predicate::*;
    use pathsheet_domain::character::{AbpChoice, BabProgression, SelectedElement};
    use pathsheet_domain::{
        AbilityScores, AbpCategory, AbpNode, ClassFeatureSelection, ClassLevel, DomainError,
        EffectDefinition, FavoredClassBonus, FavoredClassChoice, SaveType,
    };

    fn fighter(scores: [i32; 6], level: u32) -> CharacterSnapshot {
        let mut character = CharacterSnapshot::new("Valeros", AbilityScores::from_array(scores));
        character.classes = vec![ClassLevel::new("Fighter", level, 10)
            .with_bab(BabProgression::Full)
            .with_good_saves(&[SaveType::Fortitude])];
        character
    }

    fn empty_port() -> MockCharacterDataPort {
        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses()
            .returning(|_| Ok(Vec::new()));
        data.expect_get_processed_class_features()
            .returning(|_, _| Ok(Vec::new()));
        data.expect_get_abp_cache_data()
            .returning(|level| Ok(AbpCacheData { level, nodes: Vec::new() }));
        data
    }

    fn use_case(data: MockCharacterDataPort, rules: RulesTable) -> CharacterStatsUseCase {
        CharacterStatsUseCase::new(
            Arc::new(data),
            Arc::new(rules),
            CalculationSettings::default(),
        )
    }

    fn rules() -> RulesTable {
        RulesTable::new()
            .with(
                "Great Fortitude",
                vec![EffectDefinition::numeric("save_fortitude", "untyped", 2)],
            )
            .with(
                "Trapfinding",
                vec![EffectDefinition::numeric("skill.perception", "untyped", 1)],
            )
            .with(
                "Dodge",
                vec![EffectDefinition::numeric("ac", "dodge", 1)],
            )
    }

    #[tokio::test]
    async fn power_attack_fighter() {
        let mut character = fighter([18, 10, 10, 10, 10, 10], 6);
        character.combat.power_attack = true;

        let result = use_case(empty_port(), rules())
            .execute(&character)
            .await
            .unwrap();

        assert_eq!(result.stats.melee.bonus.total, 8);
        assert_eq!(result.stats.melee.attack_string, "+8/+3");
    }

    #[tokio::test]
    async fn feats_flow_into_saves() {
        let mut character = fighter([10, 10, 12, 10, 10, 10], 4);
        character
            .feats
            .push(SelectedElement::new("f1", "Great Fortitude"));

        let result = use_case(empty_port(), rules())
            .execute(&character)
            .await
            .unwrap();

        assert_eq!(result.stats.save(SaveType::Fortitude).unwrap().total, 7);
        assert_eq!(result.reports.len(), 7);
        assert_eq!(result.reports[2].namespace, "feat");
        assert_eq!(result.reports[2].effects, 1);
    }

    #[tokio::test]
    async fn port_data_reaches_class_features_and_favored_class() {
        let character = {
            let mut c = CharacterSnapshot::new("Merisiel", AbilityScores::from_array([10; 6]));
            c.classes = vec![ClassLevel::new("Rogue", 2, 8)];
            c
        };
        let id = character.id;

        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses()
            .with(eq(id))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    FavoredClassBonus {
                        class_name: "Rogue".to_string(),
                        level: 1,
                        choice: FavoredClassChoice::HitPoint,
                    },
                    FavoredClassBonus {
                        class_name: "Rogue".to_string(),
                        level: 2,
                        choice: FavoredClassChoice::HitPoint,
                    },
                ])
            });
        data.expect_get_processed_class_features()
            .with(eq(id), eq(2))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    ClassFeatureSelection::new("cf1", "Trapfinding", 1).for_class("Rogue")
                ])
            });
        data.expect_get_abp_cache_data()
            .returning(|level| Ok(AbpCacheData { level, nodes: Vec::new() }));

        let result = use_case(data, rules()).execute(&character).await.unwrap();

        // d8 at first level, 5 at second, +2 favored class
        assert_eq!(result.stats.hit_points.total, 15);
        assert_eq!(result.stats.skill("perception").unwrap().total, 1);
    }

    #[tokio::test]
    async fn recompute_on_same_session_is_idempotent() {
        let mut character = fighter([14, 14, 14, 10, 10, 10], 5);
        character.feats.push(SelectedElement::new("f1", "Dodge"));
        character
            .feats
            .push(SelectedElement::new("f2", "Great Fortitude"));
        let use_case = use_case(empty_port(), rules());

        let mut session = StatSession::new(character.conditions.clone());
        let first = use_case.recompute(&character, &mut session).await.unwrap();
        let registered = session.effects.len();
        let second = use_case.recompute(&character, &mut session).await.unwrap();

        assert_eq!(first.stats, second.stats);
        assert_eq!(session.effects.len(), registered);
        assert_eq!(second.reports[2].registered(), first.reports[2].registered());
        assert_eq!(second.reports[2].cleared, 0);
        assert_eq!(second.stats.armor_class.normal.total, 10 + 2 + 1);
    }

    #[tokio::test]
    async fn recompute_picks_up_changed_conditions() {
        let mut character = fighter([10; 6], 3);
        character.feats.push(SelectedElement::new("f1", "Trap Sense"));
        let rules = RulesTable::new().with(
            "Trap Sense",
            vec![EffectDefinition::numeric("skill.perception", "untyped", 2)
                .with_condition("against_traps")],
        );
        let use_case = use_case(empty_port(), rules);

        let mut session = StatSession::new(character.conditions.clone());
        let before = use_case.recompute(&character, &mut session).await.unwrap();
        assert_eq!(before.stats.skill("perception").unwrap().total, 0);

        character.conditions.insert("against_traps");
        let recomputed = use_case.recompute(&character, &mut session).await.unwrap();
        let fresh = use_case.execute(&character).await.unwrap();

        assert_eq!(recomputed.stats.skill("perception").unwrap().total, 2);
        assert_eq!(recomputed.stats, fresh.stats);
    }

    #[tokio::test]
    async fn abp_cache_applies_when_enabled() {
        let character = fighter([10; 6], 7);
        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses()
            .returning(|_| Ok(Vec::new()));
        data.expect_get_processed_class_features()
            .returning(|_, _| Ok(Vec::new()));
        data.expect_get_abp_cache_data()
            .with(eq(7))
            .times(1)
            .returning(|level| {
                Ok(AbpCacheData {
                    level,
                    nodes: vec![AbpNode {
                        id: "armor".to_string(),
                        name: "Armor Attunement".to_string(),
                        category: AbpCategory::ArmorAttunement,
                        level: 3,
                        value: 0,
                        is_choice: false,
                        group: None,
                        ability: None,
                        target: None,
                    }],
                })
            });

        let result = use_case(data, RulesTable::new())
            .execute(&character)
            .await
            .unwrap();
        assert_eq!(result.stats.armor_class.normal.total, 12);
    }

    #[tokio::test]
    async fn abp_disabled_skips_the_lookup() {
        let mut character = fighter([10; 6], 7);
        character.abp_choices.push(AbpChoice {
            node_id: "armor".to_string(),
            choices: Vec::new(),
        });
        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses()
            .returning(|_| Ok(Vec::new()));
        data.expect_get_processed_class_features()
            .returning(|_, _| Ok(Vec::new()));
        data.expect_get_abp_cache_data().times(0);

        let settings = CalculationSettings {
            abp_enabled: false,
            ..CalculationSettings::default()
        };
        let use_case =
            CharacterStatsUseCase::new(Arc::new(data), Arc::new(RulesTable::new()), settings);

        let result = use_case.execute(&character).await.unwrap();
        assert_eq!(result.stats.armor_class.normal.total, 10);
        assert_eq!(result.reports[1].namespace, "abp");
        assert_eq!(result.reports[1].registered(), 0);
    }

    #[tokio::test]
    async fn missing_rules_are_reported_not_fatal() {
        let mut character = fighter([10; 6], 1);
        character
            .feats
            .push(SelectedElement::new("f1", "Homebrew Stance"));

        let result = use_case(empty_port(), rules())
            .execute(&character)
            .await
            .unwrap();
        assert_eq!(result.missing_elements(), 1);
    }

    #[tokio::test]
    async fn port_failure_propagates() {
        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses()
            .returning(|_| Err(PortError::unavailable("get_favored_class_bonuses", "offline")));

        let err = use_case(data, rules())
            .execute(&fighter([10; 6], 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterStatsError::DataAccess(_)));
    }

    #[tokio::test]
    async fn invalid_snapshot_never_reaches_the_port() {
        let mut data = MockCharacterDataPort::new();
        data.expect_get_favored_class_bonuses().times(0);

        let mut character = fighter([10; 6], 1);
        character.classes[0].level = 0;

        let err = use_case(data, rules())
            .execute(&character)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CharacterStatsError::Domain(DomainError::Validation(_))
        ));
    }
}
