//! Shared definition → effect registration used by every system.

use std::collections::{BTreeMap, HashMap};

use crate::character::CharacterSnapshot;
use crate::effects::{Effect, EffectId, Override, StatSession};
use crate::rules::{DefinitionValue, EffectDefinition, RulesTable};

use super::ApplyReport;

/// Parse a level-conditioned condition such as `manifestation_level_2+`
/// into `("manifestation_level", 2)`.
pub fn parse_level_condition(condition: &str) -> Option<(&str, u32)> {
    let body = condition.trim().strip_suffix('+')?;
    let (key, threshold) = body.rsplit_once('_')?;
    if key.is_empty() {
        return None;
    }
    Some((key, threshold.parse().ok()?))
}

/// Named levels that level-conditioned definitions are checked against.
#[derive(Debug, Clone, Default)]
pub struct LevelContext {
    values: BTreeMap<String, u32>,
}

impl LevelContext {
    /// `level`, `character_level` and `class_level` all start at the total level.
    pub fn for_character(character: &CharacterSnapshot) -> Self {
        let level = character.level();
        Self::default()
            .with("level", level)
            .with("character_level", level)
            .with("class_level", level)
    }

    pub fn with(mut self, key: impl Into<String>, value: u32) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }
}

enum Gate {
    Always,
    Runtime(String),
    Unmet,
}

fn gate(condition: Option<&str>, levels: &LevelContext) -> Gate {
    let Some(condition) = condition else {
        return Gate::Always;
    };
    match parse_level_condition(condition)
        .and_then(|(key, threshold)| levels.get(key).map(|have| have >= threshold))
    {
        Some(true) => Gate::Always,
        Some(false) => Gate::Unmet,
        // Not a level condition we know; leave it for runtime gating
        None => Gate::Runtime(condition.to_string()),
    }
}

/// One rule element to look up and register.
pub(crate) struct ElementSource<'a> {
    pub namespace: &'static str,
    pub element_id: &'a str,
    pub name: &'a str,
}

/// Look the element up by name and register its definitions; warn and
/// contribute nothing when the table has no entry.
pub(crate) fn register_named(
    session: &mut StatSession,
    report: &mut ApplyReport,
    rules: &RulesTable,
    element: &ElementSource<'_>,
    levels: &LevelContext,
) {
    let Some(definitions) = rules.get(element.name) else {
        tracing::warn!(
            namespace = element.namespace,
            element = %element.name,
            "No rules table entry, element contributes nothing"
        );
        report.missing += 1;
        return;
    };
    register_definitions(session, report, element, definitions, levels);
}

/// Register one effect or override per definition.
///
/// Ids are `{namespace}_{element_id}_{target}`; the second and later
/// definitions aimed at the same target get `#2`, `#3`... appended. Ordinals
/// are assigned before gating so an id never depends on the character level.
pub(crate) fn register_definitions(
    session: &mut StatSession,
    report: &mut ApplyReport,
    element: &ElementSource<'_>,
    definitions: &[EffectDefinition],
    levels: &LevelContext,
) {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();

    for definition in definitions {
        let occurrence = occurrences.entry(definition.target.as_str()).or_insert(0);
        *occurrence += 1;
        let id_target = if *occurrence == 1 {
            definition.target.clone()
        } else {
            format!("{}#{}", definition.target, occurrence)
        };

        let condition = match gate(definition.condition.as_deref(), levels) {
            Gate::Always => None,
            Gate::Runtime(condition) => Some(condition),
            Gate::Unmet => {
                report.gated += 1;
                continue;
            }
        };

        let id = EffectId::derive(element.namespace, element.element_id, &id_target);

        if let (DefinitionValue::Override { value }, Some(kind)) =
            (&definition.value, definition.override_kind())
        {
            let original = kind
                .target_prefix()
                .and_then(|prefix| definition.target.strip_prefix(prefix))
                .unwrap_or(&definition.target);
            let mut record = Override::new(id.as_str(), kind.clone(), original, value, element.name)
                .with_priority(definition.priority);
            if let Some(condition) = condition {
                record = record.with_condition(condition);
            }
            session.overrides.add_override(record);
            report.overrides += 1;
            continue;
        }

        session.effects.add_effect(Effect {
            id,
            target: definition.target.clone(),
            bonus_type: definition.parsed_bonus_type(),
            value: definition.value.clone().into(),
            source: element.name.to_string(),
            priority: definition.priority,
            condition,
        });
        report.effects += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{ConditionSet, EffectValue, OverrideKind};
    use crate::value_objects::Ability;

    fn element(name: &str) -> ElementSource<'_> {
        ElementSource {
            namespace: "feat",
            element_id: "f1",
            name,
        }
    }

    #[test]
    fn parses_level_conditions() {
        assert_eq!(
            parse_level_condition("manifestation_level_2+"),
            Some(("manifestation_level", 2))
        );
        assert_eq!(parse_level_condition("level_10+"), Some(("level", 10)));
        assert_eq!(parse_level_condition("against_traps"), None);
        assert_eq!(parse_level_condition("level_x+"), None);
        assert_eq!(parse_level_condition("_3+"), None);
    }

    #[test]
    fn repeated_targets_get_ordinals() {
        let mut session = StatSession::default();
        let mut report = ApplyReport::new("feat");
        let definitions = vec![
            EffectDefinition::numeric("skill.fly", "untyped", 2),
            EffectDefinition::numeric("skill.fly", "untyped", 2).with_condition("level_10+"),
            EffectDefinition::numeric("skill.acrobatics", "untyped", 2),
        ];
        register_definitions(
            &mut session,
            &mut report,
            &element("Acrobatic"),
            &definitions,
            &LevelContext::default().with("level", 10),
        );

        assert_eq!(report.effects, 3);
        assert!(session.effects.get(&EffectId::new("feat_f1_skill.fly")).is_some());
        let second = session.effects.get(&EffectId::new("feat_f1_skill.fly#2")).unwrap();
        assert_eq!(second.condition, None);
        assert_eq!(second.value, EffectValue::Numeric(2));
    }

    #[test]
    fn unmet_level_conditions_are_skipped_and_others_kept() {
        let mut session = StatSession::default();
        let mut report = ApplyReport::new("feat");
        let definitions = vec![
            EffectDefinition::numeric("ac", "dodge", 1).with_condition("level_5+"),
            EffectDefinition::numeric("skill.perception", "untyped", 2)
                .with_condition("against_traps"),
        ];
        register_definitions(
            &mut session,
            &mut report,
            &element("Trap Sense"),
            &definitions,
            &LevelContext::default().with("level", 3),
        );

        assert_eq!(report.gated, 1);
        assert_eq!(report.effects, 1);
        let kept = session
            .effects
            .get(&EffectId::new("feat_f1_skill.perception"))
            .unwrap();
        assert_eq!(kept.condition.as_deref(), Some("against_traps"));
    }

    #[test]
    fn override_kinds_go_to_override_system() {
        let mut session = StatSession::default();
        let mut report = ApplyReport::new("feat");
        let definitions = vec![
            EffectDefinition::override_value("skill.intimidate", "ability_for_skill", "strength")
                .with_priority(5),
            EffectDefinition::override_value("initiative.ability", "", "wisdom"),
        ];
        register_definitions(
            &mut session,
            &mut report,
            &element("Intimidating Prowess"),
            &definitions,
            &LevelContext::default(),
        );

        assert_eq!(report.overrides, 1);
        assert_eq!(report.effects, 1);
        assert_eq!(
            session
                .overrides
                .get_ability_override_for_skill("intimidate", &ConditionSet::new()),
            Some(Ability::Strength)
        );
        assert_eq!(
            session.overrides.get_overrides_by_type(&OverrideKind::AbilityForSkill)[0].id,
            "feat_f1_skill.intimidate"
        );
        assert_eq!(
            session.effects.apply_override_effects(
                "initiative.ability",
                "dexterity",
                &ConditionSet::new()
            ),
            "wisdom"
        );
    }

    #[test]
    fn missing_entries_are_counted() {
        let mut session = StatSession::default();
        let mut report = ApplyReport::new("feat");
        register_named(
            &mut session,
            &mut report,
            &RulesTable::new(),
            &element("Homebrew Feat"),
            &LevelContext::default(),
        );
        assert_eq!(report.missing, 1);
        assert!(session.effects.is_empty());
    }
}
