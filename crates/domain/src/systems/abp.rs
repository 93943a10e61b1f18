//! Automatic Bonus Progression.

use std::collections::HashSet;

use super::{ApplyReport, ContributingSystem};
use crate::character::{AbpCacheData, AbpNode, CharacterSnapshot};
use crate::effects::{Effect, EffectId, StatSession};
use crate::rules::RulesTable;
use crate::value_objects::Ability;

const NAMESPACE: &str = "abp";

/// Registers level-driven ABP bonuses from the nodes unlocked at the
/// character's level.
#[derive(Debug, Clone)]
pub struct AbpSystem {
    cache: AbpCacheData,
    enabled: bool,
}

impl AbpSystem {
    pub fn new(cache: AbpCacheData, enabled: bool) -> Self {
        Self { cache, enabled }
    }

    /// Target for a node; prowess nodes resolve their ability through the
    /// character's ordered choices for that node.
    fn target_for(node: &AbpNode, character: &CharacterSnapshot) -> Option<String> {
        if let Some(target) = node.category.target() {
            return Some(target.to_string());
        }
        if !node.category.is_prowess() {
            return node.target.clone();
        }

        let specifier = node.ability.as_deref().unwrap_or("first");
        let ordinal = match specifier.trim().to_ascii_lowercase().as_str() {
            "first" => Some(0),
            "second" => Some(1),
            "third" => Some(2),
            _ => None,
        };
        let ability: Ability = match ordinal {
            Some(index) => character
                .abp_choice(&node.id)
                .and_then(|choice| choice.choices.get(index))?
                .parse()
                .ok()?,
            None => specifier.parse().ok()?,
        };
        Some(ability.target())
    }
}

impl ContributingSystem for AbpSystem {
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

        if !self.enabled {
            tracing::debug!("Automatic bonus progression disabled");
            return report;
        }

        let level = character.level();
        let selected: HashSet<&str> = character
            .abp_choices
            .iter()
            .map(|choice| choice.node_id.as_str())
            .collect();
        let claimed_groups: HashSet<&str> = self
            .cache
            .nodes
            .iter()
            .filter(|node| node.is_choice && selected.contains(node.id.as_str()))
            .filter_map(|node| node.group.as_deref())
            .collect();

        for node in &self.cache.nodes {
            let excluded = if node.is_choice {
                !selected.contains(node.id.as_str())
            } else {
                node.group
                    .as_deref()
                    .is_some_and(|group| claimed_groups.contains(group))
            };
            if node.level > level || excluded {
                report.gated += 1;
                continue;
            }

            let value = node.category.scaled_bonus(level).unwrap_or(node.value);
            if value == 0 {
                continue;
            }

            let Some(target) = Self::target_for(node, character) else {
                tracing::warn!(
                    node = %node.id,
                    category = %node.category,
                    "ABP node has no resolvable target"
                );
                report.missing += 1;
                continue;
            };

            session.effects.add_effect(Effect::numeric(
                EffectId::derive(NAMESPACE, &node.id, &target),
                target,
                node.category.bonus_type(),
                value,
                node.name.as_str(),
            ));
            report.effects += 1;
        }

        report
    }
}
