//! Read-only character snapshot fed into a stat computation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{
    AbpChoice, ArmorLoadout, ClassFeatureSelection, ClassLevel, CombatOptions,
    CorruptionSelection, ManifestationSelection, SelectedElement, SizeChange,
};
use crate::effects::ConditionSet;
use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::value_objects::{AbilityScores, SizeCategory};

/// Everything the calculators need to know about one character.
///
/// Simple data struct: any combination of selections is accepted, and only
/// the structural checks in [`CharacterSnapshot::validate`] can fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    /// Key for recorded character data; required when deserializing
    pub id: CharacterId,
    pub name: String,
    pub abilities: AbilityScores,
    #[serde(default)]
    pub size: SizeCategory,
    #[serde(default)]
    pub classes: Vec<ClassLevel>,
    /// Skill id → ranks invested
    #[serde(default)]
    pub skill_ranks: BTreeMap<String, u32>,
    #[serde(default)]
    pub class_skills: BTreeSet<String>,
    #[serde(default)]
    pub armor: ArmorLoadout,
    #[serde(default)]
    pub combat: CombatOptions,
    #[serde(default)]
    pub conditions: ConditionSet,
    #[serde(default)]
    pub size_changes: Vec<SizeChange>,
    #[serde(default)]
    pub feats: Vec<SelectedElement>,
    #[serde(default)]
    pub traits: Vec<SelectedElement>,
    #[serde(default)]
    pub ancestry_traits: Vec<SelectedElement>,
    #[serde(default)]
    pub corruptions: Vec<CorruptionSelection>,
    #[serde(default)]
    pub manifestations: Vec<ManifestationSelection>,
    #[serde(default)]
    pub class_features: Vec<ClassFeatureSelection>,
    #[serde(default)]
    pub abp_choices: Vec<AbpChoice>,
}

impl CharacterSnapshot {
    pub fn new(name: impl Into<String>, abilities: AbilityScores) -> Self {
        Self {
            name: name.into(),
            abilities,
            ..Self::default()
        }
    }

    /// Total character level across all classes.
    pub fn level(&self) -> u32 {
        self.classes.iter().map(|c| c.level).sum()
    }

    /// Levels in one class (case-insensitive), 0 if the character has none.
    pub fn class_level(&self, class_name: &str) -> u32 {
        self.classes
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(class_name))
            .map(|c| c.level)
            .sum()
    }

    pub fn ranks(&self, skill_id: &str) -> u32 {
        self.skill_ranks.get(skill_id).copied().unwrap_or(0)
    }

    pub fn is_class_skill(&self, skill_id: &str) -> bool {
        self.class_skills.contains(skill_id)
    }

    pub fn abp_choice(&self, node_id: &str) -> Option<&AbpChoice> {
        self.abp_choices.iter().find(|c| c.node_id == node_id)
    }

    pub fn corruption(&self, corruption_id: &str) -> Option<&CorruptionSelection> {
        self.corruptions.iter().find(|c| c.id == corruption_id)
    }

    /// Reject snapshots the calculators cannot work with at all.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.abilities.validate()?;

        for class in &self.classes {
            if class.name.trim().is_empty() {
                return Err(DomainError::validation("class name cannot be empty"));
            }
            if class.level == 0 {
                return Err(DomainError::validation(format!(
                    "class {} must have at least one level",
                    class.name
                )));
            }
            if class.hit_die == 0 {
                return Err(DomainError::validation(format!(
                    "class {} has no hit die",
                    class.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Ability;

    fn scores() -> AbilityScores {
        AbilityScores::from_array([18, 14, 14, 10, 12, 8])
    }

    #[test]
    fn level_sums_classes() {
        let mut character = CharacterSnapshot::new("Valeros", scores());
        character.classes = vec![
            ClassLevel::new("Fighter", 4, 10),
            ClassLevel::new("Rogue", 2, 8),
        ];
        assert_eq!(character.level(), 6);
        assert_eq!(character.class_level("fighter"), 4);
        assert_eq!(character.class_level("Wizard"), 0);
    }

    #[test]
    fn validate_rejects_missing_scores_and_zero_levels() {
        let character = CharacterSnapshot::new(
            "Nobody",
            AbilityScores::new().with(Ability::Strength, 10),
        );
        assert!(matches!(
            character.validate(),
            Err(DomainError::MissingAbilityScore(Ability::Dexterity))
        ));

        let mut character = CharacterSnapshot::new("Zero", scores());
        character.classes = vec![ClassLevel::new("Fighter", 0, 10)];
        assert!(matches!(character.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn deserializes_minimal_json() {
        let json = r#"{
            "id": "0b7e6f3a-2c4d-4e5f-8a9b-1c2d3e4f5a6b",
            "name": "Kyra",
            "abilities": {"strength": 10, "dexterity": 12, "constitution": 12,
                          "intelligence": 10, "wisdom": 16, "charisma": 14},
            "classes": [{"name": "Cleric", "level": 3, "hitDie": 8,
                         "goodSaves": ["fortitude", "will"]}],
            "skillRanks": {"heal": 3},
            "conditions": ["against_undead"]
        }"#;
        let character: CharacterSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(character.level(), 3);
        assert_eq!(character.ranks("heal"), 3);
        assert_eq!(character.ranks("stealth"), 0);
        assert!(character.conditions.contains("against_undead"));
        assert_eq!(character.size, SizeCategory::Medium);
        assert!(character.validate().is_ok());

        let again: CharacterSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(again.id, character.id);
        assert_eq!(
            character.id.to_string(),
            "0b7e6f3a-2c4d-4e5f-8a9b-1c2d3e4f5a6b"
        );
    }

    #[test]
    fn json_without_id_is_rejected() {
        let json = r#"{
            "name": "Kyra",
            "abilities": {"strength": 10, "dexterity": 12, "constitution": 12,
                          "intelligence": 10, "wisdom": 16, "charisma": 14}
        }"#;
        let err = serde_json::from_str::<CharacterSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("id"));
    }
}
