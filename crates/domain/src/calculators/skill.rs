//! Skill totals.

use crate::character::CharacterSnapshot;
use crate::effects::{targets, BonusEngine, BonusEntry, StatSession};
use crate::value_objects::{
    Ability, BreakdownModifier, BreakdownOverrides, CalculationSettings, SkillBonusStacking,
    ValueWithBreakdown,
};

use super::AbilityBlock;

/// A skill in the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub ability: Ability,
    pub trained_only: bool,
    /// Group sharing an untrained-use override (`knowledge`)
    pub category: Option<&'static str>,
}

const fn skill(id: &'static str, name: &'static str, ability: Ability) -> SkillDefinition {
    SkillDefinition {
        id,
        name,
        ability,
        trained_only: false,
        category: None,
    }
}

const fn trained(id: &'static str, name: &'static str, ability: Ability) -> SkillDefinition {
    SkillDefinition {
        id,
        name,
        ability,
        trained_only: true,
        category: None,
    }
}

const fn knowledge(id: &'static str, name: &'static str) -> SkillDefinition {
    SkillDefinition {
        id,
        name,
        ability: Ability::Intelligence,
        trained_only: true,
        category: Some("knowledge"),
    }
}

/// Core skills.
pub const SKILLS: &[SkillDefinition] = &[
    skill("acrobatics", "Acrobatics", Ability::Dexterity),
    skill("appraise", "Appraise", Ability::Intelligence),
    skill("bluff", "Bluff", Ability::Charisma),
    skill("climb", "Climb", Ability::Strength),
    skill("craft", "Craft", Ability::Intelligence),
    skill("diplomacy", "Diplomacy", Ability::Charisma),
    trained("disable_device", "Disable Device", Ability::Dexterity),
    skill("disguise", "Disguise", Ability::Charisma),
    skill("escape_artist", "Escape Artist", Ability::Dexterity),
    skill("fly", "Fly", Ability::Dexterity),
    trained("handle_animal", "Handle Animal", Ability::Charisma),
    skill("heal", "Heal", Ability::Wisdom),
    skill("intimidate", "Intimidate", Ability::Charisma),
    knowledge("knowledge_arcana", "Knowledge (Arcana)"),
    knowledge("knowledge_dungeoneering", "Knowledge (Dungeoneering)"),
    knowledge("knowledge_engineering", "Knowledge (Engineering)"),
    knowledge("knowledge_geography", "Knowledge (Geography)"),
    knowledge("knowledge_history", "Knowledge (History)"),
    knowledge("knowledge_local", "Knowledge (Local)"),
    knowledge("knowledge_nature", "Knowledge (Nature)"),
    knowledge("knowledge_nobility", "Knowledge (Nobility)"),
    knowledge("knowledge_planes", "Knowledge (Planes)"),
    knowledge("knowledge_religion", "Knowledge (Religion)"),
    trained("linguistics", "Linguistics", Ability::Intelligence),
    skill("perception", "Perception", Ability::Wisdom),
    skill("perform", "Perform", Ability::Charisma),
    trained("profession", "Profession", Ability::Wisdom),
    skill("ride", "Ride", Ability::Dexterity),
    skill("sense_motive", "Sense Motive", Ability::Wisdom),
    trained("sleight_of_hand", "Sleight of Hand", Ability::Dexterity),
    trained("spellcraft", "Spellcraft", Ability::Intelligence),
    skill("stealth", "Stealth", Ability::Dexterity),
    skill("survival", "Survival", Ability::Wisdom),
    skill("swim", "Swim", Ability::Strength),
    trained("use_magic_device", "Use Magic Device", Ability::Charisma),
];

/// Skills that take the armor check penalty.
pub const ARMOR_CHECK_SKILLS: &[&str] = &[
    "acrobatics",
    "climb",
    "disable_device",
    "escape_artist",
    "fly",
    "ride",
    "sleight_of_hand",
    "stealth",
    "swim",
];

pub fn find_skill(skill_id: &str) -> Option<&'static SkillDefinition> {
    SKILLS.iter().find(|skill| skill.id == skill_id)
}

pub fn applies_armor_check_penalty(skill_id: &str) -> bool {
    ARMOR_CHECK_SKILLS.contains(&skill_id)
}

/// Inputs for one skill calculation.
#[derive(Debug, Clone)]
pub struct SkillCheck<'a> {
    pub skill_id: &'a str,
    pub skill_name: &'a str,
    pub category: Option<&'a str>,
    pub ability_modifier: i32,
    pub ability_name: &'a str,
    pub ranks: u32,
    pub is_class_skill: bool,
    pub armor_check_penalty: i32,
    pub misc_bonuses: &'a [BonusEntry],
    pub is_trained_only: bool,
}

/// Computes skill totals from ranks, ability, armor and registered effects.
#[derive(Debug, Clone, Copy)]
pub struct SkillEngine<'s> {
    settings: &'s CalculationSettings,
}

impl<'s> SkillEngine<'s> {
    pub fn new(settings: &'s CalculationSettings) -> Self {
        Self { settings }
    }

    /// Whether a trained-only skill may be used without ranks: the global
    /// untrained flag, then the category flag, then a skill override that
    /// lifts the trained-only rule.
    pub fn untrained_use_allowed(
        session: &StatSession,
        skill_id: &str,
        category: Option<&str>,
    ) -> bool {
        session.flag(targets::UNTRAINED_ALL, false)
            || category.is_some_and(|c| session.flag(&targets::untrained_category(c), false))
            || session
                .overrides
                .get_skill_trained_only_override(skill_id, session.conditions())
                == Some(false)
    }

    pub fn calculate_skill(
        &self,
        session: &StatSession,
        check: &SkillCheck<'_>,
    ) -> ValueWithBreakdown {
        if check.is_trained_only
            && check.ranks == 0
            && !Self::untrained_use_allowed(session, check.skill_id, check.category)
        {
            return ValueWithBreakdown::new(check.skill_name).with_overrides(BreakdownOverrides {
                trained_only: true,
                ability: None,
            });
        }

        let mut result = ValueWithBreakdown::new(check.skill_name);
        result.add(check.ability_name, check.ability_modifier);
        if check.ranks > 0 {
            result.add("Ranks", check.ranks as i32);
            if check.is_class_skill {
                result.add("Class skill", self.settings.class_skill_bonus);
            }
        }
        if check.armor_check_penalty != 0 && applies_armor_check_penalty(check.skill_id) {
            result.add("Armor check penalty", -check.armor_check_penalty.abs());
        }

        let mut entries = session.entries(&targets::skill(check.skill_id));
        entries.extend_from_slice(check.misc_bonuses);
        match self.settings.skill_bonus_stacking {
            SkillBonusStacking::Sum => {
                for entry in entries {
                    result.push(BreakdownModifier::typed(
                        entry.source,
                        entry.value,
                        entry.bonus_type,
                    ));
                }
            }
            SkillBonusStacking::ByType => result.absorb(BonusEngine::resolve("", &entries)),
        }

        result
    }

    /// Skill total for a character, applying ability substitution and
    /// trained-only overrides from the session.
    pub fn skill_for(
        &self,
        session: &StatSession,
        character: &CharacterSnapshot,
        abilities: &AbilityBlock,
        skill: &SkillDefinition,
    ) -> ValueWithBreakdown {
        let conditions = session.conditions();
        let substituted = session
            .overrides
            .get_ability_override_for_skill(skill.id, conditions)
            .filter(|ability| *ability != skill.ability);
        let ability = substituted.unwrap_or(skill.ability);
        let is_trained_only = skill.trained_only
            || session
                .overrides
                .get_skill_trained_only_override(skill.id, conditions)
                .unwrap_or(false);

        let check = SkillCheck {
            skill_id: skill.id,
            skill_name: skill.name,
            category: skill.category,
            ability_modifier: abilities.modifier(ability),
            ability_name: ability.name(),
            ranks: character.ranks(skill.id),
            is_class_skill: character.is_class_skill(skill.id),
            armor_check_penalty: character.armor.armor_check_penalty,
            misc_bonuses: &[],
            is_trained_only,
        };

        let result = self.calculate_skill(session, &check);
        if result.is_trained_only_blocked() {
            return result;
        }
        result.with_overrides(BreakdownOverrides {
            trained_only: false,
            ability: substituted,
        })
    }
}
