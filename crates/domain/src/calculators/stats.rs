//! The full stat sheet produced for one character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::character::{CharacterSnapshot, SaveType};
use crate::effects::{targets, BonusEngine, StatSession};
use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::systems::SizeSystem;
use crate::value_objects::{CalculationSettings, SizeProfile, ValueWithBreakdown};

use super::{
    maximum_hit_points, AbilityBlock, ArmorClassSet, AttackProfile, CombatBuilder,
    SavingThrowEngine, SkillEngine, SKILLS,
};

/// Every derived statistic for a character, each with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    pub character_id: CharacterId,
    pub name: String,
    pub level: u32,
    pub size: SizeProfile,
    pub abilities: AbilityBlock,
    /// Keyed by skill id
    pub skills: BTreeMap<String, ValueWithBreakdown>,
    pub saves: BTreeMap<SaveType, ValueWithBreakdown>,
    pub base_attack_bonus: i32,
    pub armor_class: ArmorClassSet,
    pub cmb: ValueWithBreakdown,
    pub cmd: ValueWithBreakdown,
    pub melee: AttackProfile,
    pub ranged: AttackProfile,
    pub hit_points: ValueWithBreakdown,
    /// Extra skill ranks from favored class bonuses and similar
    pub bonus_skill_ranks: ValueWithBreakdown,
}

impl CharacterStats {
    /// Read the final state of a session whose systems have all been applied.
    pub fn calculate(
        character: &CharacterSnapshot,
        session: &StatSession,
        settings: &CalculationSettings,
    ) -> Result<Self, DomainError> {
        let abilities = AbilityBlock::calculate(&character.abilities, session)?;

        let skill_engine = SkillEngine::new(settings);
        let skills = SKILLS
            .iter()
            .map(|skill| {
                (
                    skill.id.to_string(),
                    skill_engine.skill_for(session, character, &abilities, skill),
                )
            })
            .collect();

        let save_engine = SavingThrowEngine::new(session);
        let saves = SaveType::ALL
            .into_iter()
            .map(|save| (save, save_engine.save_for(character, &abilities, save)))
            .collect();

        let combat = CombatBuilder::new(session, character, &abilities);

        Ok(Self {
            character_id: character.id,
            name: character.name.clone(),
            level: character.level(),
            size: SizeSystem::profile(character, session),
            skills,
            saves,
            base_attack_bonus: CombatBuilder::base_attack_bonus(character),
            armor_class: combat.armor_class(),
            cmb: combat.cmb(),
            cmd: combat.cmd(),
            melee: combat.melee(),
            ranged: combat.ranged(),
            hit_points: maximum_hit_points(character, &abilities, session),
            bonus_skill_ranks: BonusEngine::resolve(
                "Bonus skill ranks",
                &session.entries(targets::SKILL_RANKS),
            ),
            abilities,
        })
    }

    pub fn skill(&self, skill_id: &str) -> Option<&ValueWithBreakdown> {
        self.skills.get(skill_id)
    }

    pub fn save(&self, save: SaveType) -> Option<&ValueWithBreakdown> {
        self.saves.get(&save)
    }
}
