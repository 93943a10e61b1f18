//! Ability scores after effects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::{BonusEngine, BonusEntry, StatSession};
use crate::error::DomainError;
use crate::value_objects::{ability_modifier, Ability, AbilityScores, ValueWithBreakdown};

/// Final score and modifier for one ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityStat {
    pub score: ValueWithBreakdown,
    pub modifier: i32,
}

/// All six abilities, keyed by ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityBlock(BTreeMap<Ability, AbilityStat>);

impl AbilityBlock {
    /// Base score plus `ability.<name>` effects resolved by bonus type.
    pub fn calculate(scores: &AbilityScores, session: &StatSession) -> Result<Self, DomainError> {
        let mut block = BTreeMap::new();
        for ability in Ability::ALL {
            let base = scores.require(ability)?;
            let mut entries = vec![BonusEntry::untyped("Base score", base)];
            entries.extend(session.entries(&ability.target()));

            let score = BonusEngine::resolve(ability.name(), &entries);
            let modifier = ability_modifier(score.total);
            block.insert(ability, AbilityStat { score, modifier });
        }
        Ok(Self(block))
    }

    pub fn get(&self, ability: Ability) -> Option<&AbilityStat> {
        self.0.get(&ability)
    }

    /// Modifier for an ability; 0 if the block was built without it.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.0.get(&ability).map(|stat| stat.modifier).unwrap_or(0)
    }

    pub fn score(&self, ability: Ability) -> i32 {
        self.0.get(&ability).map(|stat| stat.score.total).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ability, &AbilityStat)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{BonusType, Effect};

    #[test]
    fn enhancement_bonuses_do_not_stack() {
        let mut session = StatSession::default();
        session.effects.add_effect(Effect::numeric(
            "abp_physical_ability.strength",
            "ability.strength",
            BonusType::Enhancement,
            2,
            "Physical prowess",
        ));
        session.effects.add_effect(Effect::numeric(
            "feat_bulls_ability.strength",
            "ability.strength",
            BonusType::Enhancement,
            4,
            "Bull's Strength",
        ));
        session.effects.add_effect(Effect::numeric(
            "trait_tome_ability.strength",
            "ability.strength",
            BonusType::Inherent,
            1,
            "Manual",
        ));

        let block =
            AbilityBlock::calculate(&AbilityScores::from_array([15, 10, 10, 10, 10, 10]), &session)
                .unwrap();
        assert_eq!(block.score(Ability::Strength), 20);
        assert_eq!(block.modifier(Ability::Strength), 5);
        assert_eq!(block.modifier(Ability::Dexterity), 0);
    }

    #[test]
    fn missing_score_is_an_error() {
        let scores = AbilityScores::new().with(Ability::Strength, 10);
        assert!(AbilityBlock::calculate(&scores, &StatSession::default()).is_err());
    }
}
