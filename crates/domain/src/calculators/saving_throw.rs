//! Saving throws and save DCs.

use crate::character::{CharacterSnapshot, SaveType};
use crate::effects::{targets, BonusEngine, BonusEntry, BonusType, StatSession};
use crate::value_objects::{BreakdownModifier, ValueWithBreakdown};

use super::AbilityBlock;

/// Saving throws resolve every contribution through bonus-type stacking, so
/// two resistance bonuses (say ABP and a cloak) never add up.
#[derive(Debug, Clone, Copy)]
pub struct SavingThrowEngine<'a> {
    session: &'a StatSession,
}

impl<'a> SavingThrowEngine<'a> {
    pub fn new(session: &'a StatSession) -> Self {
        Self { session }
    }

    /// Base save summed over all classes.
    pub fn base_save(character: &CharacterSnapshot, save: SaveType) -> i32 {
        character.classes.iter().map(|class| class.base_save(save)).sum()
    }

    pub fn build_save(
        &self,
        label: &str,
        save: SaveType,
        base_save: i32,
        ability_modifier: i32,
        ability_name: &str,
        bonuses: &[BonusEntry],
    ) -> ValueWithBreakdown {
        let mut entries = vec![
            BonusEntry::untyped("Base save", base_save),
            BonusEntry::untyped(ability_name, ability_modifier),
        ];
        entries.extend(self.session.entries(&targets::save(save.key())));
        entries.extend(self.session.entries(targets::SAVE_ALL));
        entries.extend_from_slice(bonuses);

        BonusEngine::resolve(label, &entries)
    }

    /// Save for a character using its class progressions and key ability.
    pub fn save_for(
        &self,
        character: &CharacterSnapshot,
        abilities: &AbilityBlock,
        save: SaveType,
    ) -> ValueWithBreakdown {
        let ability = save.ability();
        self.build_save(
            save.name(),
            save,
            Self::base_save(character, save),
            abilities.modifier(ability),
            ability.name(),
            &[],
        )
    }

    /// `10 + base + spell level + ability modifier + stacked save_dc bonuses`.
    pub fn calculate_save_dc(
        &self,
        base: i32,
        spell_level: i32,
        ability_modifier: i32,
        bonuses: &[BonusEntry],
    ) -> ValueWithBreakdown {
        let mut entries = self.session.entries(targets::SAVE_DC);
        entries.extend_from_slice(bonuses);

        let mut dc = ValueWithBreakdown::new("Save DC");
        dc.add("Base", 10 + base);
        dc.add("Spell level", spell_level);
        dc.add("Ability modifier", ability_modifier);
        let bonus = BonusEngine::stacked_total(&entries);
        if bonus != 0 {
            dc.push(BreakdownModifier::typed(
                "Bonuses",
                bonus,
                BonusType::Untyped,
            ));
        }
        dc
    }
}
