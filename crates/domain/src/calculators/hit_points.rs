//! Maximum hit points.

use crate::character::CharacterSnapshot;
use crate::effects::{targets, BonusEngine, StatSession};
use crate::value_objects::{Ability, ValueWithBreakdown};

use super::AbilityBlock;

/// Average hit points per level after the first: `die / 2 + 1`.
pub fn average_roll(hit_die: u32) -> i32 {
    (hit_die / 2 + 1) as i32
}

/// Maximum die at the very first character level, average after that, plus
/// Constitution per level and any `hp_max` effects (favored class, toughness).
pub fn maximum_hit_points(
    character: &CharacterSnapshot,
    abilities: &AbilityBlock,
    session: &StatSession,
) -> ValueWithBreakdown {
    let mut hp = ValueWithBreakdown::new("Hit points");

    let mut first = true;
    for class in character.classes.iter().filter(|class| class.level > 0) {
        let per_level = average_roll(class.hit_die);
        let dice = if first {
            class.hit_die as i32 + (class.level as i32 - 1) * per_level
        } else {
            class.level as i32 * per_level
        };
        first = false;
        hp.add(format!("{} (d{})", class.name, class.hit_die), dice);
    }

    let con = abilities.modifier(Ability::Constitution) * character.level() as i32;
    if con != 0 {
        hp.add(Ability::Constitution.name(), con);
    }
    hp.absorb(BonusEngine::resolve("Hit points", &session.entries(targets::HP_MAX)));
    hp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ClassLevel;
    use crate::effects::{BonusType, Effect};
    use crate::value_objects::AbilityScores;

    #[test]
    fn first_level_max_then_average() {
        let mut character =
            CharacterSnapshot::new("Test", AbilityScores::from_array([10, 10, 14, 10, 10, 10]));
        character.classes = vec![
            ClassLevel::new("Fighter", 3, 10),
            ClassLevel::new("Wizard", 2, 6),
        ];
        let mut session = StatSession::default();
        for id in ["fcb_fighter-1_hp_max", "fcb_fighter-2_hp_max"] {
            session.effects.add_effect(Effect::numeric(
                id,
                targets::HP_MAX,
                BonusType::Untyped,
                1,
                "Favored class (Fighter)",
            ));
        }
        let abilities = AbilityBlock::calculate(&character.abilities, &session).unwrap();

        let hp = maximum_hit_points(&character, &abilities, &session);
        // 10 + 2*6, 2*4, +2 con * 5 levels, +2 favored class
        assert_eq!(hp.total, 22 + 8 + 10 + 2);
    }
}
