//! Attacks, armor class and combat maneuvers.

use serde::{Deserialize, Serialize};

use crate::character::CharacterSnapshot;
use crate::effects::{targets, BonusEngine, BonusEntry, BonusType, StatSession, ALL_WEAPONS};
use crate::value_objects::{format_signed, Ability, ValueWithBreakdown};

use super::AbilityBlock;

/// AC bonus types that also apply to CMD.
const CMD_AC_TYPES: [BonusType; 8] = [
    BonusType::Circumstance,
    BonusType::Deflection,
    BonusType::Dodge,
    BonusType::Insight,
    BonusType::Luck,
    BonusType::Morale,
    BonusType::Profane,
    BonusType::Sacred,
];

/// Flat penalty (and extra attack) for Rapid Shot and Two-Weapon Fighting.
const EXTRA_ATTACK_PENALTY: i32 = 2;

/// BAB thresholds that grant another iterative attack.
const ITERATIVE_THRESHOLDS: [i32; 3] = [6, 11, 16];

/// An attack bonus and the full-attack sequence it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackProfile {
    pub bonus: ValueWithBreakdown,
    pub attacks: Vec<i32>,
    /// Display form such as `+11/+11/+6`
    pub attack_string: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorClassSet {
    pub normal: ValueWithBreakdown,
    pub touch: ValueWithBreakdown,
    pub flat_footed: ValueWithBreakdown,
}

/// Penalty for Power Attack and Deadly Aim: `floor(BAB / 4) + 1`.
pub fn power_attack_penalty(bab: i32) -> i32 {
    bab.max(0) / 4 + 1
}

/// Full-attack bonuses: the first attack, then one more at each iterative
/// threshold, each 5 lower than the one before.
pub fn iterative_attacks(first: i32, bab: i32) -> Vec<i32> {
    let mut attacks = vec![first];
    for threshold in ITERATIVE_THRESHOLDS {
        if bab >= threshold {
            attacks.push(first - 5 * attacks.len() as i32);
        }
    }
    attacks
}

pub fn attack_string(attacks: &[i32]) -> String {
    attacks
        .iter()
        .map(|bonus| format_signed(*bonus))
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds combat values for one character from the session's effects.
#[derive(Debug, Clone, Copy)]
pub struct CombatBuilder<'a> {
    session: &'a StatSession,
    character: &'a CharacterSnapshot,
    abilities: &'a AbilityBlock,
}

impl<'a> CombatBuilder<'a> {
    pub fn new(
        session: &'a StatSession,
        character: &'a CharacterSnapshot,
        abilities: &'a AbilityBlock,
    ) -> Self {
        Self {
            session,
            character,
            abilities,
        }
    }

    /// Sum of every class's BAB progression.
    pub fn base_attack_bonus(character: &CharacterSnapshot) -> i32 {
        character.classes.iter().map(|class| class.base_attack_bonus()).sum()
    }

    fn bab(&self) -> i32 {
        Self::base_attack_bonus(self.character)
    }

    fn attack_ability(&self, attack_type: &str, default: Ability) -> Ability {
        self.session
            .overrides
            .get_ability_override_for_attack(attack_type, self.session.conditions())
            .unwrap_or(default)
    }

    /// Strength, unless an override says otherwise or weapon finesse makes
    /// Dexterity the better choice.
    fn melee_ability(&self) -> Ability {
        if let Some(ability) = self
            .session
            .overrides
            .get_ability_override_for_attack("melee", self.session.conditions())
        {
            return ability;
        }
        let weapon = self
            .character
            .combat
            .melee_weapon
            .as_deref()
            .unwrap_or(ALL_WEAPONS);
        let finesse = self
            .session
            .overrides
            .has_weapon_finesse(weapon, self.session.conditions());
        let dex = self.abilities.modifier(Ability::Dexterity);
        if finesse && dex > self.abilities.modifier(Ability::Strength) {
            Ability::Dexterity
        } else {
            Ability::Strength
        }
    }

    fn attack_base(
        &self,
        label: &str,
        ability: Ability,
        effect_targets: &[&str],
    ) -> ValueWithBreakdown {
        let mut bonus = ValueWithBreakdown::new(label);
        bonus.add("Base attack bonus", self.bab());
        bonus.add(ability.name(), self.abilities.modifier(ability));
        bonus.absorb(BonusEngine::resolve(label, &self.session.entries_for(effect_targets)));
        bonus
    }

    pub fn melee(&self) -> AttackProfile {
        let options = &self.character.combat;
        let bab = self.bab();
        let mut bonus = self.attack_base(
            "Melee",
            self.melee_ability(),
            &[targets::ATTACK, targets::ATTACK_MELEE],
        );
        if options.power_attack {
            bonus.add("Power Attack", -power_attack_penalty(bab));
        }
        if options.two_weapon_fighting {
            bonus.add("Two-Weapon Fighting", -EXTRA_ATTACK_PENALTY);
        }

        let mut attacks = iterative_attacks(bonus.total, bab);
        if options.two_weapon_fighting {
            attacks.insert(1, bonus.total);
        }
        profile(bonus, attacks)
    }

    pub fn ranged(&self) -> AttackProfile {
        let options = &self.character.combat;
        let bab = self.bab();
        let ability = self.attack_ability("ranged", Ability::Dexterity);
        let mut bonus =
            self.attack_base("Ranged", ability, &[targets::ATTACK, targets::ATTACK_RANGED]);
        if options.deadly_aim {
            bonus.add("Deadly Aim", -power_attack_penalty(bab));
        }
        if options.rapid_shot {
            bonus.add("Rapid Shot", -EXTRA_ATTACK_PENALTY);
        }

        let mut attacks = iterative_attacks(bonus.total, bab);
        if options.rapid_shot {
            attacks.insert(1, bonus.total);
        }
        profile(bonus, attacks)
    }

    /// Dexterity bonus to AC after the armor's cap.
    fn armor_dex(&self) -> i32 {
        let dex = self.abilities.modifier(Ability::Dexterity);
        match self.character.armor.max_dex {
            Some(cap) => dex.min(cap),
            None => dex,
        }
    }

    pub fn armor_class(&self) -> ArmorClassSet {
        let armor = &self.character.armor;
        let dex = self.armor_dex();

        let mut armor_entries = Vec::new();
        if armor.armor_bonus != 0 {
            armor_entries.push(BonusEntry::new("Armor", armor.armor_bonus, BonusType::Armor));
        }
        armor_entries.extend(self.session.entries(targets::AC_ARMOR));

        let mut shield_entries = Vec::new();
        if armor.shield_bonus != 0 {
            shield_entries.push(BonusEntry::new("Shield", armor.shield_bonus, BonusType::Shield));
        }
        shield_entries.extend(self.session.entries(targets::AC_SHIELD));

        let mut natural_entries = self.session.entries(targets::AC_NATURAL);

        // Armor, shield and natural armor bonuses on plain `ac` resolve with
        // the matching worn group.
        let mut general = Vec::new();
        for entry in self.session.entries(targets::AC) {
            match entry.bonus_type {
                BonusType::Armor => armor_entries.push(entry),
                BonusType::Shield => shield_entries.push(entry),
                BonusType::NaturalArmor => natural_entries.push(entry),
                _ => general.push(entry),
            }
        }

        let flat_general: Vec<BonusEntry> = general
            .iter()
            .filter(|e| e.bonus_type != BonusType::Dodge)
            .cloned()
            .collect();

        let worn = [
            armor_entries.as_slice(),
            shield_entries.as_slice(),
            natural_entries.as_slice(),
        ];

        ArmorClassSet {
            normal: armor_class_value("AC", dex, &worn, &general),
            touch: armor_class_value("Touch AC", dex, &[], &general),
            flat_footed: armor_class_value("Flat-footed AC", dex.min(0), &worn, &flat_general),
        }
    }

    pub fn cmb(&self) -> ValueWithBreakdown {
        let ability = self.attack_ability("cmb", Ability::Strength);
        let mut cmb = ValueWithBreakdown::new("CMB");
        cmb.add("Base attack bonus", self.bab());
        cmb.add(ability.name(), self.abilities.modifier(ability));
        cmb.absorb(BonusEngine::resolve("CMB", &self.session.entries(targets::CMB)));
        cmb
    }

    pub fn cmd(&self) -> ValueWithBreakdown {
        let mut entries = self.session.entries(targets::CMD);
        entries.extend(
            self.session
                .entries(targets::AC)
                .into_iter()
                .filter(|e| CMD_AC_TYPES.contains(&e.bonus_type)),
        );

        let mut cmd = ValueWithBreakdown::new("CMD");
        cmd.add("Base", 10);
        cmd.add("Base attack bonus", self.bab());
        cmd.add(
            Ability::Strength.name(),
            self.abilities.modifier(Ability::Strength),
        );
        cmd.add(
            Ability::Dexterity.name(),
            self.abilities.modifier(Ability::Dexterity),
        );
        cmd.absorb(BonusEngine::resolve("CMD", &entries));
        cmd
    }
}

fn profile(bonus: ValueWithBreakdown, attacks: Vec<i32>) -> AttackProfile {
    AttackProfile {
        attack_string: attack_string(&attacks),
        bonus,
        attacks,
    }
}

/// `10 + dex`, then each worn group and the remaining `ac` bonuses, each
/// resolved separately.
fn armor_class_value(
    label: &str,
    dex: i32,
    worn: &[&[BonusEntry]],
    general: &[BonusEntry],
) -> ValueWithBreakdown {
    let mut ac = ValueWithBreakdown::new(label);
    ac.add("Base", 10);
    if dex != 0 {
        ac.add(Ability::Dexterity.name(), dex);
    }
    for group in worn {
        ac.absorb(BonusEngine::resolve(label, group));
    }
    ac.absorb(BonusEngine::resolve(label, general));
    ac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{ArmorLoadout, BabProgression, ClassLevel};
    use crate::effects::{Effect, Override, OverrideKind};
    use crate::value_objects::AbilityScores;

    fn fighter(scores: [i32; 6], level: u32) -> CharacterSnapshot {
        let mut character = CharacterSnapshot::new("Test", AbilityScores::from_array(scores));
        character.classes =
            vec![ClassLevel::new("Fighter", level, 10).with_bab(BabProgression::Full)];
        character
    }

    fn abilities(character: &CharacterSnapshot, session: &StatSession) -> AbilityBlock {
        AbilityBlock::calculate(&character.abilities, session).unwrap()
    }

    fn ac_effect(id: &str, bonus_type: BonusType, value: i32) -> Effect {
        Effect::numeric(id, targets::AC, bonus_type, value, id)
    }

    #[test]
    fn power_attack_melee() {
        let mut character = fighter([18, 10, 10, 10, 10, 10], 6);
        character.combat.power_attack = true;
        let session = StatSession::default();
        let abilities = abilities(&character, &session);

        let melee = CombatBuilder::new(&session, &character, &abilities).melee();
        assert_eq!(melee.bonus.total, 8);
        assert_eq!(melee.attacks, vec![8, 3]);
        assert_eq!(melee.attack_string, "+8/+3");
    }

    #[test]
    fn penalties_and_iteratives() {
        assert_eq!(power_attack_penalty(0), 1);
        assert_eq!(power_attack_penalty(3), 1);
        assert_eq!(power_attack_penalty(4), 2);
        assert_eq!(power_attack_penalty(16), 5);
        assert_eq!(iterative_attacks(20, 16), vec![20, 15, 10, 5]);
        assert_eq!(iterative_attacks(4, 5), vec![4]);
    }

    #[test]
    fn rapid_shot_adds_an_attack() {
        let mut character = fighter([10, 16, 10, 10, 10, 10], 11);
        character.combat.rapid_shot = true;
        let session = StatSession::default();
        let abilities = abilities(&character, &session);

        let ranged = CombatBuilder::new(&session, &character, &abilities).ranged();
        assert_eq!(ranged.bonus.total, 11 + 3 - 2);
        assert_eq!(ranged.attack_string, "+12/+12/+7/+2");
    }

    #[test]
    fn deadly_aim_lowers_ranged_attacks() {
        let mut character = fighter([10, 16, 10, 10, 10, 10], 6);
        character.combat.deadly_aim = true;
        let session = StatSession::default();
        let abilities = abilities(&character, &session);

        let ranged = CombatBuilder::new(&session, &character, &abilities).ranged();
        assert_eq!(ranged.bonus.total, 6 + 3 - 2);
        assert_eq!(ranged.attacks, vec![7, 2]);
        assert_eq!(ranged.attack_string, "+7/+2");
    }

    #[test]
    fn two_weapon_fighting_adds_an_off_hand_attack() {
        let mut character = fighter([16, 10, 10, 10, 10, 10], 6);
        character.combat.two_weapon_fighting = true;
        let session = StatSession::default();
        let abilities = abilities(&character, &session);

        let melee = CombatBuilder::new(&session, &character, &abilities).melee();
        assert_eq!(melee.bonus.total, 6 + 3 - 2);
        assert_eq!(melee.attacks, vec![7, 7, 2]);
        assert_eq!(melee.attack_string, "+7/+7/+2");
    }

    #[test]
    fn weapon_finesse_uses_better_dexterity() {
        let character = fighter([12, 18, 10, 10, 10, 10], 1);
        let mut session = StatSession::default();
        session.overrides.add_override(Override::new(
            "feat_finesse_weapon.*",
            OverrideKind::WeaponFinesse,
            ALL_WEAPONS,
            "true",
            "Weapon Finesse",
        ));
        let abilities = abilities(&character, &session);

        let melee = CombatBuilder::new(&session, &character, &abilities).melee();
        assert_eq!(melee.bonus.total, 1 + 4);
    }

    #[test]
    fn armor_class_variants() {
        let mut character = fighter([10, 16, 10, 10, 10, 10], 1);
        character.armor = ArmorLoadout {
            armor_bonus: 4,
            shield_bonus: 2,
            max_dex: Some(2),
            armor_check_penalty: 2,
        };
        let mut session = StatSession::default();
        session.effects.add_effect(ac_effect("feat_dodge_ac", BonusType::Dodge, 1));
        session.effects.add_effect(ac_effect("feat_ring_ac", BonusType::Deflection, 1));
        session.effects.add_effect(Effect::numeric(
            "abp_armor_ac.armor",
            targets::AC_ARMOR,
            BonusType::Enhancement,
            1,
            "Armor attunement",
        ));
        session.effects.add_effect(Effect::numeric(
            "abp_shield_ac.shield",
            targets::AC_SHIELD,
            BonusType::Enhancement,
            1,
            "Shield attunement",
        ));
        let abilities = abilities(&character, &session);

        let ac = CombatBuilder::new(&session, &character, &abilities).armor_class();
        // 10 + 2 dex (capped) + 4 + 1 armor + 2 + 1 shield + 1 dodge + 1 deflection
        assert_eq!(ac.normal.total, 22);
        assert_eq!(ac.touch.total, 14);
        assert_eq!(ac.flat_footed.total, 19);
    }

    #[test]
    fn armor_typed_ac_bonus_overlaps_worn_armor() {
        let mut character = fighter([10, 10, 10, 10, 10, 10], 1);
        character.armor.armor_bonus = 4;
        let mut session = StatSession::default();
        session.effects.add_effect(ac_effect("feat_mage_armor_ac", BonusType::Armor, 4));
        session.effects.add_effect(ac_effect("feat_buckler_ac", BonusType::Shield, 1));
        session.effects.add_effect(ac_effect("feat_hide_ac", BonusType::NaturalArmor, 2));
        session.effects.add_effect(Effect::numeric(
            "feat_bark_ac.natural",
            targets::AC_NATURAL,
            BonusType::NaturalArmor,
            3,
            "Barkskin",
        ));
        let abilities = abilities(&character, &session);

        let ac = CombatBuilder::new(&session, &character, &abilities).armor_class();
        // 10 + 4 armor + 1 shield + 3 natural
        assert_eq!(ac.normal.total, 18);
        assert_eq!(ac.touch.total, 10);
        assert_eq!(ac.flat_footed.total, 18);
    }

    #[test]
    fn armor_typed_ac_bonus_alone_counts_once() {
        let mut character = fighter([10, 10, 10, 10, 10, 10], 1);
        character.armor.armor_bonus = 4;
        let mut session = StatSession::default();
        session.effects.add_effect(ac_effect("feat_mage_armor_ac", BonusType::Armor, 4));
        let abilities = abilities(&character, &session);

        let ac = CombatBuilder::new(&session, &character, &abilities).armor_class();
        assert_eq!(ac.normal.total, 14);
        assert_eq!(ac.touch.total, 10);
    }

    #[test]
    fn flat_footed_keeps_dex_penalty() {
        let character = fighter([10, 6, 10, 10, 10, 10], 1);
        let session = StatSession::default();
        let abilities = abilities(&character, &session);
        let ac = CombatBuilder::new(&session, &character, &abilities).armor_class();
        assert_eq!(ac.normal.total, 8);
        assert_eq!(ac.flat_footed.total, 8);
    }

    #[test]
    fn cmd_takes_only_allowed_ac_types() {
        let character = fighter([14, 12, 10, 10, 10, 10], 4);
        let mut session = StatSession::default();
        session.effects.add_effect(ac_effect("feat_dodge_ac", BonusType::Dodge, 1));
        session.effects.add_effect(ac_effect("feat_hide_ac", BonusType::NaturalArmor, 2));
        session.effects.add_effect(ac_effect("size_category_ac", BonusType::Size, 1));
        session.effects.add_effect(Effect::numeric(
            "size_category_cmd",
            targets::CMD,
            BonusType::Size,
            -1,
            "Size (small)",
        ));
        let abilities = abilities(&character, &session);
        let builder = CombatBuilder::new(&session, &character, &abilities);

        // 10 + 4 + 2 + 1 - 1 + 1 dodge
        assert_eq!(builder.cmd().total, 17);
        assert_eq!(builder.cmb().total, 6);
    }
}
