use tracing::{debug, trace};

use super::roll::{to_notations, DiceRng, ModifierFlags, RolledDie};
use crate::parse::{DiceGroup, KeepKind, Modifier};
use crate::RollOptions;

const D20: u32 = 20;

impl DiceGroup {
    /// Rolls every die in the group and applies the group's modifiers and the
    /// traits from `options`.
    ///
    /// Each die is settled (rerolled if needed) and then explodes, the extra
    /// dice are placed right after the die that exploded.
    /// Keep/drop runs on the whole group afterwards and the reliable talent
    /// floor runs last so it can't change which dice were dropped.
    pub fn roll_with(&self, options: &RollOptions, rng: &mut impl DiceRng) -> Vec<RolledDie> {
        let mut rolls = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            let first_face = rng.roll_die(self.sides);
            let settled = self.settle(first_face, options, rng);
            let chain = self.explosion_chain(&settled, options, rng);

            rolls.push(settled);
            rolls.extend(chain);
        }

        if let Some(rule) = self.modifiers.keep_rule() {
            apply_keep_drop(&mut rolls, rule);
        }

        if let Some(floor) = self.reliable_talent_floor(options) {
            apply_floor(&mut rolls, floor);
        }

        trace!(group = %self, rolls = %to_notations(&rolls), "rolled dice group");
        rolls
    }

    fn settle(&self, face: u32, options: &RollOptions, rng: &mut impl DiceRng) -> RolledDie {
        let limit = options.reroll_limit();
        let mut die = RolledDie::new(face);

        for _ in 0..limit {
            if !self.should_reroll(die.value, options) {
                return die;
            }
            die = die.rerolled_as(rng.roll_die(self.sides));
        }

        if limit > 0 && !options.reroll_once && self.should_reroll(die.value, options) {
            debug!(group = %self, limit, "reroll limit reached");
        }
        die
    }

    fn explosion_chain(
        &self,
        settled: &RolledDie,
        options: &RollOptions,
        rng: &mut impl DiceRng,
    ) -> Vec<RolledDie> {
        let Some(explode_on) = self.explode_on() else {
            return Vec::new();
        };

        let mut chain = Vec::new();
        let mut last_value = settled.value;
        while last_value == explode_on {
            if chain.len() >= options.max_explosions {
                debug!(group = %self, limit = options.max_explosions, "explosion limit reached");
                break;
            }

            let die = RolledDie::exploded(rng.roll_die(self.sides));
            last_value = die.value;
            chain.push(die);
        }
        chain
    }

    pub(crate) fn should_reroll(&self, value: u32, options: &RollOptions) -> bool {
        let traits = &options.traits;
        let context = &options.context;

        let notation = self.modifiers.reroll_on.contains(&value);
        let halfling_lucky = traits.halfling_lucky
            && self.sides == D20
            && value == 1
            && context.is_d20_test();
        let great_weapon_fighting =
            traits.great_weapon_fighting && context.is_damage_roll && (value == 1 || value == 2);

        notation || halfling_lucky || great_weapon_fighting
    }

    fn reliable_talent_floor(&self, options: &RollOptions) -> Option<u32> {
        options
            .traits
            .reliable_talent_floor
            .filter(|_| options.context.is_ability_check && self.sides == D20)
    }
}

/// Marks the dice outside the rule as dropped.
///
/// The values are ranked from highest to lowest, for every rank that has to
/// go the first die (in roll order) with that value that isn't dropped yet
/// gets dropped. Amounts bigger than the group are clamped.
pub fn apply_keep_drop(rolls: &mut [RolledDie], rule: Modifier) {
    let len = rolls.len();
    let mut ranked: Vec<u32> = rolls.iter().map(|r| r.value).collect();
    ranked.sort_by(|a, b| b.cmp(a));

    let ranks_to_drop = match rule {
        Modifier::Keep(KeepKind::Highest, amount) => clamp(amount, len)..len,
        Modifier::Keep(KeepKind::Lowest, amount) => 0..len - clamp(amount, len),
        Modifier::Drop(KeepKind::Highest, amount) => 0..clamp(amount, len),
        Modifier::Drop(KeepKind::Lowest, amount) => len - clamp(amount, len)..len,
        Modifier::ReRoll(_) | Modifier::Exploding => return,
    };

    for rank in ranks_to_drop {
        let target = ranked[rank];
        if let Some(roll) = rolls.iter_mut().find(|r| !r.dropped() && r.value == target) {
            roll.set_modifier_flag(ModifierFlags::Drop as u8);
        }
    }
}

fn clamp(amount: u32, len: usize) -> usize {
    (amount as usize).min(len)
}

/// Raises every kept die below `floor` up to it.
pub fn apply_floor(rolls: &mut [RolledDie], floor: u32) {
    for roll in rolls.iter_mut().filter(|r| !r.dropped() && r.value < floor) {
        roll.value = floor;
        roll.set_modifier_flag(ModifierFlags::Floored as u8);
    }
}
