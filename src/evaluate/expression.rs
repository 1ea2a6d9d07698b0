use super::roll::{DiceRng, RolledDie};
use crate::parse::{Expression, Sign, TermKind};
use crate::RollOptions;

/// The outcome of rolling an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RollResult {
    /// The normalized notation that was rolled.
    pub expression: String,
    /// Every die rolled, dropped ones included, in roll order.
    pub rolls: Vec<RolledDie>,
    /// Sum of the flat numbers in the expression.
    pub modifier: i64,
    pub total: i64,
    pub breakdown: String,
    pub details: Option<RollDetails>,
}

/// Die values sorted into what happened to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RollDetails {
    pub kept: Vec<u32>,
    pub dropped: Vec<u32>,
    pub rerolled: Vec<u32>,
    pub exploded: Vec<u32>,
    pub floored: Vec<u32>,
}

impl RollResult {
    pub fn kept(&self) -> impl Iterator<Item = &RolledDie> {
        self.rolls.iter().filter(|r| !r.dropped())
    }
}

impl RollDetails {
    fn collect(rolls: &[RolledDie]) -> Option<Self> {
        let bucket = |keep: fn(&RolledDie) -> bool| -> Vec<u32> {
            rolls.iter().filter(|r| keep(r)).map(|r| r.value()).collect()
        };

        let details = Self {
            kept: bucket(|r| !r.dropped()),
            dropped: bucket(RolledDie::dropped),
            rerolled: bucket(RolledDie::rerolled),
            exploded: bucket(RolledDie::is_exploded),
            floored: bucket(RolledDie::floored),
        };

        (details != Self::default()).then_some(details)
    }
}

impl Expression {
    /// Rolls every dice group and adds up the kept dice and the flat numbers.
    pub fn roll_with(
        &self,
        notation: String,
        options: &RollOptions,
        rng: &mut impl DiceRng,
    ) -> RollResult {
        let mut rolls = Vec::new();
        let mut fragments = Vec::with_capacity(self.terms.len() + 1);
        let mut dice_total: i64 = 0;
        let mut modifier: i64 = 0;

        for term in &self.terms {
            match &term.kind {
                TermKind::Flat(value) => modifier += term.sign.apply(i64::from(*value)),
                TermKind::Dice(group) => {
                    let group_rolls = group.roll_with(options, rng);
                    let kept: Vec<u32> = group_rolls
                        .iter()
                        .filter(|r| !r.dropped())
                        .map(|r| r.value())
                        .collect();
                    let subtotal = term.sign.apply(kept.iter().map(|&v| i64::from(v)).sum());

                    dice_total += subtotal;
                    fragments.push(dice_fragment(term.sign, &term.notation, &kept, subtotal));
                    rolls.extend(group_rolls);
                }
            }
        }

        if modifier != 0 || fragments.is_empty() {
            fragments.push(format!("{modifier:+}"));
        }

        let total = dice_total + modifier;
        let breakdown = format!("{} = {total}", fragments.join(" "));
        let details = RollDetails::collect(&rolls);

        RollResult {
            expression: notation,
            rolls,
            modifier,
            total,
            breakdown,
            details,
        }
    }
}

fn dice_fragment(sign: Sign, notation: &str, kept: &[u32], subtotal: i64) -> String {
    let kept = kept
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{sign}{notation}=[{kept}]={subtotal}")
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.breakdown)
    }
}
