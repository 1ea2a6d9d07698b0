//! Common D&D rolls built on top of [parse_dice_expression](crate::parse_dice_expression).

use tracing::debug;

use crate::{
    double_dice, normalize, roll_tokens, tokenize, DiceError, DiceRng, Expression, KeepKind,
    RollContext, RollOptions, RollResult, TraitsConfig,
};

pub const ADVANTAGE: &str = "2d20kh1";
pub const DISADVANTAGE: &str = "2d20kl1";
pub const ELVEN_ACCURACY: &str = "3d20kh1";
pub const ABILITY_SCORE: &str = "4d6dl1";
pub const ABILITY_CHECK: &str = "1d20";
pub const RELIABLE_TALENT_FLOOR: u32 = 10;

/// A roll where only the faces and the result matter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleRoll {
    /// Every face rolled, the ones that didn't count included.
    pub rolls: Vec<u32>,
    pub result: i64,
    pub breakdown: String,
}

impl From<RollResult> for SimpleRoll {
    fn from(rolled: RollResult) -> Self {
        Self {
            rolls: rolled.rolls.iter().map(|r| r.value()).collect(),
            result: rolled.total,
            breakdown: rolled.breakdown,
        }
    }
}

/// Outcome of [validate_dice_expression].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

pub fn roll_advantage(options: &RollOptions) -> SimpleRoll {
    roll_advantage_with(options, &mut rand::thread_rng())
}

/// Rolls two d20 and keeps the highest.
pub fn roll_advantage_with(options: &RollOptions, rng: &mut impl DiceRng) -> SimpleRoll {
    keep_one_d20(ADVANTAGE, 2, KeepKind::Highest, options, rng)
}

pub fn roll_disadvantage(options: &RollOptions) -> SimpleRoll {
    roll_disadvantage_with(options, &mut rand::thread_rng())
}

/// Rolls two d20 and keeps the lowest.
pub fn roll_disadvantage_with(options: &RollOptions, rng: &mut impl DiceRng) -> SimpleRoll {
    keep_one_d20(DISADVANTAGE, 2, KeepKind::Lowest, options, rng)
}

pub fn roll_elven_accuracy(options: &RollOptions) -> SimpleRoll {
    roll_elven_accuracy_with(options, &mut rand::thread_rng())
}

/// Advantage with a third d20.
pub fn roll_elven_accuracy_with(options: &RollOptions, rng: &mut impl DiceRng) -> SimpleRoll {
    keep_one_d20(ELVEN_ACCURACY, 3, KeepKind::Highest, options, rng)
}

fn keep_one_d20(
    notation: &str,
    amount: usize,
    keep: KeepKind,
    options: &RollOptions,
    rng: &mut impl DiceRng,
) -> SimpleRoll {
    match crate::parse_dice_expression_with(notation, options, rng) {
        Ok(rolled) => rolled.into(),
        Err(err) => {
            debug!(%err, notation, "rolling d20s by hand");
            manual_d20s(notation, amount, keep, rng)
        }
    }
}

fn manual_d20s(
    notation: &str,
    amount: usize,
    keep: KeepKind,
    rng: &mut impl DiceRng,
) -> SimpleRoll {
    let rolls: Vec<u32> = (0..amount).map(|_| rng.roll_die(20)).collect();
    let result = match keep {
        KeepKind::Highest => rolls.iter().max(),
        KeepKind::Lowest => rolls.iter().min(),
    }
    .copied()
    .map_or(0, i64::from);

    SimpleRoll {
        rolls,
        result,
        breakdown: format!("+{notation}=[{result}]={result} = {result}"),
    }
}

pub fn roll_ability_score() -> SimpleRoll {
    roll_ability_score_with(&mut rand::thread_rng())
}

/// Rolls 4d6 and drops the lowest.
pub fn roll_ability_score_with(rng: &mut impl DiceRng) -> SimpleRoll {
    match crate::parse_dice_expression_with(ABILITY_SCORE, &RollOptions::default(), rng) {
        Ok(rolled) => rolled.into(),
        Err(err) => unreachable!("{ABILITY_SCORE} is valid notation: {err}"),
    }
}

pub fn roll_reliable_talent(notation: &str, floor: u32) -> Result<RollResult, DiceError> {
    roll_reliable_talent_with(notation, floor, &mut rand::thread_rng())
}

/// Rolls an ability check where no d20 can land below `floor`.
/// [ABILITY_CHECK] and [RELIABLE_TALENT_FLOOR] are the usual arguments.
pub fn roll_reliable_talent_with(
    notation: &str,
    floor: u32,
    rng: &mut impl DiceRng,
) -> Result<RollResult, DiceError> {
    let options = RollOptions {
        traits: TraitsConfig {
            reliable_talent_floor: Some(floor),
            ..Default::default()
        },
        context: RollContext {
            is_ability_check: true,
            ..Default::default()
        },
        ..Default::default()
    };

    crate::parse_dice_expression_with(notation, &options, rng)
}

pub fn roll_critical(notation: &str, options: &RollOptions) -> Result<RollResult, DiceError> {
    roll_critical_with(notation, options, &mut rand::thread_rng())
}

/// Rolls a critical hit: every dice group rolls twice as many dice.
/// Extra weapon dice from traits are added when the context is a damage roll.
pub fn roll_critical_with(
    notation: &str,
    options: &RollOptions,
    rng: &mut impl DiceRng,
) -> Result<RollResult, DiceError> {
    let tokens = double_dice(&tokenize(&normalize(notation))?);
    let options = RollOptions {
        context: RollContext {
            is_critical: true,
            ..options.context.clone()
        },
        ..options.clone()
    };

    roll_tokens(&tokens, &options, rng)
}

/// Checks that the notation has at least one dice group and parses, without rolling anything.
pub fn validate_dice_expression(notation: &str) -> Validation {
    let checked = Expression::parse(notation).and_then(|expression| {
        if expression.has_dice() {
            Ok(())
        } else {
            Err(DiceError::NoDice)
        }
    });

    match checked {
        Ok(()) => Validation {
            valid: true,
            error: None,
        },
        Err(err) => Validation {
            valid: false,
            error: Some(err.to_string()),
        },
    }
}
