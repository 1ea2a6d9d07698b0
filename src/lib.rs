//! Roll tabletop RPG dice notation with keep/drop, reroll and exploding
//! modifiers, plus the character traits that change how dice behave.
//!
//! ```rust
//! # use dnd_dice::{parse_dice_expression, parse_dice_expression_with, RollOptions, ScriptedRolls};
//! # use rand::rngs::StdRng;
//! # use rand::SeedableRng;
//! #
//! # fn main() -> Result<(), dnd_dice::DiceError> {
//! // Roll 4 d6 and drop the lowest one.
//! let rolled = parse_dice_expression("4d6dl1", &RollOptions::default())?;
//! println!("{rolled}"); // +4d6dl1=[6,3,5]=14 = 14
//!
//! // Use a custom Rng that implements the rand::Rng trait
//! let mut rng = StdRng::seed_from_u64(1);
//! let rolled = parse_dice_expression_with("2d20kh1+5", &RollOptions::default(), &mut rng)?;
//! assert!((6..=25).contains(&rolled.total));
//!
//! // Or replay faces you already know
//! let mut faces = ScriptedRolls::new([4, 5]);
//! let rolled = parse_dice_expression_with("2d6+3", &RollOptions::default(), &mut faces)?;
//! assert_eq!(rolled.breakdown, "+2d6=[4,5]=9 +3 = 12");
//! # Ok(())
//! # }
//! ```

mod error;
mod evaluate;
mod options;
mod parse;
mod shortcuts;

pub use error::DiceError;
pub use evaluate::dice_roll::{apply_floor, apply_keep_drop};
pub use evaluate::expression::{RollDetails, RollResult};
pub use evaluate::roll::{DiceRng, RolledDie, ScriptedRolls};
pub use options::{
    Participant, RollContext, RollOptions, TraitsConfig, DEFAULT_MAX_EXPLOSIONS,
    DEFAULT_MAX_REROLLS,
};
pub use parse::{
    double_dice, expand_for_critical, normalize, to_notation, tokenize, DiceGroup, Expression,
    KeepKind, Modifier, ParsedModifiers, Sign, Term, TermKind, Token, MAX_DICE_COUNT,
    MAX_DICE_SIDES, MIN_DICE_COUNT, MIN_DICE_SIDES,
};
pub use shortcuts::*;

/// Parses the notation returning the parsed terms without rolling the dice.
pub fn parse(notation: &str) -> Result<Expression, DiceError> {
    Expression::parse(notation)
}

/// Parses the notation and rolls it.
/// Uses rand::thread_rng(), if you want to choose the rng yourself use `parse_dice_expression_with()`
pub fn parse_dice_expression(
    notation: &str,
    options: &RollOptions,
) -> Result<RollResult, DiceError> {
    parse_dice_expression_with(notation, options, &mut rand::thread_rng())
}

/// Same as `parse_dice_expression()` but allows you to choose the source of the dice faces.
pub fn parse_dice_expression_with(
    notation: &str,
    options: &RollOptions,
    rng: &mut impl DiceRng,
) -> Result<RollResult, DiceError> {
    let tokens = tokenize(&normalize(notation))?;
    roll_tokens(&tokens, options, rng)
}

/// Classifies and rolls already tokenized terms, adding the extra critical
/// dice first when the context asks for them.
pub(crate) fn roll_tokens(
    tokens: &[Token],
    options: &RollOptions,
    rng: &mut impl DiceRng,
) -> Result<RollResult, DiceError> {
    let notation = to_notation(tokens);
    let expanded = expand_for_critical(tokens, &options.traits, &options.context);
    let expression = Expression::from_tokens(&expanded)?;

    Ok(expression.roll_with(notation, options, rng))
}
