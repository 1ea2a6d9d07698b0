use thiserror::Error;

/// Reasons a notation can't be turned into a roll.
///
/// Every variant renders with the same `Invalid dice expression format` prefix
/// so callers can show the message as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice expression format: the expression is empty")]
    Empty,
    #[error("Invalid dice expression format: `{0}` is not a dice term or a number")]
    InvalidTerm(String),
    #[error("Invalid dice expression format: {count}d{sides} must roll 1-100 dice with 2-1000 sides")]
    OutOfBounds { count: u32, sides: u32 },
    #[error("Invalid dice expression format: no dice to roll")]
    NoDice,
}
