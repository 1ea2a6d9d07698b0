use tracing::debug;
use winnow::{
    ascii::dec_uint,
    combinator::{alt, opt, preceded, repeat},
    token::{rest, take_till},
    PResult, Parser,
};

use super::{parse_term, Sign, Term, TermKind, Token};
use crate::{DiceError, RollContext, TraitsConfig};

/// A parsed notation that hasn't been rolled yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub terms: Vec<Term>,
}

impl Expression {
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let tokens = tokenize(&normalize(notation))?;
        Self::from_tokens(&tokens)
    }

    pub fn from_tokens(tokens: &[Token]) -> Result<Self, DiceError> {
        let terms = tokens.iter().map(parse_term).collect::<Result<_, _>>()?;
        Ok(Self { terms })
    }

    pub fn has_dice(&self) -> bool {
        self.terms
            .iter()
            .any(|term| matches!(term.kind, TermKind::Dice(_)))
    }
}

/// Strips every whitespace and lowercases the notation.
pub fn normalize(notation: &str) -> String {
    notation
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Splits a normalized notation into signed terms.
/// The first term doesn't need a sign, it defaults to `+`.
pub fn tokenize(normalized: &str) -> Result<Vec<Token>, DiceError> {
    if normalized.is_empty() {
        return Err(DiceError::Empty);
    }

    tokens
        .parse(normalized)
        .map_err(|_| DiceError::InvalidTerm(normalized.to_string()))
}

/// Joins tokens back into a notation, without the implied leading `+`.
pub fn to_notation(tokens: &[Token]) -> String {
    let joined: String = tokens.iter().map(|t| t.to_string()).collect();
    match joined.strip_prefix('+') {
        Some(stripped) => stripped.to_string(),
        None => joined,
    }
}

fn tokens(input: &mut &str) -> PResult<Vec<Token>> {
    let first = (opt(sign), term_body)
        .map(|(sign, body)| Token::new(sign.unwrap_or(Sign::Plus), body));
    let others = repeat(0.., (sign, term_body).map(|(sign, body)| Token::new(sign, body)));

    (first, others)
        .map(|(first, others): (Token, Vec<Token>)| {
            std::iter::once(first).chain(others).collect()
        })
        .parse_next(input)
}

fn sign(input: &mut &str) -> PResult<Sign> {
    alt(('+'.value(Sign::Plus), '-'.value(Sign::Minus))).parse_next(input)
}

fn term_body<'i>(input: &mut &'i str) -> PResult<&'i str> {
    take_till(1.., ['+', '-']).parse_next(input)
}

/// Appends the extra weapon dice granted on a confirmed critical damage roll.
/// Returns the tokens unchanged for any other roll.
pub fn expand_for_critical(
    tokens: &[Token],
    traits: &TraitsConfig,
    context: &RollContext,
) -> Vec<Token> {
    let mut expanded = tokens.to_vec();
    if !(context.is_critical && context.is_damage_roll) {
        return expanded;
    }
    let Some(weapon_die) = context.weapon_die_size else {
        return expanded;
    };

    // An oversized count is left for the bounds check to reject
    let extra = u32::from(traits.savage_attacks).saturating_add(traits.brutal_critical_dice);
    if extra > 0 {
        debug!(extra, weapon_die, actor = context.actor_name(), "adding critical dice");
        expanded.push(Token::new(Sign::Plus, format!("{extra}d{weapon_die}")));
    }

    expanded
}

/// Doubles the amount of dice in every dice token, `2d6+3` becomes `4d6+3`.
pub fn double_dice(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| Token::new(token.sign, double_dice_count(&token.body)))
        .collect()
}

fn double_dice_count(body: &str) -> String {
    dice_prefix
        .parse(body)
        .ok()
        .and_then(|(count, suffix)| {
            let doubled = count.unwrap_or(1).checked_mul(2)?;
            Some(format!("{doubled}d{suffix}"))
        })
        // Anything that isn't dice shaped is left for the classifier to reject
        .unwrap_or_else(|| body.to_string())
}

fn dice_prefix<'i>(input: &mut &'i str) -> PResult<(Option<u32>, &'i str)> {
    (opt(dec_uint), preceded('d', rest)).parse_next(input)
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: String = self.terms.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", joined.strip_prefix('+').unwrap_or(&joined))
    }
}
