use winnow::{
    ascii::dec_uint,
    combinator::{alt, cut_err, opt, preceded, repeat, separated_pair},
    PResult, Parser,
};

use super::{
    DiceGroup, KeepKind, Modifier, ParsedModifiers, Term, TermKind, Token, MAX_DICE_COUNT,
    MAX_DICE_SIDES, MIN_DICE_COUNT, MIN_DICE_SIDES,
};
use crate::DiceError;

const PERCENTILE_SIDES: u32 = 100;

/// Classifies a token as either a flat number or a dice group.
pub fn parse_term(token: &Token) -> Result<Term, DiceError> {
    let kind = alt((dice_group.map(TermKind::Dice), dec_uint.map(TermKind::Flat)))
        .parse(token.body.as_str())
        .map_err(|_| DiceError::InvalidTerm(token.body.clone()))?;

    if let TermKind::Dice(group) = &kind {
        check_bounds(group)?;
    }

    Ok(Term {
        sign: token.sign,
        notation: token.body.clone(),
        kind,
    })
}

fn check_bounds(group: &DiceGroup) -> Result<(), DiceError> {
    let count_in_range = (MIN_DICE_COUNT..=MAX_DICE_COUNT).contains(&group.count);
    let sides_in_range = (MIN_DICE_SIDES..=MAX_DICE_SIDES).contains(&group.sides);

    if count_in_range && sides_in_range {
        Ok(())
    } else {
        Err(DiceError::OutOfBounds {
            count: group.count,
            sides: group.sides,
        })
    }
}

pub fn dice_group(input: &mut &str) -> PResult<DiceGroup> {
    separated_pair(
        opt(dec_uint),
        'd',
        cut_err((dice_sides, dice_modifiers)),
    )
    .map(|(count, (sides, modifiers))| DiceGroup::new(count.unwrap_or(1), sides, modifiers))
    .parse_next(input)
}

fn dice_sides(input: &mut &str) -> PResult<u32> {
    alt(('%'.value(PERCENTILE_SIDES), dec_uint)).parse_next(input)
}

fn dice_modifiers(input: &mut &str) -> PResult<ParsedModifiers> {
    repeat(0.., modifier)
        .fold(ParsedModifiers::default, ParsedModifiers::with)
        .parse_next(input)
}

pub fn modifier(input: &mut &str) -> PResult<Modifier> {
    alt((
        preceded("kh", cut_err(dec_uint)).map(|n| Modifier::Keep(KeepKind::Highest, n)),
        preceded("kl", cut_err(dec_uint)).map(|n| Modifier::Keep(KeepKind::Lowest, n)),
        preceded("dh", cut_err(dec_uint)).map(|n| Modifier::Drop(KeepKind::Highest, n)),
        preceded("dl", cut_err(dec_uint)).map(|n| Modifier::Drop(KeepKind::Lowest, n)),
        preceded('r', cut_err(dec_uint)).map(Modifier::ReRoll),
        '!'.value(Modifier::Exploding),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use winnow::Parser;

    use super::*;
    use crate::parse::Sign;

    fn dice(body: &str) -> DiceGroup {
        let term = parse_term(&Token::new(Sign::Plus, body)).unwrap();
        let TermKind::Dice(group) = term.kind else {
            panic!("{body} is not a dice group")
        };
        group
    }

    /**
     * Classifying terms
     */

    #[test]
    fn test_one_standard_d6() {
        let group = dice("1d6");
        assert_eq!(group.count, 1);
        assert_eq!(group.sides, 6);
        assert!(group.modifiers.is_empty());
    }

    #[test]
    fn test_one_standard_d6_without_quantity() {
        let group = dice("d6");
        assert_eq!(group.count, 1);
        assert_eq!(group.sides, 6);
    }

    #[test]
    fn test_one_percentile_dice() {
        let group = dice("1d%");
        assert_eq!(group.count, 1);
        assert_eq!(group.sides, 100);
    }

    #[test]
    fn test_flat_term() {
        let term = parse_term(&Token::new(Sign::Minus, "3")).unwrap();
        assert_eq!(term.sign, Sign::Minus);
        assert_eq!(term.kind, TermKind::Flat(3));
    }

    #[test]
    fn test_term_keeps_written_notation() {
        for body in ["d%", "d20", "2d6!dl1"] {
            let term = parse_term(&Token::new(Sign::Plus, body)).unwrap();
            assert_eq!(term.notation, body);
        }

        let term = parse_term(&Token::new(Sign::Plus, "2d6!dl1")).unwrap();
        assert_eq!(term.to_string(), "+2d6dl1!");
    }

    #[test]
    fn test_dice_with_modifiers() {
        let group = dice("4d6dl1");
        assert_eq!(group.count, 4);
        assert_eq!(group.modifiers.drop_lowest, Some(1));

        let group = dice("2d20kh1");
        assert_eq!(group.modifiers.keep_highest, Some(1));

        let group = dice("4d6r1r2!");
        assert_eq!(group.modifiers.reroll_on, vec![1, 2]);
        assert!(group.modifiers.explode);
    }

    #[test]
    fn test_keep_amount_larger_than_group_is_accepted() {
        let group = dice("2d20kh5");
        assert_eq!(group.modifiers.keep_highest, Some(5));
    }

    #[test]
    fn test_reroll_value_outside_faces_is_accepted() {
        let group = dice("1d6r9");
        assert_eq!(group.modifiers.reroll_on, vec![9]);
    }

    #[test]
    fn test_invalid_terms() {
        for body in ["banana", "2d", "d", "2x6", "2d6x", "2d6kh", "2d6r", "1.5", ""] {
            let res = parse_term(&Token::new(Sign::Plus, body));
            assert_eq!(res, Err(DiceError::InvalidTerm(body.to_string())), "{body}");
        }
    }

    #[test]
    fn test_bounds() {
        let out_of_bounds = ["0d6", "101d6", "1d1", "1d0", "1d1001"];
        for body in out_of_bounds {
            let res = parse_term(&Token::new(Sign::Plus, body));
            assert!(matches!(res, Err(DiceError::OutOfBounds { .. })), "{body}");
        }

        for body in ["100d6", "1d2", "1d1000", "d%"] {
            assert!(parse_term(&Token::new(Sign::Plus, body)).is_ok(), "{body}");
        }
    }

    /**
     * Parsing modifiers alone
     */

    #[test]
    fn test_modifier_keep_highest() {
        let res = modifier.parse("kh3").unwrap();
        assert_eq!(res, Modifier::Keep(KeepKind::Highest, 3))
    }

    #[test]
    fn test_modifier_keep_highest_missing_amount() {
        assert!(modifier.parse("kh").is_err())
    }

    #[test]
    fn test_modifier_keep_lowest() {
        let res = modifier.parse("kl4").unwrap();
        assert_eq!(res, Modifier::Keep(KeepKind::Lowest, 4))
    }

    #[test]
    fn test_modifier_drop_highest() {
        let res = modifier.parse("dh3").unwrap();
        assert_eq!(res, Modifier::Drop(KeepKind::Highest, 3))
    }

    #[test]
    fn test_modifier_drop_lowest() {
        let res = modifier.parse("dl4").unwrap();
        assert_eq!(res, Modifier::Drop(KeepKind::Lowest, 4))
    }

    #[test]
    fn test_modifier_drop_lowest_missing_amount() {
        assert!(modifier.parse("dl").is_err())
    }

    #[test]
    fn test_modifier_reroll() {
        let res = modifier.parse("r1").unwrap();
        assert_eq!(res, Modifier::ReRoll(1))
    }

    #[test]
    fn test_modifier_exploding() {
        let res = modifier.parse("!").unwrap();
        assert_eq!(res, Modifier::Exploding)
    }

    #[test]
    fn test_modifier_unknown() {
        assert!(modifier.parse("k2").is_err());
        assert!(modifier.parse("min3").is_err());
    }
}
