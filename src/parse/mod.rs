mod dice;
mod expression;

pub use dice::*;
pub use expression::*;

pub const MIN_DICE_COUNT: u32 = 1;
pub const MAX_DICE_COUNT: u32 = 100;
pub const MIN_DICE_SIDES: u32 = 2;
pub const MAX_DICE_SIDES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn apply(self, value: i64) -> i64 {
        match self {
            Sign::Plus => value,
            Sign::Minus => -value,
        }
    }
}

/// A signed run of the expression before it's been classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub sign: Sign,
    pub body: String,
}

impl Token {
    pub fn new(sign: Sign, body: impl Into<String>) -> Self {
        Self {
            sign,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub sign: Sign,
    /// The term as it was written, without its sign.
    pub notation: String,
    pub kind: TermKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// `{value}`\
    /// A flat number added to or subtracted from the total.
    Flat(u32),
    /// `{count}d{sides}{modifiers}`\
    /// A group of dice rolled together.
    Dice(DiceGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiceGroup {
    pub count: u32,
    pub sides: u32,
    pub modifiers: ParsedModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepKind {
    Highest,
    Lowest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A single modifier as it was written after the dice.
/// They're folded into [ParsedModifiers](ParsedModifiers) while parsing.
pub enum Modifier {
    /// `kh{amount}` or `kl{amount}`\
    /// Drops every roll except the highest or lowest `{amount}`.
    Keep(KeepKind, u32),
    /// `dh{amount}` or `dl{amount}`\
    /// Drops `{amount}` of the highest or lowest rolls.
    Drop(KeepKind, u32),
    /// `r{value}`\
    /// Rerolls the dice whenever it lands on `{value}`.
    ReRoll(u32),
    /// `!`\
    /// Rolls an additional die whenever the highest face is rolled, the extra die can explode again.
    Exploding,
}

/// Every modifier written after a dice group.
///
/// Keep and drop amounts are all remembered but only one of them is applied,
/// see [keep_rule](ParsedModifiers::keep_rule).
/// If the same keep/drop modifier is written more than once the last one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModifiers {
    pub keep_highest: Option<u32>,
    pub keep_lowest: Option<u32>,
    pub drop_highest: Option<u32>,
    pub drop_lowest: Option<u32>,
    /// Faces that trigger a reroll. Faces the dice can't land on are ignored.
    pub reroll_on: Vec<u32>,
    pub explode: bool,
}

impl ParsedModifiers {
    pub(crate) fn with(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Keep(KeepKind::Highest, n) => self.keep_highest = Some(n),
            Modifier::Keep(KeepKind::Lowest, n) => self.keep_lowest = Some(n),
            Modifier::Drop(KeepKind::Highest, n) => self.drop_highest = Some(n),
            Modifier::Drop(KeepKind::Lowest, n) => self.drop_lowest = Some(n),
            Modifier::ReRoll(value) => self.reroll_on.push(value),
            Modifier::Exploding => self.explode = true,
        }
        self
    }

    /// The keep/drop rule that actually gets applied.
    /// Keep highest wins over keep lowest, which wins over drop highest, which wins over drop lowest.
    pub fn keep_rule(&self) -> Option<Modifier> {
        self.keep_highest
            .map(|n| Modifier::Keep(KeepKind::Highest, n))
            .or(self.keep_lowest.map(|n| Modifier::Keep(KeepKind::Lowest, n)))
            .or(self.drop_highest.map(|n| Modifier::Drop(KeepKind::Highest, n)))
            .or(self.drop_lowest.map(|n| Modifier::Drop(KeepKind::Lowest, n)))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl DiceGroup {
    pub fn new(count: u32, sides: u32, modifiers: ParsedModifiers) -> Self {
        Self {
            count,
            sides,
            modifiers,
        }
    }

    /// The face that makes a die explode, if the group explodes at all.
    pub fn explode_on(&self) -> Option<u32> {
        self.modifiers.explode.then_some(self.sides)
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        };
        write!(f, "{str}")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.sign, self.body)
    }
}

impl std::fmt::Display for KeepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            KeepKind::Highest => "h",
            KeepKind::Lowest => "l",
        };
        write!(f, "{str}")
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modifier::Keep(kind, amount) => write!(f, "k{kind}{amount}"),
            Modifier::Drop(kind, amount) => write!(f, "d{kind}{amount}"),
            Modifier::ReRoll(value) => write!(f, "r{value}"),
            Modifier::Exploding => write!(f, "!"),
        }
    }
}

impl std::fmt::Display for ParsedModifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keeps = [
            self.keep_highest.map(|n| Modifier::Keep(KeepKind::Highest, n)),
            self.keep_lowest.map(|n| Modifier::Keep(KeepKind::Lowest, n)),
            self.drop_highest.map(|n| Modifier::Drop(KeepKind::Highest, n)),
            self.drop_lowest.map(|n| Modifier::Drop(KeepKind::Lowest, n)),
        ];
        let rerolls = self.reroll_on.iter().map(|&v| Some(Modifier::ReRoll(v)));
        let exploding = self.explode.then_some(Modifier::Exploding);

        for modifier in keeps.into_iter().chain(rerolls).chain([exploding]).flatten() {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}{}", self.count, self.sides, self.modifiers)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TermKind::Flat(value) => write!(f, "{}{value}", self.sign),
            TermKind::Dice(group) => write!(f, "{}{group}", self.sign),
        }
    }
}
