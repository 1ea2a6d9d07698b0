use rand::Rng;

/// One die after every modifier that touches it has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolledDie {
    pub(crate) value: u32,
    pub(crate) modifier_flags: u8,
}

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum ModifierFlags {
    ReRoll,
    Exploded,
    Floored,
    Drop,
}

pub const MODIFIER_NOTATION: [&str; 4] = ["r", "!", "^", "d"];

impl RolledDie {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            modifier_flags: 0,
        }
    }

    /// A die added to the group because the previous one exploded.
    pub fn exploded(value: u32) -> Self {
        let mut die = Self::new(value);
        die.set_modifier_flag(ModifierFlags::Exploded as u8);
        die
    }

    /// The same die with a new face, keeping every flag it had.
    pub fn rerolled_as(self, value: u32) -> Self {
        let mut die = Self { value, ..self };
        die.set_modifier_flag(ModifierFlags::ReRoll as u8);
        die
    }

    pub fn value(&self) -> u32 {
        self.value
    }
    pub fn dropped(&self) -> bool {
        self.was_modifier_applied(ModifierFlags::Drop as u8)
    }
    pub fn rerolled(&self) -> bool {
        self.was_modifier_applied(ModifierFlags::ReRoll as u8)
    }
    pub fn is_exploded(&self) -> bool {
        self.was_modifier_applied(ModifierFlags::Exploded as u8)
    }
    pub fn floored(&self) -> bool {
        self.was_modifier_applied(ModifierFlags::Floored as u8)
    }

    pub(crate) fn set_modifier_flag(&mut self, modifier_flag: u8) {
        self.modifier_flags |= 1 << modifier_flag;
    }

    pub(crate) fn was_modifier_applied(&self, modifier_flag: u8) -> bool {
        (self.modifier_flags & (1 << modifier_flag)) != 0
    }
}

/// Where die faces come from.
///
/// Every [rand::Rng] is a source of uniform faces, [ScriptedRolls] replays
/// a recorded sequence instead.
pub trait DiceRng {
    /// A face in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng> DiceRng for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// Replays a fixed sequence of faces, starting over once it runs out.
///
/// Faces bigger than the die being rolled wrap around so they always land in `1..=sides`.
///
/// ```rust
/// # use dnd_dice::{parse_dice_expression_with, RollOptions, ScriptedRolls};
/// let mut rolls = ScriptedRolls::new([4, 5]);
/// let rolled = parse_dice_expression_with("2d6+3", &RollOptions::default(), &mut rolls).unwrap();
/// assert_eq!(rolled.total, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRolls {
    faces: Vec<u32>,
    next: usize,
}

impl ScriptedRolls {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
        }
    }

    /// How many faces have been handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl DiceRng for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() || sides == 0 {
            return 1;
        }

        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        (face.max(1) - 1) % sides + 1
    }
}

impl std::fmt::Display for RolledDie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut str = format!("{}", self.value);
        for (i, notation) in MODIFIER_NOTATION.iter().enumerate() {
            if self.was_modifier_applied(i as u8) {
                str.push_str(notation);
            }
        }
        write!(f, "{}", str)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RolledDie {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("RolledDie", 5)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("dropped", &self.dropped())?;
        state.serialize_field("rerolled", &self.rerolled())?;
        state.serialize_field("exploded", &self.is_exploded())?;
        state.serialize_field("floored", &self.floored())?;
        state.end()
    }
}

pub fn to_notations(rolls: &[RolledDie]) -> String {
    format!(
        "[{}]",
        rolls
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_flags_accumulate() {
        let mut die = RolledDie::new(1).rerolled_as(3);
        die.set_modifier_flag(ModifierFlags::Drop as u8);

        assert_eq!(die.value(), 3);
        assert!(die.rerolled());
        assert!(die.dropped());
        assert!(!die.floored());
        assert!(!die.is_exploded());
    }

    #[test]
    fn test_rerolled_keeps_exploded_flag() {
        let die = RolledDie::exploded(6).rerolled_as(2);
        assert!(die.is_exploded());
        assert!(die.rerolled());
    }

    #[test]
    fn test_notation() {
        let mut floored = RolledDie::new(10);
        floored.set_modifier_flag(ModifierFlags::Floored as u8);
        let mut dropped = RolledDie::new(1).rerolled_as(2);
        dropped.set_modifier_flag(ModifierFlags::Drop as u8);

        let rolls = [RolledDie::new(5), RolledDie::exploded(6), floored, dropped];
        assert_eq!(to_notations(&rolls), "[5, 6!, 10^, 2rd]");
    }

    #[test]
    fn test_scripted_rolls_cycle_and_wrap() {
        let mut rolls = ScriptedRolls::new([3, 8]);
        assert_eq!(rolls.roll_die(6), 3);
        assert_eq!(rolls.roll_die(6), 2);
        assert_eq!(rolls.roll_die(20), 3);
        assert_eq!(rolls.roll_die(20), 8);
        assert_eq!(rolls.consumed(), 4);
    }

    #[test]
    fn test_scripted_rolls_zero_face_is_one() {
        let mut rolls = ScriptedRolls::new([0]);
        assert_eq!(rolls.roll_die(6), 1);
    }

    #[test]
    fn test_rng_faces_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for sides in [2, 6, 20, 100, 1000] {
            for _ in 0..200 {
                let face = rng.roll_die(sides);
                assert!((1..=sides).contains(&face));
            }
        }
    }
}
