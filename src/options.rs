/// Rule toggles that change how individual dice behave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraitsConfig {
    /// Reroll a natural 1 on d20 attacks, ability checks and saving throws.
    pub halfling_lucky: bool,
    /// Reroll 1s and 2s on damage dice.
    pub great_weapon_fighting: bool,
    /// One extra weapon die on a critical hit.
    pub savage_attacks: bool,
    /// Extra weapon dice on a critical hit, 0 when the trait is missing.
    pub brutal_critical_dice: u32,
    /// Minimum d20 face on ability checks.
    pub reliable_talent_floor: Option<u32>,
}

/// Who is rolling or being rolled against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Participant {
    pub name: String,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: Option<u32>,
}

/// What the roll is for. Traits only trigger on the kinds of roll they name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RollContext {
    pub is_attack_roll: bool,
    pub is_ability_check: bool,
    pub is_saving_throw: bool,
    pub is_damage_roll: bool,
    pub is_critical: bool,
    pub is_healing: bool,
    pub is_death_save: bool,
    pub is_opportunity_attack: bool,
    /// Sides of the weapon die, used for the extra critical dice.
    pub weapon_die_size: Option<u32>,
    pub actor: Option<Participant>,
    pub target: Option<Participant>,
}

impl RollContext {
    /// Halfling luck applies to these.
    pub fn is_d20_test(&self) -> bool {
        self.is_attack_roll || self.is_ability_check || self.is_saving_throw
    }

    pub(crate) fn actor_name(&self) -> &str {
        self.actor.as_ref().map_or("", |actor| actor.name.as_str())
    }
}

pub const DEFAULT_MAX_EXPLOSIONS: usize = 10;
pub const DEFAULT_MAX_REROLLS: usize = 10;

/// Everything that tunes a single evaluation.
///
/// ```rust
/// # use dnd_dice::{RollOptions, TraitsConfig};
/// let options = RollOptions {
///     traits: TraitsConfig {
///         great_weapon_fighting: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// assert_eq!(options.max_rerolls, 10);
/// assert!(options.reroll_once);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RollOptions {
    /// Extra dice a single die can add by exploding.
    pub max_explosions: usize,
    /// Rerolls a single die can take when `reroll_once` is off.
    pub max_rerolls: usize,
    /// A rerolled die is never rerolled again, even if it's still eligible.
    pub reroll_once: bool,
    pub traits: TraitsConfig,
    pub context: RollContext,
}

impl Default for RollOptions {
    fn default() -> Self {
        Self {
            max_explosions: DEFAULT_MAX_EXPLOSIONS,
            max_rerolls: DEFAULT_MAX_REROLLS,
            reroll_once: true,
            traits: TraitsConfig::default(),
            context: RollContext::default(),
        }
    }
}

impl RollOptions {
    pub(crate) fn reroll_limit(&self) -> usize {
        if self.reroll_once {
            self.max_rerolls.min(1)
        } else {
            self.max_rerolls
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reroll_limit_once() {
        let options = RollOptions::default();
        assert_eq!(options.reroll_limit(), 1);
    }

    #[test]
    fn test_reroll_limit_unbounded_once_disabled() {
        let options = RollOptions {
            reroll_once: false,
            max_rerolls: 4,
            ..Default::default()
        };
        assert_eq!(options.reroll_limit(), 4);
    }

    #[test]
    fn test_reroll_limit_zero_disables_rerolls() {
        let options = RollOptions {
            max_rerolls: 0,
            ..Default::default()
        };
        assert_eq!(options.reroll_limit(), 0);
    }

    #[test]
    fn test_d20_test_context() {
        let context = RollContext {
            is_saving_throw: true,
            ..Default::default()
        };
        assert!(context.is_d20_test());
        assert!(!RollContext::default().is_d20_test());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: RollOptions =
            serde_json::from_str(r#"{"traits": {"halfling_lucky": true}}"#).unwrap();
        assert!(options.traits.halfling_lucky);
        assert_eq!(options.max_explosions, DEFAULT_MAX_EXPLOSIONS);
        assert!(options.reroll_once);
    }
}
