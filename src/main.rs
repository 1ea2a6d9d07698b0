use std::process::ExitCode;

use clap::Parser;
use dnd_dice::{
    parse_dice_expression_with, roll_ability_score_with, roll_advantage_with,
    roll_critical_with, roll_disadvantage_with, roll_elven_accuracy_with,
    validate_dice_expression, DiceError, DiceRng, RollContext, RollOptions, SimpleRoll,
    TraitsConfig,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Roll tabletop RPG dice notation
#[derive(Parser, Debug)]
#[command(name = "dnd-dice", version, about = "Roll dice notation like 2d6+3 or 4d6dl1")]
struct Args {
    /// Dice notation to roll
    #[arg(default_value = "1d20")]
    notation: String,

    /// Only check the notation, don't roll it
    #[arg(long)]
    validate: bool,

    /// Roll 2d20 and keep the highest
    #[arg(long, conflicts_with_all = ["disadvantage", "elven_accuracy", "ability_score", "critical"])]
    advantage: bool,

    /// Roll 2d20 and keep the lowest
    #[arg(long, conflicts_with_all = ["elven_accuracy", "ability_score", "critical"])]
    disadvantage: bool,

    /// Roll 3d20 and keep the highest
    #[arg(long, conflicts_with_all = ["ability_score", "critical"])]
    elven_accuracy: bool,

    /// Roll 4d6 and drop the lowest
    #[arg(long, conflicts_with = "critical")]
    ability_score: bool,

    /// Double the dice of the notation as a critical hit
    #[arg(long)]
    critical: bool,

    /// Seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = dnd_dice::DEFAULT_MAX_EXPLOSIONS)]
    max_explosions: usize,

    #[arg(long, default_value_t = dnd_dice::DEFAULT_MAX_REROLLS)]
    max_rerolls: usize,

    /// Keep rerolling a die while it's still eligible, up to --max-rerolls
    #[arg(long)]
    reroll_repeatedly: bool,

    #[arg(long)]
    halfling_lucky: bool,

    #[arg(long)]
    great_weapon_fighting: bool,

    #[arg(long)]
    savage_attacks: bool,

    /// Extra weapon dice on a critical hit
    #[arg(long, default_value_t = 0)]
    brutal_critical: u32,

    /// Minimum d20 face on ability checks
    #[arg(long)]
    reliable_talent: Option<u32>,

    #[arg(long)]
    attack: bool,

    #[arg(long)]
    check: bool,

    #[arg(long)]
    save: bool,

    #[arg(long)]
    damage: bool,

    /// Sides of the weapon die used for extra critical dice
    #[arg(long)]
    weapon_die: Option<u32>,
}

impl Args {
    fn options(&self) -> RollOptions {
        RollOptions {
            max_explosions: self.max_explosions,
            max_rerolls: self.max_rerolls,
            reroll_once: !self.reroll_repeatedly,
            traits: TraitsConfig {
                halfling_lucky: self.halfling_lucky,
                great_weapon_fighting: self.great_weapon_fighting,
                savage_attacks: self.savage_attacks,
                brutal_critical_dice: self.brutal_critical,
                reliable_talent_floor: self.reliable_talent,
            },
            context: RollContext {
                is_attack_roll: self.attack,
                is_ability_check: self.check,
                is_saving_throw: self.save,
                is_damage_roll: self.damage,
                weapon_die_size: self.weapon_die,
                ..Default::default()
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnd_dice=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.validate {
        let validation = validate_dice_expression(&args.notation);
        return match validation.error {
            None => {
                println!("{} is valid", args.notation);
                ExitCode::SUCCESS
            }
            Some(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        };
    }

    let printed = match args.seed {
        Some(seed) => roll(&args, &mut StdRng::seed_from_u64(seed)),
        None => roll(&args, &mut rand::thread_rng()),
    };

    match printed {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn roll(args: &Args, rng: &mut impl DiceRng) -> Result<String, DiceError> {
    let options = args.options();

    let simple = |rolled: SimpleRoll| format!("{} {:?}", rolled.breakdown, rolled.rolls);
    let line = if args.advantage {
        simple(roll_advantage_with(&options, rng))
    } else if args.disadvantage {
        simple(roll_disadvantage_with(&options, rng))
    } else if args.elven_accuracy {
        simple(roll_elven_accuracy_with(&options, rng))
    } else if args.ability_score {
        simple(roll_ability_score_with(rng))
    } else if args.critical {
        roll_critical_with(&args.notation, &options, rng)?.to_string()
    } else {
        parse_dice_expression_with(&args.notation, &options, rng)?.to_string()
    };

    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_options() {
        let args = Args::parse_from([
            "dnd-dice",
            "2d6",
            "--damage",
            "--great-weapon-fighting",
            "--weapon-die",
            "6",
            "--reroll-repeatedly",
        ]);
        let options = args.options();

        assert!(options.traits.great_weapon_fighting);
        assert!(options.context.is_damage_roll);
        assert_eq!(options.context.weapon_die_size, Some(6));
        assert!(!options.reroll_once);
        assert_eq!(options.max_rerolls, dnd_dice::DEFAULT_MAX_REROLLS);
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let args = Args::parse_from(["dnd-dice", "3d8+2", "--seed", "7"]);
        let first = roll(&args, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = roll(&args, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conflicting_shortcuts() {
        let res = Args::try_parse_from(["dnd-dice", "--advantage", "--disadvantage"]);
        assert!(res.is_err());
    }
}
