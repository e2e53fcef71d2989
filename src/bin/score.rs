//! One-shot scoring CLI.
//!
//! Scores dice given on the command line, or rolls a fresh set with `--roll`.
//!
//! ```text
//! farkle-score 2 3 4 6 6 6
//! farkle-score --selection 1 5
//! farkle-score --roll --seed 7 --json
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use serde_json::json;

use farkle::core::{score, Dice, DiceRoller, ScoringResult};
use farkle::types::RollMode;

#[derive(Debug, Parser)]
#[command(name = "farkle-score", version, about = "Score a Farkle roll")]
struct Args {
    /// Face values to score (1-6).
    #[arg(allow_negative_numbers = true)]
    dice: Vec<i64>,

    /// Score a set-aside selection (1-6 dice) instead of a full roll.
    #[arg(long)]
    selection: bool,

    /// Roll six dice instead of reading them from the command line.
    #[arg(long, conflicts_with = "dice")]
    roll: bool,

    /// Seed for `--roll`; defaults to the current time.
    #[arg(long, requires = "roll")]
    seed: Option<u32>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (dice, mode) = if args.roll {
        let seed = args.seed.unwrap_or_else(time_seed);
        (DiceRoller::new(seed).roll(), RollMode::Roll)
    } else {
        let mode = if args.selection {
            RollMode::Selection
        } else {
            RollMode::Roll
        };
        match Dice::parse(&args.dice, mode) {
            Ok(dice) => (dice, mode),
            Err(e) => bail!("invalid dice: {}", e),
        }
    };

    let result = score(&dice);
    if args.json {
        print_json(&dice, mode, &result)?;
    } else {
        print_text(&dice, &result);
    }
    Ok(())
}

fn print_json(dice: &Dice, mode: RollMode, result: &ScoringResult) -> Result<()> {
    let v = json!({
        "dice": dice.values().as_slice(),
        "mode": mode.as_str(),
        "score": result.total,
        "combinations": result.descriptions(),
        "used_dice": result.used.as_slice(),
        "is_farkle": result.farkle,
    });
    println!("{}", serde_json::to_string_pretty(&v)?);
    Ok(())
}

fn print_text(dice: &Dice, result: &ScoringResult) {
    let faces: Vec<String> = dice.values().iter().map(|v| v.to_string()).collect();
    let marks: Vec<&str> = result.used.iter().map(|&u| if u { "^" } else { " " }).collect();

    println!("dice:   {}", faces.join(" "));
    println!("used:   {}", marks.join(" "));
    println!("score:  {}", result.total);
    println!("combos: {}", result.descriptions().join(", "));
    if result.farkle {
        println!("Farkle!");
    }
}

fn time_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
