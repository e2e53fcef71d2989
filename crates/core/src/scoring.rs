//! Scoring module - Farkle roll classification and die attribution
//!
//! Evaluation order is strict and short-circuits:
//! - A straight (1-2-3-4-5-6) or three pairs consumes the whole roll.
//! - Otherwise faces 1..=6 are scored most-dice-first (six, five, four, three
//!   of a kind). Six of a kind ends scoring immediately.
//! - Leftover 1s and 5s then score as singles.
//!
//! Each combination claims the first unused positions (left to right) that
//! carry its face, so a position is never attributed twice.

use arrayvec::ArrayVec;

use crate::dice::{Dice, DiceError};
use crate::tally::FaceTally;
use crate::types::{Combination, Face, RollMode, DICE_PER_ROLL, FARKLE_DESCRIPTION};

/// Score calculation result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoringResult {
    pub total: u32,
    /// Combinations in the order they were found.
    pub combinations: ArrayVec<Combination, DICE_PER_ROLL>,
    /// Per-position flag: did this die contribute to `total`.
    pub used: ArrayVec<bool, DICE_PER_ROLL>,
    pub farkle: bool,
}

impl ScoringResult {
    fn unscored(len: usize) -> Self {
        let mut used = ArrayVec::new();
        used.extend((0..len).map(|_| false));
        Self {
            total: 0,
            combinations: ArrayVec::new(),
            used,
            farkle: false,
        }
    }

    /// Add a combination and mark the dice it consumes.
    fn record(&mut self, faces: &[Face], combination: Combination) {
        match combination.face() {
            None => self.used.iter_mut().for_each(|u| *u = true),
            Some(face) => {
                let mut remaining = combination.dice();
                for (u, f) in self.used.iter_mut().zip(faces) {
                    if remaining == 0 {
                        break;
                    }
                    if *f == face && !*u {
                        *u = true;
                        remaining -= 1;
                    }
                }
            }
        }
        self.total += combination.points();
        // Each combination consumes at least one die, so there are never more
        // combinations than dice.
        self.combinations.push(combination);
    }

    fn finish(mut self) -> Self {
        self.farkle = self.total == 0;
        self
    }

    /// Human-readable combination list; a Farkle reports a single entry.
    pub fn descriptions(&self) -> Vec<String> {
        if self.combinations.is_empty() {
            return vec![FARKLE_DESCRIPTION.to_string()];
        }
        self.combinations.iter().map(|c| c.to_string()).collect()
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }
}

/// Score validated dice.
///
/// # Examples
///
/// ```
/// use farkle_core::{score, Dice};
/// use farkle_core::types::RollMode;
///
/// let dice = Dice::parse(&[2, 3, 4, 6, 6, 6], RollMode::Roll).unwrap();
/// let result = score(&dice);
/// assert_eq!(result.total, 600);
/// assert_eq!(result.descriptions(), vec!["Three of 6s".to_string()]);
/// assert_eq!(result.used.as_slice(), &[false, false, false, true, true, true]);
/// assert!(!result.farkle);
/// ```
pub fn score(dice: &Dice) -> ScoringResult {
    let faces = dice.faces();
    let mut tally = FaceTally::of(faces);
    let mut result = ScoringResult::unscored(faces.len());

    if tally.is_straight() {
        result.record(faces, Combination::Straight);
        return result.finish();
    }

    if tally.pair_count() == 3 {
        result.record(faces, Combination::ThreePairs);
        return result.finish();
    }

    for face in Face::ALL {
        let combination = match tally.count(face) {
            6 => Combination::SixOfAKind(face),
            5 => Combination::FiveOfAKind(face),
            4 => Combination::FourOfAKind(face),
            3 => Combination::ThreeOfAKind(face),
            _ => continue,
        };

        result.record(faces, combination);
        if let Combination::SixOfAKind(_) = combination {
            return result.finish();
        }
        tally.take(face, combination.dice() as u8);
    }

    for face in [Face::ALL[0], Face::ALL[4]] {
        let count = tally.count(face);
        if count > 0 {
            result.record(faces, Combination::Singles { face, count });
        }
    }

    result.finish()
}

/// Validate and score raw face values.
pub fn score_dice(values: &[i64], mode: RollMode) -> Result<ScoringResult, DiceError> {
    Dice::parse(values, mode).map(|dice| score(&dice))
}

/// Whether a set of dice put aside as scored lets the turn continue.
///
/// An empty or invalid selection never does.
pub fn can_continue_rolling(selection: &[i64]) -> bool {
    score_dice(selection, RollMode::Selection)
        .map(|r| r.total > 0)
        .unwrap_or(false)
}

/// Every distinct combination with its point value, for rule listings.
pub fn rule_table() -> Vec<Combination> {
    let mut out = vec![Combination::Straight, Combination::ThreePairs];
    for face in Face::ALL {
        out.push(Combination::SixOfAKind(face));
    }
    for face in Face::ALL {
        out.push(Combination::FiveOfAKind(face));
    }
    for face in Face::ALL {
        out.push(Combination::FourOfAKind(face));
    }
    for face in Face::ALL {
        out.push(Combination::ThreeOfAKind(face));
    }
    out.push(Combination::Singles { face: Face::ALL[0], count: 1 });
    out.push(Combination::Singles { face: Face::ALL[4], count: 1 });
    out
}
