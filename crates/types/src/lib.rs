//! Core types module - shared data structures and rule constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (scoring engine, CLI output, wire protocol).
//!
//! # Scoring Table
//!
//! | Combination | Points |
//! |-------------|--------|
//! | Straight (1-2-3-4-5-6) | 1500 |
//! | Three pairs | 1500 |
//! | Six of a kind | 3000 |
//! | Five of a kind | 2 × three-of-a-kind base |
//! | Four of a kind | 2 × three-of-a-kind base |
//! | Three of a kind | 1000 for 1s, otherwise face × 100 |
//! | Single 1 | 100 |
//! | Single 5 | 50 |
//!
//! # Examples
//!
//! ```
//! use farkle_types::{Combination, Face, RollMode, DICE_PER_ROLL};
//!
//! let ones = Face::new(1).unwrap();
//! assert_eq!(Combination::ThreeOfAKind(ones).points(), 1000);
//! assert_eq!(Combination::FourOfAKind(Face::new(3).unwrap()).to_string(), "Four of 3s");
//!
//! assert!(RollMode::Roll.accepts_len(DICE_PER_ROLL));
//! assert!(!RollMode::Roll.accepts_len(5));
//! assert!(RollMode::Selection.accepts_len(2));
//! ```

use std::fmt;

/// Number of dice in a full roll.
pub const DICE_PER_ROLL: usize = 6;

/// Lowest face value on a die.
pub const FACE_MIN: u8 = 1;

/// Highest face value on a die.
pub const FACE_MAX: u8 = 6;

/// Points for a 1-2-3-4-5-6 straight.
pub const STRAIGHT_SCORE: u32 = 1500;

/// Points for three distinct pairs.
pub const THREE_PAIRS_SCORE: u32 = 1500;

/// Points for six of any face.
pub const SIX_OF_A_KIND_SCORE: u32 = 3000;

/// Four and five of a kind score the three-of-a-kind base times this.
pub const N_OF_A_KIND_MULTIPLIER: u32 = 2;

/// Points for a leftover single 1.
pub const SINGLE_ONE_SCORE: u32 = 100;

/// Points for a leftover single 5.
pub const SINGLE_FIVE_SCORE: u32 = 50;

/// Three-of-a-kind base value, indexed by `face - 1`.
pub const THREE_OF_A_KIND_BASE: [u32; 6] = [1000, 200, 300, 400, 500, 600];

/// Description reported for a zero-scoring roll.
pub const FARKLE_DESCRIPTION: &str = "Farkle (no scoring dice)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_constants_match_house_rules() {
        assert_eq!(STRAIGHT_SCORE, 1500);
        assert_eq!(THREE_PAIRS_SCORE, 1500);
        assert_eq!(SIX_OF_A_KIND_SCORE, 3000);
        assert_eq!(N_OF_A_KIND_MULTIPLIER, 2);
        assert_eq!(SINGLE_ONE_SCORE, 100);
        assert_eq!(SINGLE_FIVE_SCORE, 50);
        assert_eq!(THREE_OF_A_KIND_BASE, [1000, 200, 300, 400, 500, 600]);
    }

    #[test]
    fn face_rejects_out_of_range_values() {
        assert!(Face::new(0).is_none());
        assert!(Face::new(7).is_none());
        for v in FACE_MIN..=FACE_MAX {
            assert_eq!(Face::new(v).map(Face::get), Some(v));
        }
    }

    #[test]
    fn combination_points() {
        let f = |v| Face::new(v).unwrap();
        assert_eq!(Combination::Straight.points(), 1500);
        assert_eq!(Combination::ThreePairs.points(), 1500);
        assert_eq!(Combination::SixOfAKind(f(2)).points(), 3000);
        assert_eq!(Combination::FiveOfAKind(f(1)).points(), 2000);
        assert_eq!(Combination::FiveOfAKind(f(4)).points(), 800);
        assert_eq!(Combination::FourOfAKind(f(6)).points(), 1200);
        assert_eq!(Combination::ThreeOfAKind(f(5)).points(), 500);
        assert_eq!(Combination::Singles { face: f(1), count: 2 }.points(), 200);
        assert_eq!(Combination::Singles { face: f(5), count: 1 }.points(), 50);
        assert_eq!(Combination::Singles { face: f(3), count: 2 }.points(), 0);
    }

    #[test]
    fn combination_dice_counts() {
        let f = |v| Face::new(v).unwrap();
        assert_eq!(Combination::Straight.dice(), 6);
        assert_eq!(Combination::SixOfAKind(f(3)).dice(), 6);
        assert_eq!(Combination::FiveOfAKind(f(3)).dice(), 5);
        assert_eq!(Combination::Singles { face: f(5), count: 2 }.dice(), 2);
    }

    #[test]
    fn combination_descriptions() {
        let f = |v| Face::new(v).unwrap();
        assert_eq!(Combination::Straight.to_string(), "Straight");
        assert_eq!(Combination::ThreePairs.to_string(), "Three Pairs");
        assert_eq!(Combination::SixOfAKind(f(1)).to_string(), "Six of 1s");
        assert_eq!(Combination::ThreeOfAKind(f(6)).to_string(), "Three of 6s");
        assert_eq!(
            Combination::Singles { face: f(1), count: 2 }.to_string(),
            "2 single 1s"
        );
        assert_eq!(
            Combination::Singles { face: f(5), count: 1 }.to_string(),
            "1 single 5"
        );
    }
}

/// A single die face in `1..=6`.
///
/// # Examples
///
/// ```
/// use farkle_types::Face;
///
/// assert_eq!(Face::new(4).map(Face::get), Some(4));
/// assert_eq!(Face::new(0), None);
/// assert_eq!(Face::new(7), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Face(u8);

impl Face {
    /// All six faces in ascending order.
    pub const ALL: [Face; 6] = [Face(1), Face(2), Face(3), Face(4), Face(5), Face(6)];

    pub fn new(value: u8) -> Option<Self> {
        if (FACE_MIN..=FACE_MAX).contains(&value) {
            Some(Face(value))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index for tally arrays.
    pub fn index(self) -> usize {
        (self.0 - FACE_MIN) as usize
    }

    /// Three-of-a-kind base value for this face.
    pub fn triple_base(self) -> u32 {
        THREE_OF_A_KIND_BASE[self.index()]
    }

    /// Points for one leftover die of this face (only 1s and 5s score alone).
    pub fn single_points(self) -> u32 {
        match self.0 {
            1 => SINGLE_ONE_SCORE,
            5 => SINGLE_FIVE_SCORE,
            _ => 0,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many dice a scoring call accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RollMode {
    /// A fresh roll: exactly six dice.
    #[default]
    Roll,
    /// Dice a player set aside from a roll: one to six dice.
    Selection,
}

impl RollMode {
    pub fn accepts_len(self, len: usize) -> bool {
        match self {
            RollMode::Roll => len == DICE_PER_ROLL,
            RollMode::Selection => (1..=DICE_PER_ROLL).contains(&len),
        }
    }

    /// Parse roll mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("roll") {
            Some(RollMode::Roll)
        } else if s.eq_ignore_ascii_case("selection") {
            Some(RollMode::Selection)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RollMode::Roll => "roll",
            RollMode::Selection => "selection",
        }
    }
}

/// The closed set of scoring combinations.
///
/// Whole-roll patterns (`Straight`, `ThreePairs`) never combine with the
/// per-face combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    Straight,
    ThreePairs,
    SixOfAKind(Face),
    FiveOfAKind(Face),
    FourOfAKind(Face),
    ThreeOfAKind(Face),
    /// Leftover 1s or 5s scored one die at a time.
    Singles { face: Face, count: u8 },
}

impl Combination {
    pub fn points(self) -> u32 {
        match self {
            Combination::Straight => STRAIGHT_SCORE,
            Combination::ThreePairs => THREE_PAIRS_SCORE,
            Combination::SixOfAKind(_) => SIX_OF_A_KIND_SCORE,
            Combination::FiveOfAKind(face) | Combination::FourOfAKind(face) => {
                face.triple_base() * N_OF_A_KIND_MULTIPLIER
            }
            Combination::ThreeOfAKind(face) => face.triple_base(),
            Combination::Singles { face, count } => face.single_points() * count as u32,
        }
    }

    /// Number of dice this combination consumes.
    pub fn dice(self) -> usize {
        match self {
            Combination::Straight | Combination::ThreePairs | Combination::SixOfAKind(_) => 6,
            Combination::FiveOfAKind(_) => 5,
            Combination::FourOfAKind(_) => 4,
            Combination::ThreeOfAKind(_) => 3,
            Combination::Singles { count, .. } => count as usize,
        }
    }

    /// The face every consumed die shows, for per-face combinations.
    pub fn face(self) -> Option<Face> {
        match self {
            Combination::Straight | Combination::ThreePairs => None,
            Combination::SixOfAKind(face)
            | Combination::FiveOfAKind(face)
            | Combination::FourOfAKind(face)
            | Combination::ThreeOfAKind(face)
            | Combination::Singles { face, .. } => Some(face),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Straight => write!(f, "Straight"),
            Combination::ThreePairs => write!(f, "Three Pairs"),
            Combination::SixOfAKind(face) => write!(f, "Six of {}s", face),
            Combination::FiveOfAKind(face) => write!(f, "Five of {}s", face),
            Combination::FourOfAKind(face) => write!(f, "Four of {}s", face),
            Combination::ThreeOfAKind(face) => write!(f, "Three of {}s", face),
            Combination::Singles { face, count } => {
                let plural = if *count > 1 { "s" } else { "" };
                write!(f, "{} single {}{}", count, face, plural)
            }
        }
    }
}
