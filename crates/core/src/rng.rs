//! RNG module - deterministic dice rolling
//!
//! Provides a simple LCG and a seeded [`DiceRoller`] on top of it.
//! The same seed always produces the same sequence of rolls, which keeps
//! CLI sessions and tests reproducible.

use arrayvec::ArrayVec;

use crate::dice::Dice;
use crate::types::{Face, RollMode, DICE_PER_ROLL};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits cycle with short periods; use the high half.
        (self.next_u32() >> 16) % max
    }
}

/// Seeded roller producing validated dice.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    seed: u32,
    rng: SimpleRng,
}

impl DiceRoller {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Roll a full set of six dice.
    pub fn roll(&mut self) -> Dice {
        self.roll_n(DICE_PER_ROLL)
    }

    /// Roll `count` dice (clamped to 1..=6), e.g. the dice left after setting some aside.
    pub fn roll_n(&mut self, count: usize) -> Dice {
        let count = count.clamp(1, DICE_PER_ROLL);
        let faces: ArrayVec<Face, DICE_PER_ROLL> = (0..count)
            .map(|_| Face::ALL[self.rng.next_range(Face::ALL.len() as u32) as usize])
            .collect();
        let mode = if count == DICE_PER_ROLL {
            RollMode::Roll
        } else {
            RollMode::Selection
        };
        // Length is clamped to what either mode accepts.
        Dice::from_faces(&faces, mode).unwrap_or_default()
    }
}
