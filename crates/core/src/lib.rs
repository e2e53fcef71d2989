//! Core scoring module - pure, deterministic, and testable
//!
//! This crate contains the single canonical Farkle scoring engine. It has
//! **no dependencies** on networking, persistence, or I/O, making it:
//!
//! - **Deterministic**: The same dice always produce the same result
//! - **Stateless**: Every call works on its own input; safe to call from any thread
//! - **Portable**: The CLI, the TCP adapter, and any UI all call the same code
//!
//! # Module Structure
//!
//! - [`dice`]: Input validation (dice count per mode, face range, integer check)
//! - [`tally`]: Per-face counts
//! - [`scoring`]: Classification, die attribution, and the continue-rolling predicate
//! - [`rng`]: Seeded dice roller
//! - [`selection`]: A rolled set of dice with player-toggled positions
//!
//! # Example
//!
//! ```
//! use farkle_core::{score_dice, can_continue_rolling};
//! use farkle_core::types::RollMode;
//!
//! let result = score_dice(&[1, 1, 1, 5, 5, 5], RollMode::Roll).unwrap();
//! assert_eq!(result.total, 1500);
//! assert_eq!(result.descriptions(), vec!["Three of 1s", "Three of 5s"]);
//!
//! // A bad roll is an error value, not a panic.
//! assert!(score_dice(&[1, 2, 3, 4, 5], RollMode::Roll).is_err());
//!
//! assert!(can_continue_rolling(&[5]));
//! assert!(!can_continue_rolling(&[2, 3]));
//! ```

pub mod dice;
pub mod rng;
pub mod scoring;
pub mod selection;
pub mod tally;

pub use farkle_types as types;

// Re-export commonly used types for convenience
pub use dice::{Dice, DiceError};
pub use rng::{DiceRoller, SimpleRng};
pub use scoring::{can_continue_rolling, rule_table, score, score_dice, ScoringResult};
pub use selection::RollSelection;
pub use tally::FaceTally;
