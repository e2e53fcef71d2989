//! Dice validation - turns caller input into a checked set of faces
//!
//! Validation never panics: every malformed input becomes a [`DiceError`]
//! that callers report back to the user as a rejected request.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Face, RollMode, DICE_PER_ROLL};

/// Why a set of dice was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("must roll exactly 6 dice, got {actual}")]
    WrongRollCount { actual: usize },

    #[error("must select between 1 and 6 dice, got {actual}")]
    WrongSelectionCount { actual: usize },

    #[error("die {index} has value {value}; all dice must be integers between 1 and 6")]
    OutOfRange { index: usize, value: i64 },

    #[error("die {index} is not an integer; all dice must be integers between 1 and 6")]
    NotInteger { index: usize },
}

impl DiceError {
    fn wrong_count(mode: RollMode, actual: usize) -> Self {
        match mode {
            RollMode::Roll => DiceError::WrongRollCount { actual },
            RollMode::Selection => DiceError::WrongSelectionCount { actual },
        }
    }
}

/// A validated roll or selection: one to six faces in input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dice {
    faces: ArrayVec<Face, DICE_PER_ROLL>,
}

impl Dice {
    /// Validate integer face values.
    ///
    /// # Examples
    ///
    /// ```
    /// use farkle_core::{Dice, DiceError};
    /// use farkle_core::types::RollMode;
    ///
    /// let dice = Dice::parse(&[1, 2, 3, 4, 5, 6], RollMode::Roll).unwrap();
    /// assert_eq!(dice.len(), 6);
    ///
    /// assert_eq!(
    ///     Dice::parse(&[1, 2, 3, 4, 5], RollMode::Roll),
    ///     Err(DiceError::WrongRollCount { actual: 5 })
    /// );
    /// assert!(Dice::parse(&[1, 5], RollMode::Selection).is_ok());
    /// ```
    pub fn parse(values: &[i64], mode: RollMode) -> Result<Self, DiceError> {
        Self::parse_with(values, mode, |v| Some(*v))
    }

    /// Validate arbitrary values, using `as_integer` to extract each face.
    ///
    /// `as_integer` returns `None` for values that are not integers (for
    /// example a JSON `2.5` or `"3"`). The count is checked before any value.
    pub fn parse_with<T, F>(values: &[T], mode: RollMode, as_integer: F) -> Result<Self, DiceError>
    where
        F: Fn(&T) -> Option<i64>,
    {
        if !mode.accepts_len(values.len()) {
            return Err(DiceError::wrong_count(mode, values.len()));
        }

        let mut faces = ArrayVec::new();
        for (index, raw) in values.iter().enumerate() {
            let value = as_integer(raw).ok_or(DiceError::NotInteger { index })?;
            let face = u8::try_from(value)
                .ok()
                .and_then(Face::new)
                .ok_or(DiceError::OutOfRange { index, value })?;
            faces.push(face);
        }

        Ok(Self { faces })
    }

    /// Build dice from faces that are already known to be in range.
    pub fn from_faces(faces: &[Face], mode: RollMode) -> Result<Self, DiceError> {
        if !mode.accepts_len(faces.len()) {
            return Err(DiceError::wrong_count(mode, faces.len()));
        }
        let mut out = ArrayVec::new();
        out.extend(faces.iter().copied());
        Ok(Self { faces: out })
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn values(&self) -> ArrayVec<u8, DICE_PER_ROLL> {
        self.faces.iter().map(|f| f.get()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_roll_requires_six_dice() {
        assert_eq!(
            Dice::parse(&[1, 2, 3, 4, 5], RollMode::Roll),
            Err(DiceError::WrongRollCount { actual: 5 })
        );
        assert_eq!(
            Dice::parse(&[1, 2, 3, 4, 5, 6, 1], RollMode::Roll),
            Err(DiceError::WrongRollCount { actual: 7 })
        );
        assert_eq!(
            Dice::parse(&[], RollMode::Roll),
            Err(DiceError::WrongRollCount { actual: 0 })
        );
    }

    #[test]
    fn selection_accepts_one_to_six_dice() {
        assert!(Dice::parse(&[5], RollMode::Selection).is_ok());
        assert!(Dice::parse(&[1, 1, 1, 1, 1, 1], RollMode::Selection).is_ok());
        assert_eq!(
            Dice::parse(&[], RollMode::Selection),
            Err(DiceError::WrongSelectionCount { actual: 0 })
        );
        assert_eq!(
            Dice::parse(&[1; 7], RollMode::Selection),
            Err(DiceError::WrongSelectionCount { actual: 7 })
        );
    }

    #[test]
    fn rejects_out_of_range_faces() {
        assert_eq!(
            Dice::parse(&[1, 2, 3, 7, 5, 6], RollMode::Roll),
            Err(DiceError::OutOfRange { index: 3, value: 7 })
        );
        assert_eq!(
            Dice::parse(&[0, 2, 3, 4, 5, 6], RollMode::Roll),
            Err(DiceError::OutOfRange { index: 0, value: 0 })
        );
        assert_eq!(
            Dice::parse(&[1, -3], RollMode::Selection),
            Err(DiceError::OutOfRange { index: 1, value: -3 })
        );
        assert_eq!(
            Dice::parse(&[1, 300], RollMode::Selection),
            Err(DiceError::OutOfRange { index: 1, value: 300 })
        );
    }

    #[test]
    fn count_is_checked_before_values() {
        assert_eq!(
            Dice::parse(&[9, 9, 9], RollMode::Roll),
            Err(DiceError::WrongRollCount { actual: 3 })
        );
    }

    #[test]
    fn parse_with_reports_non_integers() {
        let raw = [1.0_f64, 2.0, 3.5, 4.0, 5.0, 6.0];
        let as_int = |v: &f64| if v.fract() == 0.0 { Some(*v as i64) } else { None };
        assert_eq!(
            Dice::parse_with(&raw, RollMode::Roll, as_int),
            Err(DiceError::NotInteger { index: 2 })
        );
    }

    #[test]
    fn preserves_input_order() {
        let dice = Dice::parse(&[6, 1, 4], RollMode::Selection).unwrap();
        assert_eq!(dice.values().as_slice(), &[6, 1, 4]);
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            DiceError::WrongRollCount { actual: 5 }.to_string(),
            "must roll exactly 6 dice, got 5"
        );
        assert_eq!(
            DiceError::OutOfRange { index: 2, value: 7 }.to_string(),
            "die 2 has value 7; all dice must be integers between 1 and 6"
        );
    }
}
