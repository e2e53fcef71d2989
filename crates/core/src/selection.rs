//! Roll selection - a rolled set of dice with player-toggled positions
//!
//! This is the model a presentation layer drives: roll, toggle dice on and
//! off, and show the live score of whatever is currently selected.

use arrayvec::ArrayVec;

use crate::dice::{Dice, DiceError};
use crate::scoring::{score, ScoringResult};
use crate::types::{Face, RollMode, DICE_PER_ROLL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollSelection {
    dice: Dice,
    selected: ArrayVec<bool, DICE_PER_ROLL>,
}

impl RollSelection {
    pub fn new(dice: Dice) -> Self {
        let selected = (0..dice.len()).map(|_| false).collect();
        Self { dice, selected }
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    /// Flip the selection of one position. Returns the new state, or `None`
    /// if `index` is past the end of the roll.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.selected.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    /// Selected positions in ascending order.
    pub fn selected_positions(&self) -> ArrayVec<usize, DICE_PER_ROLL> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }

    pub fn selected_faces(&self) -> ArrayVec<Face, DICE_PER_ROLL> {
        self.selected_positions()
            .iter()
            .map(|&i| self.dice.faces()[i])
            .collect()
    }

    /// Score the selected dice. Nothing selected is a validation error.
    pub fn score(&self) -> Result<ScoringResult, DiceError> {
        let dice = Dice::from_faces(&self.selected_faces(), RollMode::Selection)?;
        Ok(score(&dice))
    }

    /// Roll positions that contributed to `result`, where `result` came from
    /// [`RollSelection::score`] on the current selection.
    pub fn scored_positions(&self, result: &ScoringResult) -> ArrayVec<usize, DICE_PER_ROLL> {
        self.selected_positions()
            .into_iter()
            .zip(result.used.iter())
            .filter_map(|(pos, &used)| used.then_some(pos))
            .collect()
    }

    /// Whether the selected dice score anything, letting the turn continue.
    pub fn can_continue(&self) -> bool {
        self.score().map(|r| r.total > 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(values: [i64; 6]) -> RollSelection {
        RollSelection::new(Dice::parse(&values, RollMode::Roll).unwrap())
    }

    #[test]
    fn empty_selection_is_rejected() {
        let sel = selection([1, 2, 3, 4, 6, 6]);
        assert_eq!(
            sel.score(),
            Err(DiceError::WrongSelectionCount { actual: 0 })
        );
        assert!(!sel.can_continue());
    }

    #[test]
    fn toggle_flips_and_bounds_checks() {
        let mut sel = selection([1, 2, 3, 4, 6, 6]);
        assert_eq!(sel.toggle(0), Some(true));
        assert!(sel.is_selected(0));
        assert_eq!(sel.toggle(0), Some(false));
        assert!(!sel.is_selected(0));
        assert_eq!(sel.toggle(6), None);
        assert!(!sel.is_selected(6));
    }

    #[test]
    fn live_score_follows_selection() {
        let mut sel = selection([5, 2, 6, 6, 1, 6]);
        sel.toggle(0);
        assert_eq!(sel.score().unwrap().total, 50);

        sel.toggle(4);
        assert_eq!(sel.score().unwrap().total, 150);

        for i in [2, 3, 5] {
            sel.toggle(i);
        }
        let r = sel.score().unwrap();
        assert_eq!(r.total, 750);
        assert_eq!(sel.scored_positions(&r).as_slice(), &[0, 2, 3, 4, 5]);
        assert!(sel.can_continue());

        sel.clear();
        assert!(sel.selected_positions().is_empty());
    }

    #[test]
    fn non_scoring_selection_cannot_continue() {
        let mut sel = selection([5, 2, 3, 6, 1, 6]);
        sel.toggle(1);
        sel.toggle(2);
        let r = sel.score().unwrap();
        assert!(r.farkle);
        assert!(sel.scored_positions(&r).is_empty());
        assert!(!sel.can_continue());
    }

    #[test]
    fn scored_positions_skip_unused_selected_dice() {
        let mut sel = selection([2, 1, 4, 4, 4, 3]);
        sel.toggle(0);
        sel.toggle(1);
        let r = sel.score().unwrap();
        assert_eq!(r.total, 100);
        assert_eq!(sel.scored_positions(&r).as_slice(), &[1]);
    }
}
