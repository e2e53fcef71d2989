//! Face tally - per-face counts of a roll or selection

use crate::types::Face;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceTally {
    counts: [u8; 6],
}

impl FaceTally {
    pub fn of(faces: &[Face]) -> Self {
        let mut counts = [0u8; 6];
        for face in faces {
            counts[face.index()] += 1;
        }
        Self { counts }
    }

    pub fn count(&self, face: Face) -> u8 {
        self.counts[face.index()]
    }

    /// Remove up to `n` dice of `face` from the tally.
    pub fn take(&mut self, face: Face, n: u8) {
        let c = &mut self.counts[face.index()];
        *c = c.saturating_sub(n);
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Every face exactly once.
    pub fn is_straight(&self) -> bool {
        self.counts.iter().all(|&c| c == 1)
    }

    /// Number of faces that appear exactly twice.
    pub fn pair_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 2).count()
    }
}
