//! Killer-move and history-heuristic tables used to order quiet moves.

use crate::moves::Move;
use crate::piece::Color;
use crate::search::MAX_PLY;
use crate::square::Square;

/// Two killer-move slots per ply: quiet moves that caused a beta cutoff at
/// that ply in a sibling branch, tried early again.
pub struct KillerTable {
    slots: Vec<[Move; 2]>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: vec![[Move::NULL; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn slot_of(&self, ply: usize, m: Move) -> Option<usize> {
        let slots = self.slots.get(ply)?;
        if slots[0] == m {
            Some(0)
        } else if slots[1] == m {
            Some(1)
        } else {
            None
        }
    }

    pub fn store(&mut self, ply: usize, m: Move) {
        let slots = &mut self.slots[ply];
        if slots[0] == m {
            return;
        }
        slots[1] = slots[0];
        slots[0] = m;
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = [Move::NULL; 2];
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History score for `(color, from, to)`, incremented on a quiet move that
/// causes a beta cutoff, weighted by `depth^2` as is conventional.
pub struct HistoryTable {
    scores: Vec<i32>,
}

const fn history_index(color: Color, from: Square, to: Square) -> usize {
    color.index() * 64 * 64 + from.index() * 64 + to.index()
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            scores: vec![0; 2 * 64 * 64],
        }
    }

    #[must_use]
    pub fn score(&self, color: Color, from: Square, to: Square) -> i32 {
        self.scores[history_index(color, from, to)]
    }

    pub fn update(&mut self, color: Color, from: Square, to: Square, depth: i32) {
        self.add(color, from, to, depth * depth);
    }

    /// Decays a quiet move that was tried but did not cause the cutoff a
    /// sibling move produced, so it sorts later next time.
    pub fn penalize(&mut self, color: Color, from: Square, to: Square, depth: i32) {
        self.add(color, from, to, -(depth * depth) / 8);
    }

    fn add(&mut self, color: Color, from: Square, to: Square, delta: i32) {
        let idx = history_index(color, from, to);
        self.scores[idx] = (self.scores[idx] + delta).clamp(-(1 << 20), 1 << 20);
    }

    pub fn clear(&mut self) {
        self.scores.iter_mut().for_each(|s| *s = 0);
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn killer_store_and_lookup() {
        let mut killers = KillerTable::new();
        let m = Move::new(Square::A1, Square::B1, None);
        killers.store(0, m);
        assert_eq!(killers.slot_of(0, m), Some(0));
    }

    #[test]
    fn second_killer_pushes_first_back() {
        let mut killers = KillerTable::new();
        let m1 = Move::new(Square::A1, Square::B1, None);
        let m2 = Move::new(Square::A1, Square::C1, None);
        killers.store(0, m1);
        killers.store(0, m2);
        assert_eq!(killers.slot_of(0, m2), Some(0));
        assert_eq!(killers.slot_of(0, m1), Some(1));
    }

    #[test]
    fn history_accumulates_with_depth_squared() {
        let mut history = HistoryTable::new();
        history.update(Color::White, Square::A1, Square::B1, 4);
        assert_eq!(history.score(Color::White, Square::A1, Square::B1), 16);
    }
}
