//! Transposition table: a fixed-size, depth-preferred key→entry map.

use crate::moves::Move;

pub const MATE_SCORE: i32 = 32_000;
pub const MATE_IN_MAX: i32 = MATE_SCORE - 256;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy)]
struct TtEntry {
    key: u64,
    mv: Move,
    score: i16,
    depth: i8,
    bound: Bound,
}

const EMPTY_ENTRY: TtEntry = TtEntry {
    key: 0,
    mv: Move::NULL,
    score: 0,
    depth: -1,
    bound: Bound::Exact,
};

pub struct Probe {
    pub mv: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub bound: Bound,
}

pub struct TranspositionTable {
    entries: Vec<TtEntry>,
}

const BYTES_PER_ENTRY: usize = 24;

impl TranspositionTable {
    #[must_use]
    pub fn with_size_mb(mb: usize) -> Self {
        let count = ((mb * 1024 * 1024) / BYTES_PER_ENTRY).max(1);
        TranspositionTable {
            entries: vec![EMPTY_ENTRY; count],
        }
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = EMPTY_ENTRY);
    }

    #[must_use]
    pub fn probe(&self, key: u64, ply: usize, r50: u16) -> Option<Probe> {
        let entry = &self.entries[self.index(key)];
        if entry.key != key || entry.depth < 0 {
            return None;
        }
        Some(Probe {
            mv: if entry.mv.is_null() { None } else { Some(entry.mv) },
            score: decode_mate_score(entry.score as i32, ply, r50),
            depth: entry.depth as i32,
            bound: entry.bound,
        })
    }

    pub fn store(&mut self, key: u64, mv: Option<Move>, score: i32, depth: i32, bound: Bound, ply: usize) {
        let idx = self.index(key);
        let slot = &mut self.entries[idx];
        // Replace unless this is a same-key refresh with a shallower depth.
        // A genuine collision (different key) always replaces.
        if slot.key == key && slot.depth as i32 > depth {
            return;
        }
        *slot = TtEntry {
            key,
            mv: mv.unwrap_or(Move::NULL),
            score: encode_mate_score(score, ply) as i16,
            depth: depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
            bound,
        };
    }
}

/// Store mate scores as distance-from-this-node rather than distance-from-root,
/// so a mate found at one ply is still correct when retrieved at another.
fn encode_mate_score(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_IN_MAX {
        score + ply
    } else if score <= -MATE_IN_MAX {
        score - ply
    } else {
        score
    }
}

/// Reverses `encode_mate_score`, clamping so a mate score never gets promoted
/// through the 50-move-rule horizon.
fn decode_mate_score(score: i32, ply: usize, r50: u16) -> i32 {
    let ply = ply as i32;
    if score >= MATE_IN_MAX {
        if MATE_SCORE - score > 99 - r50 as i32 {
            return MATE_IN_MAX - 1;
        }
        score - ply
    } else if score <= -MATE_IN_MAX {
        if MATE_SCORE + score > 99 - r50 as i32 {
            return -(MATE_IN_MAX - 1);
        }
        score + ply
    } else {
        score
    }
}
