//! Zobrist hash keys for incremental position hashing.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::piece::{Color, Piece};
use crate::square::Square;

/// Fixed seed so hashes (and therefore TT contents) are reproducible across runs.
const ZOBRIST_SEED: u64 = 0x5EED_C0FF_EE15_BAD5;

pub struct ZobristKeys {
    /// `piece[color][piece][square]`
    piece: [[[u64; 64]; 6]; 2],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    side_to_move: u64,
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece = [[[0u64; 64]; 6]; 2];
        for color_keys in &mut piece {
            for piece_keys in color_keys.iter_mut() {
                for key in piece_keys.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.next_u64();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.next_u64();
        }

        let side_to_move = rng.next_u64();

        ZobristKeys {
            piece,
            castling,
            en_passant_file,
            side_to_move,
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_key(&self, color: Color, piece: Piece, square: Square) -> u64 {
        self.piece[color.index()][piece.index()][square.index()]
    }

    #[inline]
    #[must_use]
    pub fn castling_key(&self, rights: u8) -> u64 {
        self.castling[rights as usize & 0xf]
    }

    #[inline]
    #[must_use]
    pub fn en_passant_key(&self, file: u8) -> u64 {
        self.en_passant_file[file as usize]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    /// Fold a whole position's identity into one hash. Used only to verify
    /// incremental maintenance against a from-scratch recomputation.
    #[must_use]
    pub fn hash_position(
        &self,
        mailbox: &[Option<(Color, Piece)>; 64],
        castling_rights: u8,
        en_passant: Option<Square>,
        side_to_move: Color,
    ) -> u64 {
        let mut hash = 0u64;
        for (idx, slot) in mailbox.iter().enumerate() {
            if let Some((color, piece)) = slot {
                hash ^= self.piece_key(*color, *piece, Square::new(idx as u8));
            }
        }
        hash ^= self.castling_key(castling_rights);
        if let Some(ep) = en_passant {
            hash ^= self.en_passant_key(ep.file());
        }
        if side_to_move == Color::Black {
            hash ^= self.side_to_move_key();
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_instances() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        assert_eq!(
            a.piece_key(Color::White, Piece::Pawn, Square::A1),
            b.piece_key(Color::White, Piece::Pawn, Square::A1)
        );
        assert_eq!(a.side_to_move_key(), b.side_to_move_key());
    }

    #[test]
    fn distinct_squares_have_distinct_keys() {
        let z = ZobristKeys::new();
        let k1 = z.piece_key(Color::White, Piece::Knight, Square::B1);
        let k2 = z.piece_key(Color::White, Piece::Knight, Square::A1);
        assert_ne!(k1, k2);
    }
}
