//! Make/unmake: the single legality gate in the engine.

use super::{Position, Undo};
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::square::Square;
use crate::zobrist::ZOBRIST;

impl Position {
    /// Applies a pseudolegal move. Returns `false` (and restores the position)
    /// if it leaves the mover's own king in check.
    pub fn make_move(&mut self, m: Move) -> bool {
        let from = m.from();
        let to = m.to();
        let (mover_color, piece) = self
            .piece_at(from)
            .expect("make_move called with no piece on the from-square");

        self.history.push(Undo {
            key: self.key,
            en_passant: self.en_passant,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: None,
        });

        if let Some(ep) = self.en_passant {
            self.key ^= ZOBRIST.en_passant_key(ep.file());
        }
        self.key ^= ZOBRIST.castling_key(self.castling_rights.0);

        let is_ep_capture = piece == Piece::Pawn && Some(to) == self.en_passant && self.piece_at(to).is_none();

        let mut captured = None;
        if is_ep_capture {
            let cap_sq = ep_victim_square(mover_color, to);
            let (_, cap_piece) = self.remove(cap_sq);
            captured = Some(cap_piece);
        } else if self.piece_at(to).is_some() {
            let (_, cap_piece) = self.remove(to);
            captured = Some(cap_piece);
        }

        self.remove(from);
        let placed_piece = if piece == Piece::Pawn && to.rank() == mover_color.promotion_rank() {
            m.promotion().unwrap_or(Piece::Queen)
        } else {
            piece
        };
        self.place(mover_color, placed_piece, to);

        if piece == Piece::King {
            let file_diff = to.file() as i8 - from.file() as i8;
            if file_diff == 2 {
                let rook_from = Square::from_rank_file(from.rank(), 7);
                let rook_to = Square::from_rank_file(from.rank(), 5);
                let (_, rook_piece) = self.remove(rook_from);
                self.place(mover_color, rook_piece, rook_to);
            } else if file_diff == -2 {
                let rook_from = Square::from_rank_file(from.rank(), 0);
                let rook_to = Square::from_rank_file(from.rank(), 3);
                let (_, rook_piece) = self.remove(rook_from);
                self.place(mover_color, rook_piece, rook_to);
            }
        }

        let mut new_ep = None;
        if piece == Piece::Pawn {
            let rank_diff = to.rank() as i8 - from.rank() as i8;
            if rank_diff.abs() == 2 {
                let ep_rank = (from.rank() as i8 + rank_diff / 2) as u8;
                new_ep = Some(Square::from_rank_file(ep_rank, from.file()));
            }
        }
        self.en_passant = new_ep;
        if let Some(ep) = new_ep {
            self.key ^= ZOBRIST.en_passant_key(ep.file());
        }

        if piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.castling_rights.update_for_move(from, to);
        self.key ^= ZOBRIST.castling_key(self.castling_rights.0);

        if mover_color == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = mover_color.opponent();
        self.key ^= ZOBRIST.side_to_move_key();

        self.history.last_mut().unwrap().captured = captured;

        if self.in_check(mover_color) {
            self.unmake_move(m);
            return false;
        }
        true
    }

    pub fn unmake_move(&mut self, m: Move) {
        let undo = self.history.pop().expect("unmake_move with empty history");
        let from = m.from();
        let to = m.to();

        self.side_to_move = self.side_to_move.opponent();
        let mover_color = self.side_to_move;

        let (_, piece_at_to) = self.remove(to);
        let original_piece = if m.promotion().is_some() { Piece::Pawn } else { piece_at_to };

        if original_piece == Piece::King {
            let file_diff = to.file() as i8 - from.file() as i8;
            if file_diff == 2 {
                let rook_to = Square::from_rank_file(from.rank(), 5);
                let rook_from = Square::from_rank_file(from.rank(), 7);
                let (_, rook_piece) = self.remove(rook_to);
                self.place(mover_color, rook_piece, rook_from);
            } else if file_diff == -2 {
                let rook_to = Square::from_rank_file(from.rank(), 3);
                let rook_from = Square::from_rank_file(from.rank(), 0);
                let (_, rook_piece) = self.remove(rook_to);
                self.place(mover_color, rook_piece, rook_from);
            }
        }

        self.place(mover_color, original_piece, from);

        if let Some(captured_piece) = undo.captured {
            let is_ep_capture = original_piece == Piece::Pawn && undo.en_passant == Some(to);
            let cap_sq = if is_ep_capture { ep_victim_square(mover_color, to) } else { to };
            self.place(mover_color.opponent(), captured_piece, cap_sq);
        }

        self.key = undo.key;
        self.en_passant = undo.en_passant;
        self.castling_rights = undo.castling_rights;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
    }

    pub fn make_null(&mut self) {
        self.history.push(Undo {
            key: self.key,
            en_passant: self.en_passant,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: None,
        });
        if let Some(ep) = self.en_passant.take() {
            self.key ^= ZOBRIST.en_passant_key(ep.file());
        }
        self.side_to_move = self.side_to_move.opponent();
        self.key ^= ZOBRIST.side_to_move_key();
    }

    pub fn unmake_null(&mut self) {
        let undo = self.history.pop().expect("unmake_null with empty history");
        self.key = undo.key;
        self.en_passant = undo.en_passant;
        self.castling_rights = undo.castling_rights;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.side_to_move = self.side_to_move.opponent();
    }
}

/// The square of the pawn captured en passant, one rank behind `to` from the
/// mover's perspective.
fn ep_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::White => Square::from_rank_file(to.rank() - 1, to.file()),
        Color::Black => Square::from_rank_file(to.rank() + 1, to.file()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn make_unmake_restores_key_and_occupancy() {
        let mut pos = Position::startpos();
        let before_key = pos.key;
        let before_occ = pos.all_occupied;
        let m = Move::new(Square::from_rank_file(1, 4), Square::from_rank_file(3, 4), None);
        assert!(pos.make_move(m));
        assert_ne!(pos.key, before_key);
        pos.unmake_move(m);
        assert_eq!(pos.key, before_key);
        assert_eq!(pos.all_occupied, before_occ);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut pos = Position::startpos();
        let m = Move::new(Square::from_rank_file(1, 4), Square::from_rank_file(3, 4), None);
        pos.make_move(m);
        assert_eq!(pos.en_passant, Some(Square::from_rank_file(2, 4)));
    }

    #[test]
    fn illegal_move_leaving_king_in_check_is_rejected() {
        // White king on e1 pinned by a black rook on e8 with nothing between;
        // moving a different piece that would expose the king is illegal.
        let mut pos = Position::from_fen("4r3/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let m = Move::new(Square::E2, Square::from_rank_file(2, 1), None);
        assert!(!pos.make_move(m));
    }

    #[test]
    fn castling_moves_the_rook() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let m = Move::new(Square::E1, Square::G1, None);
        assert!(pos.make_move(m));
        assert_eq!(pos.piece_at(Square::F1).map(|(_, p)| p), Some(Piece::Rook));
        assert!(pos.piece_at(Square::H1).is_none());
        pos.unmake_move(m);
        assert!(pos.piece_at(Square::H1).is_some());
        assert!(pos.piece_at(Square::F1).is_none());
    }
}
