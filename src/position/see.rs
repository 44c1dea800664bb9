//! Static exchange evaluation: is a capture sequence on one square good?

use super::Position;
use crate::bitboard::Bitboard;
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::square::Square;

const PIECE_ORDER: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

#[inline]
fn piece_value(p: Piece) -> i32 {
    p.value_mg()
}

fn least_valuable_attacker(position: &Position, attackers: Bitboard, side: Color) -> Option<(Square, Piece)> {
    for piece in PIECE_ORDER {
        let candidates = attackers & position.pieces[side.index()][piece.index()];
        if let Some(sq) = candidates.lsb() {
            return Some((sq, piece));
        }
    }
    None
}

fn ep_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::White => Square::from_rank_file(to.rank() - 1, to.file()),
        Color::Black => Square::from_rank_file(to.rank() + 1, to.file()),
    }
}

/// Material gained by the capture sequence starting with `m`, from the
/// perspective of the side making `m`. Returns 0 for a non-capturing move.
#[must_use]
pub fn see(position: &Position, m: Move) -> i32 {
    let from = m.from();
    let to = m.to();
    let Some((mover_color, attacker_piece)) = position.piece_at(from) else {
        return 0;
    };

    let is_ep_capture = attacker_piece == Piece::Pawn && Some(to) == position.en_passant && position.piece_at(to).is_none();
    let Some(target_piece) = (if is_ep_capture {
        Some(Piece::Pawn)
    } else {
        position.piece_at(to).map(|(_, p)| p)
    }) else {
        return 0;
    };

    let mut occupied = position.all_occupied;
    occupied.clear(from);
    if is_ep_capture {
        occupied.clear(ep_victim_square(mover_color, to));
    }

    let mut gain = vec![piece_value(target_piece)];
    let mut side = mover_color.opponent();
    let mut last_attacker_value = piece_value(attacker_piece);

    while gain.len() < 32 {
        let attackers = position.attackers_of_color(to, side, occupied);
        let Some((sq, piece)) = least_valuable_attacker(position, attackers, side) else {
            break;
        };
        let prev = *gain.last().unwrap();
        gain.push(last_attacker_value - prev.max(0));
        occupied.clear(sq);
        last_attacker_value = piece_value(piece);
        side = side.opponent();
    }

    for i in (0..gain.len().saturating_sub(1)).rev() {
        gain[i] = gain[i].min(-gain[i + 1]);
    }
    gain[0]
}
