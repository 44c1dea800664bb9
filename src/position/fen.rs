//! FEN parsing and serialization.

use std::fmt;

use super::Position;
use crate::castling::CastlingRights;
use crate::piece::{Color, Piece};
use crate::square::Square;
use crate::zobrist::ZOBRIST;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount(usize),
    BadBoard(String),
    BadSideToMove(String),
    BadCastling(String),
    BadEnPassant(String),
    BadCounter(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount(n) => write!(f, "expected 6 FEN fields, got {n}"),
            FenError::BadBoard(s) => write!(f, "invalid board field: {s}"),
            FenError::BadSideToMove(s) => write!(f, "invalid side to move: {s}"),
            FenError::BadCastling(s) => write!(f, "invalid castling field: {s}"),
            FenError::BadEnPassant(s) => write!(f, "invalid en passant field: {s}"),
            FenError::BadCounter(s) => write!(f, "invalid move counter: {s}"),
        }
    }
}

impl std::error::Error for FenError {}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }

        let mut pos = Position::empty();

        let mut rank = 7i8;
        let mut file = 0i8;
        for c in fields[0].chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(FenError::BadBoard(fields[0].to_string()));
                    }
                    rank -= 1;
                    file = 0;
                }
                d if d.is_ascii_digit() => {
                    file += d.to_digit(10).unwrap() as i8;
                }
                c => {
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    let piece = Piece::from_char(c).ok_or_else(|| FenError::BadBoard(fields[0].to_string()))?;
                    if !(0..8).contains(&rank) || !(0..8).contains(&file) {
                        return Err(FenError::BadBoard(fields[0].to_string()));
                    }
                    pos.place(color, piece, Square::from_rank_file(rank as u8, file as u8));
                    file += 1;
                }
            }
        }
        if rank != 0 || file != 8 {
            return Err(FenError::BadBoard(fields[0].to_string()));
        }

        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        if fields[2].chars().any(|c| !"KQkq-".contains(c)) {
            return Err(FenError::BadCastling(fields[2].to_string()));
        }
        pos.castling_rights = CastlingRights::from_fen_str(fields[2]);

        pos.en_passant = match fields[3] {
            "-" => None,
            s => Some(s.parse::<Square>().map_err(|_| FenError::BadEnPassant(s.to_string()))?),
        };

        pos.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::BadCounter(fields[4].to_string()))?;
        pos.fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::BadCounter(fields[5].to_string()))?;

        pos.key = ZOBRIST.hash_position(&pos.mailbox, pos.castling_rights.0, pos.en_passant, pos.side_to_move);

        Ok(pos)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut board = String::new();
        for rank in (0..8).rev() {
            let mut empties = 0u32;
            for file in 0..8 {
                let sq = Square::from_rank_file(rank, file);
                match self.piece_at(sq) {
                    None => empties += 1,
                    Some((color, piece)) => {
                        if empties > 0 {
                            board.push_str(&empties.to_string());
                            empties = 0;
                        }
                        let c = piece.to_char();
                        board.push(if color == Color::White { c.to_ascii_uppercase() } else { c });
                    }
                }
            }
            if empties > 0 {
                board.push_str(&empties.to_string());
            }
            if rank > 0 {
                board.push('/');
            }
        }

        let side = if self.side_to_move == Color::White { "w" } else { "b" };
        let ep = self.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{board} {side} {castling} {ep} {halfmove} {fullmove}",
            castling = self.castling_rights.to_fen_str(),
            halfmove = self.halfmove_clock,
            fullmove = self.fullmove_number,
        )
    }
}
