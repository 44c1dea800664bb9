//! The UCI command loop: stdin in, `info`/`bestmove` lines out.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::engine::Engine;
use crate::movegen::generate_pseudolegal;
use crate::moves::{Move, MoveList};
use crate::perft::perft;
use crate::piece::Piece;
use crate::position::{FenError, Position};
use crate::search::{iterative::time_budget_ms, SearchInfo, SearchLimits};
use crate::square::Square;

const ENGINE_NAME: &str = "harrier";
const ENGINE_AUTHOR: &str = "harrier contributors";

/// A UCI move literal (`e2e4`, `e7e8q`) that couldn't even be parsed as a
/// from/to square pair. Distinct from a well-formed move that turns out to be
/// illegal in the current position, which is logged and skipped rather than
/// treated as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    TooShort(String),
    BadSquare(String),
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::TooShort(s) => write!(f, "move literal too short: {s}"),
            MoveParseError::BadSquare(s) => write!(f, "invalid square in move literal: {s}"),
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Errors surfaced while handling a single UCI command line. Never fatal to
/// the loop; the caller logs these and moves on to the next line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UciError {
    BadFen(FenError),
    MalformedMove(MoveParseError),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::BadFen(e) => write!(f, "{e}"),
            UciError::MalformedMove(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::BadFen(e)
    }
}

impl From<MoveParseError> for UciError {
    fn from(e: MoveParseError) -> Self {
        UciError::MalformedMove(e)
    }
}

pub fn run_uci_loop() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!("option name Hash type spin default {} min 1 max 4096", engine.config.hash_mb);
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "setoption" => handle_setoption(&mut engine, &parts),
            "ucinewgame" => engine.new_game(),
            "position" => handle_position(&mut engine, &parts),
            "go" => handle_go(&mut engine, &parts),
            "stop" => {
                engine.stop_search();
                if let Some(info) = engine.last_info() {
                    print_bestmove(&info);
                }
            }
            "print" => print_board(&engine.position),
            "perft" => handle_perft(&mut engine, &parts),
            "quit" => {
                engine.stop_search();
                break;
            }
            other => println!("Unknown command: {other}"),
        }

        let _ = stdout.flush();
    }
}

fn handle_setoption(engine: &mut Engine, parts: &[&str]) {
    let Some(name_idx) = parts.iter().position(|&s| s == "name") else { return };
    let Some(value_idx) = parts.iter().position(|&s| s == "value") else { return };
    let name = parts[name_idx + 1..value_idx].join(" ");
    let value = parts[value_idx + 1..].join(" ");
    if name.eq_ignore_ascii_case("Hash") {
        if let Ok(mb) = value.parse::<usize>() {
            engine.set_hash_mb(mb);
        }
    }
}

fn handle_position(engine: &mut Engine, parts: &[&str]) {
    engine.stop_search();
    let mut i = 1;
    if parts.get(i) == Some(&"startpos") {
        engine.position = Position::startpos();
        i += 1;
    } else if parts.get(i) == Some(&"fen") {
        let fen_end = parts[i + 1..]
            .iter()
            .position(|&p| p == "moves")
            .map_or(parts.len(), |offset| i + 1 + offset);
        let fen = parts[i + 1..fen_end].join(" ");
        match Position::from_fen(&fen).map_err(UciError::from) {
            Ok(pos) => engine.position = pos,
            Err(e) => {
                #[cfg(feature = "logging")]
                log::warn!("bad FEN in position command: {e}");
                #[cfg(not(feature = "logging"))]
                let _ = e;
                return;
            }
        }
        i = fen_end;
    }

    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            // A malformed token stops the scan; an illegal-but-well-formed
            // move is logged and skipped, and the rest of the list still
            // applies (matches how a GUI replays a game after one glitch).
            match parse_uci_move(&engine.position, parts[i]).map_err(UciError::from) {
                Ok(Some(m)) if engine.position.make_move(m) => {}
                Ok(_) => {
                    #[cfg(feature = "logging")]
                    log::warn!("illegal move in position command: {}", parts[i]);
                }
                Err(e) => {
                    #[cfg(feature = "logging")]
                    log::warn!("malformed move in position command: {e}");
                    #[cfg(not(feature = "logging"))]
                    let _ = e;
                    break;
                }
            }
            i += 1;
        }
    }
}

fn handle_go(engine: &mut Engine, parts: &[&str]) {
    let mut limits = SearchLimits::default();
    let mut perft_depth = None;
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                limits.depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movetime" => {
                limits.movetime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "wtime" => {
                limits.wtime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "btime" => {
                limits.btime = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "winc" => {
                limits.winc = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "binc" => {
                limits.binc = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movestogo" => {
                limits.movestogo = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "infinite" => {
                limits.infinite = true;
                i += 1;
            }
            "perft" => {
                perft_depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            _ => i += 1,
        }
    }

    if let Some(depth) = perft_depth {
        run_perft_report(&engine.position, depth);
        return;
    }

    let side = engine.position.side_to_move;
    let budget_ms = time_budget_ms(&limits, side, &engine.config);
    engine.start_search(limits, budget_ms, |_, info| print_bestmove(&info));
}

fn handle_perft(engine: &mut Engine, parts: &[&str]) {
    let Some(depth) = parts.get(1).and_then(|s| s.parse().ok()) else {
        println!("perft requires a depth");
        return;
    };
    run_perft_report(&engine.position, depth);
}

fn run_perft_report(pos: &Position, depth: u32) {
    let mut scratch = pos.clone();
    let start = std::time::Instant::now();
    let nodes = perft(&mut scratch, depth);
    let elapsed = start.elapsed();
    println!("perft {depth}: {nodes} nodes in {elapsed:?}");
}

fn print_bestmove(info: &SearchInfo) {
    print!(
        "info depth {} seldepth {} score cp {} nodes {} time {} pv",
        info.depth, info.seldepth, info.score, info.nodes, info.time_ms
    );
    for m in &info.pv {
        print!(" {m}");
    }
    println!();
    let best = info.pv.first().copied().unwrap_or(Move::NULL);
    if best.is_null() {
        println!("bestmove 0000");
    } else {
        println!("bestmove {best}");
    }
}

fn print_board(pos: &Position) {
    for rank in (0..8).rev() {
        print!("{} ", rank + 1);
        for file in 0..8 {
            let sq = Square::from_rank_file(rank, file);
            let c = pos
                .piece_at(sq)
                .map_or('.', |(color, piece)| if color == crate::piece::Color::White {
                    piece.to_char().to_ascii_uppercase()
                } else {
                    piece.to_char()
                });
            print!("{c} ");
        }
        println!();
    }
    println!("  a b c d e f g h");
    println!("fen: {}", pos.to_fen());
}

/// Parses a UCI long-algebraic move (`e2e4`, `e7e8q`) against the current
/// position to recover the promotion piece, which the wire format encodes as
/// a single trailing letter rather than the full move metadata. Returns
/// `Ok(None)` when the literal is well-formed but doesn't match any
/// pseudolegal move (illegal in this position); only a literal that can't
/// even be read as a square pair is `Err`.
fn parse_uci_move(pos: &Position, text: &str) -> Result<Option<Move>, MoveParseError> {
    if text.len() < 4 {
        return Err(MoveParseError::TooShort(text.to_string()));
    }
    let from: Square = text[0..2]
        .parse()
        .map_err(|_| MoveParseError::BadSquare(text.to_string()))?;
    let to: Square = text[2..4]
        .parse()
        .map_err(|_| MoveParseError::BadSquare(text.to_string()))?;
    let promotion = text.chars().nth(4).and_then(Piece::from_char);

    let mut list = MoveList::new();
    generate_pseudolegal(pos, &mut list);
    let found = list
        .iter()
        .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion);
    Ok(found)
}

