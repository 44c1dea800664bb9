//! Tactical sanity checks: the engine should not blunder material in simple,
//! unambiguous positions.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use harrier::config::EngineConfig;
use harrier::position::Position;
use harrier::search::{SearchLimits, Searcher};
use harrier::tt::TranspositionTable;

fn search_depth(fen: &str, depth: i32) -> String {
    let mut pos = Position::from_fen(fen).unwrap();
    let mut tt = TranspositionTable::with_size_mb(4);
    let config = EngineConfig::default();
    let stop = Arc::new(AtomicBool::new(false));
    let mut searcher = Searcher::new(&mut pos, &mut tt, &config, stop);
    let limits = SearchLimits {
        depth: Some(depth),
        ..Default::default()
    };
    let info = searcher.run(&limits, u128::MAX);
    info.pv.first().expect("search should find a move").to_string()
}

#[test]
fn avoids_hanging_the_queen() {
    // White to move; Qc6?? hangs the queen to the b7 pawn.
    let fen = "r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3";
    let best = search_depth(fen, 4);
    assert_ne!(best, "f3c6", "should not hang the queen on c6");
}

#[test]
fn captures_a_free_bishop() {
    // White to move; the bishop on c4 can take the undefended bishop on c6,
    // or find the stronger Bxf7+ fork.
    let fen = "rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4";
    let best = search_depth(fen, 4);
    assert!(
        best == "c4c6" || best == "c4f7",
        "should capture the undefended bishop or find the stronger tactic, got {best}"
    );
}

#[test]
fn iterative_deepening_converges_on_the_opening_move() {
    let mut pos = Position::startpos();
    let mut tt = TranspositionTable::with_size_mb(4);
    let config = EngineConfig::default();
    let stop = Arc::new(AtomicBool::new(false));
    let mut searcher = Searcher::new(&mut pos, &mut tt, &config, stop);

    let limits = SearchLimits {
        depth: Some(3),
        ..Default::default()
    };
    let info = searcher.run(&limits, u128::MAX);
    assert_eq!(info.depth, 3);
    assert!(!info.pv.is_empty());
}
