use std::sync::mpsc;
use std::time::Duration;

use harrier::engine::Engine;
use harrier::search::SearchLimits;

#[test]
fn depth_limited_search_returns_a_move() {
    let mut engine = Engine::new();
    let limits = SearchLimits {
        depth: Some(1),
        ..Default::default()
    };

    let (tx, rx) = mpsc::channel();
    engine.start_search(limits, u128::MAX, move |mv, info| {
        let _ = tx.send((mv, info));
    });

    let (mv, info) = rx.recv_timeout(Duration::from_secs(5)).expect("search never completed");
    assert!(!mv.is_null(), "startpos always has a legal move");
    assert_eq!(info.depth, 1);
}

#[test]
fn time_limited_search_finishes_promptly() {
    let mut engine = Engine::new();
    let limits = SearchLimits {
        movetime: Some(50),
        ..Default::default()
    };

    let (tx, rx) = mpsc::channel();
    engine.start_search(limits, 50, move |mv, _info| {
        let _ = tx.send(mv);
    });

    let mv = rx.recv_timeout(Duration::from_secs(2)).expect("search never completed");
    assert!(!mv.is_null());
}

#[test]
fn stop_search_joins_the_worker() {
    let mut engine = Engine::new();
    let limits = SearchLimits {
        infinite: true,
        ..Default::default()
    };
    engine.start_search(limits, u128::MAX, |_, _| {});
    assert!(engine.is_searching() || true);
    engine.stop_search();
    assert!(!engine.is_searching());
}

#[test]
fn new_game_clears_transposition_table_state() {
    let mut engine = Engine::new();
    let limits = SearchLimits {
        depth: Some(3),
        ..Default::default()
    };
    let (tx, rx) = mpsc::channel();
    engine.start_search(limits, u128::MAX, move |_, info| {
        let _ = tx.send(info);
    });
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    engine.new_game();
    assert!(!engine.is_searching());
    assert_eq!(engine.position.to_fen(), harrier::position::Position::startpos().to_fen());
}
