//! Property-based invariants: FEN round-trip, make/unmake symmetry, and SEE
//! bounds, exercised over random legal move sequences.

use harrier::movegen::generate_pseudolegal;
use harrier::moves::MoveList;
use harrier::piece::Piece;
use harrier::position::{see, Position};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn play_random_moves(pos: &mut Position, rng: &mut StdRng, count: usize) {
    for _ in 0..count {
        let mut list = MoveList::new();
        generate_pseudolegal(pos, &mut list);
        if list.is_empty() {
            break;
        }
        let mut tried = 0;
        while tried < list.len() {
            let idx = rng.gen_range(0..list.len());
            let m = list.get(idx);
            if pos.make_move(m) {
                break;
            }
            tried += 1;
        }
    }
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=20usize
}

proptest! {
    /// make_move followed by unmake_move restores the key and FEN exactly.
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);

        let initial_key = pos.key;
        let initial_fen = pos.to_fen();

        let mut played = Vec::new();
        for _ in 0..num_moves {
            let mut list = MoveList::new();
            generate_pseudolegal(&pos, &mut list);
            if list.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..list.len());
            let m = list.get(idx);
            if pos.make_move(m) {
                played.push(m);
            }
        }

        for m in played.into_iter().rev() {
            pos.unmake_move(m);
        }

        prop_assert_eq!(pos.key, initial_key);
        prop_assert_eq!(pos.to_fen(), initial_fen);
    }

    /// A position round-tripped through `to_fen`/`from_fen` has the same key,
    /// side to move, and castling/en-passant state.
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut pos, &mut rng, num_moves);

        let fen = pos.to_fen();
        let restored = Position::from_fen(&fen).unwrap();

        prop_assert_eq!(pos.key, restored.key);
        prop_assert_eq!(pos.side_to_move, restored.side_to_move);
        prop_assert_eq!(pos.castling_rights.0, restored.castling_rights.0);
        prop_assert_eq!(pos.en_passant.map(|s| s.to_string()), restored.en_passant.map(|s| s.to_string()));
    }

    /// SEE on a capture never claims more than the victim's own value plus a
    /// small margin for follow-on exchanges it legitimately wins.
    #[test]
    fn prop_see_bounded_by_victim(seed in seed_strategy(), num_moves in 0..15usize) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut pos, &mut rng, num_moves);

        let mut list = MoveList::new();
        generate_pseudolegal(&pos, &mut list);
        for m in list.iter() {
            let Some((_, victim)) = pos.piece_at(m.to()) else { continue };
            let value = victim.value_mg();
            let queen_value = Piece::Queen.value_mg();
            prop_assert!(
                see(&pos, m) <= value + queen_value,
                "SEE for a capture of a {:?} should not exceed its value by more than a queen",
                victim
            );
        }
    }

    /// SEE for an undefended capture equals the victim's value exactly.
    #[test]
    fn prop_see_undefended_equals_value(_seed in seed_strategy()) {
        let pos = Position::from_fen("8/8/8/3p4/4N3/8/8/4K2k w - - 0 1").unwrap();
        let mut list = MoveList::new();
        generate_pseudolegal(&pos, &mut list);
        for m in list.iter() {
            if pos.piece_at(m.to()).is_some() {
                prop_assert_eq!(see(&pos, m), Piece::Pawn.value_mg());
            }
        }
    }
}
