//! Perft: exhaustive move-path counting used to validate move generation and
//! make/unmake against known node counts.

use crate::movegen::generate_pseudolegal;
use crate::moves::MoveList;
use crate::position::Position;

/// Counts leaf positions reachable in exactly `depth` plies from `pos`,
/// mutating `pos` in place via make/unmake rather than cloning per node.
#[must_use]
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_pseudolegal(pos, &mut list);

    let mut nodes = 0;
    for m in list.iter() {
        if !pos.make_move(m) {
            continue;
        }
        nodes += perft(pos, depth - 1);
        pos.unmake_move(m);
    }
    nodes
}

/// Per-root-move node counts, for `go perft divide`-style debugging.
#[must_use]
pub fn perft_divide(pos: &mut Position, depth: u32) -> Vec<(crate::moves::Move, u64)> {
    let mut list = MoveList::new();
    generate_pseudolegal(pos, &mut list);

    let mut out = Vec::new();
    for m in list.iter() {
        if !pos.make_move(m) {
            continue;
        }
        let nodes = if depth == 0 { 1 } else { perft(pos, depth - 1) };
        pos.unmake_move(m);
        out.push((m, nodes));
    }
    out
}
