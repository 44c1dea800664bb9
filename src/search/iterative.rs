//! Time-budget computation for a `go` command, handed to `Searcher::run`.

use super::SearchLimits;
use crate::config::EngineConfig;
use crate::piece::Color;

/// How many milliseconds this side should spend on its move, given the
/// clock state reported in `go`. A `movetime` or `infinite` request is
/// honored exactly; otherwise the remaining clock is divided down so a
/// game's time doesn't run out before its moves do.
#[must_use]
pub fn time_budget_ms(limits: &SearchLimits, side: Color, config: &EngineConfig) -> u128 {
    if limits.infinite {
        return u128::MAX;
    }
    if let Some(movetime) = limits.movetime {
        return movetime as u128;
    }

    let (remaining, increment) = match side {
        Color::White => (limits.wtime, limits.winc.unwrap_or(0)),
        Color::Black => (limits.btime, limits.binc.unwrap_or(0)),
    };

    let Some(remaining) = remaining else {
        return u128::MAX;
    };

    let divisor = if increment > 0 {
        config.time_divisor_with_increment
    } else {
        config.time_divisor_without_increment
    };

    let moves_left = limits.movestogo.unwrap_or(divisor).max(1);
    let base = remaining / moves_left.min(divisor).max(1);
    let budget = base + increment / 2;

    // Never plan to use more than the clock holds; leave a small buffer for
    // the overhead of actually returning the move.
    budget.min(remaining.saturating_sub(50).max(1)) as u128
}
