//! Iterative-deepening PVS alpha-beta search with a transposition table.

pub mod iterative;
pub mod ordering;
pub mod quiescence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::movegen::{MoveGenerator, Stage};
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::position::{evaluate, Position};
use crate::square::Square;
use crate::tt::{Bound, TranspositionTable, MATE_IN_MAX, MATE_SCORE};

use ordering::{HistoryTable, KillerTable};

pub const MAX_PLY: usize = 128;

/// Is `sq` one step from promotion for `color`? Used to gate the pawn-push
/// search extension.
fn is_seventh_rank(sq: Square, color: Color) -> bool {
    match color {
        Color::White => sq.rank() == 6,
        Color::Black => sq.rank() == 1,
    }
}

pub struct SearchLimits {
    pub depth: Option<i32>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub infinite: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth: None,
            movetime: None,
            wtime: None,
            btime: None,
            winc: None,
            binc: None,
            movestogo: None,
            infinite: false,
        }
    }
}

#[derive(Clone)]
pub struct SearchInfo {
    pub depth: i32,
    pub seldepth: i32,
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u128,
    pub pv: Vec<Move>,
}

pub struct Searcher<'a> {
    pub pos: &'a mut Position,
    tt: &'a mut TranspositionTable,
    config: &'a EngineConfig,
    killers: KillerTable,
    history: HistoryTable,
    pub(crate) stop: Arc<AtomicBool>,
    pub(crate) nodes: u64,
    pub(crate) seldepth: i32,
    start: Instant,
    budget_ms: u128,
}

impl<'a> Searcher<'a> {
    #[must_use]
    pub fn new(pos: &'a mut Position, tt: &'a mut TranspositionTable, config: &'a EngineConfig, stop: Arc<AtomicBool>) -> Self {
        Searcher {
            pos,
            tt,
            config,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stop,
            nodes: 0,
            seldepth: 0,
            start: Instant::now(),
            budget_ms: u128::MAX,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(crate) fn check_time(&self) {
        if self.nodes & self.config.node_time_check_mask == 0
            && self.start.elapsed().as_millis() >= self.budget_ms
        {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    fn has_non_pawn_material(&self, color: Color) -> bool {
        use crate::piece::Piece::*;
        [Knight, Bishop, Rook, Queen]
            .iter()
            .any(|&p| !self.pos.pieces[color.index()][p.index()].is_empty())
    }

    fn is_repetition_or_fifty(&self) -> bool {
        if self.pos.halfmove_clock >= 100 {
            return true;
        }
        let limit = self.pos.halfmove_clock as usize;
        let history = &self.pos.history;
        if history.is_empty() {
            return false;
        }
        let mut idx = history.len();
        let mut steps_back = 0;
        while steps_back + 2 <= limit && idx >= 2 {
            idx -= 2;
            steps_back += 2;
            if history[idx].key == self.pos.key {
                return true;
            }
        }
        false
    }

    /// A tiny alternating offset instead of a flat zero, so the search isn't
    /// blind between two draws and can still prefer one over the other.
    fn draw_value(&self) -> i32 {
        2 * (self.nodes & 1) as i32 - 1
    }

    pub fn run(&mut self, limits: &SearchLimits, budget_ms: u128) -> SearchInfo {
        self.budget_ms = budget_ms;
        self.start = Instant::now();
        self.nodes = 0;
        self.seldepth = 0;
        self.killers.clear();
        self.history.clear();

        let max_depth = limits.depth.unwrap_or(MAX_PLY as i32 - 1).min(MAX_PLY as i32 - 1);
        let mut best = SearchInfo {
            depth: 0,
            seldepth: 0,
            score: 0,
            nodes: 0,
            time_ms: 0,
            pv: vec![],
        };

        let mut score = 0;
        let mut delta = self.config.aspiration_delta;
        let mut alpha = -MATE_SCORE;
        let mut beta = MATE_SCORE;

        for depth in 1..=max_depth {
            if depth >= 6 {
                alpha = (score - delta).max(-MATE_SCORE);
                beta = (score + delta).min(MATE_SCORE);
            } else {
                alpha = -MATE_SCORE;
                beta = MATE_SCORE;
            }

            loop {
                let result = self.negamax(depth, 0, alpha, beta, false, None);
                if self.stop.load(Ordering::Relaxed) {
                    break;
                }
                if result <= alpha {
                    beta = (alpha + beta) / 2;
                    alpha = (result - delta).max(-MATE_SCORE);
                    delta += delta / 4 + 5;
                } else if result >= beta {
                    beta = (result + delta).min(MATE_SCORE);
                    delta += delta / 4 + 5;
                } else {
                    score = result;
                    break;
                }
            }

            if self.stop.load(Ordering::Relaxed) && depth > 1 {
                break;
            }

            best.depth = depth;
            best.seldepth = self.seldepth;
            best.score = score;
            best.nodes = self.nodes;
            best.time_ms = self.start.elapsed().as_millis();
            best.pv = self.extract_pv(depth);

            if self.stop.load(Ordering::Relaxed) {
                break;
            }
        }

        best
    }

    fn extract_pv(&mut self, max_len: i32) -> Vec<Move> {
        let mut pv = Vec::new();
        for _ in 0..max_len.max(1) {
            let Some(probe) = self.tt.probe(self.pos.key, 0, self.pos.halfmove_clock) else {
                break;
            };
            let Some(mv) = probe.mv else { break };
            if pv.contains(&mv) || !self.pos.make_move(mv) {
                break;
            }
            pv.push(mv);
        }
        for &mv in pv.iter().rev() {
            self.pos.unmake_move(mv);
        }
        pv
    }

    fn negamax(
        &mut self,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        prev_was_null: bool,
        prev_capture_to: Option<Square>,
    ) -> i32 {
        self.nodes += 1;
        if ply as i32 > self.seldepth {
            self.seldepth = ply as i32;
        }
        self.check_time();
        if self.stop.load(Ordering::Relaxed) {
            return 0;
        }

        let pv_node = beta - alpha > 1;
        let in_check = self.pos.in_check(self.pos.side_to_move);

        if ply > 0 {
            if self.is_repetition_or_fifty() {
                return self.draw_value();
            }
            alpha = alpha.max(-MATE_SCORE + ply as i32);
            beta = beta.min(MATE_SCORE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        if depth <= 0 {
            return quiescence::quiescence(self, alpha, beta, ply);
        }

        let r50 = self.pos.halfmove_clock;
        let probe = self.tt.probe(self.pos.key, ply, r50);
        if let Some(p) = &probe {
            if !pv_node && p.depth >= depth && r50 < 90 {
                match p.bound {
                    Bound::Exact => return p.score,
                    Bound::Lower if p.score >= beta => return p.score,
                    Bound::Upper if p.score <= alpha => return p.score,
                    _ => {}
                }
            }
        }
        let tt_move = probe.as_ref().and_then(|p| p.mv);

        let mut static_eval = evaluate(self.pos);
        if prev_was_null {
            static_eval += 50;
        }

        if !pv_node
            && !in_check
            && depth <= self.config.futility_max_depth
            && static_eval.abs() < MATE_IN_MAX
            && static_eval - self.config.futility_margin_per_ply * depth >= beta
        {
            return static_eval;
        }

        if !pv_node
            && !in_check
            && !prev_was_null
            && depth >= self.config.null_move_min_depth
            && static_eval >= beta
            && self.has_non_pawn_material(self.pos.side_to_move)
        {
            let r = (11 + depth) / 3 + ((static_eval - beta) / 150).min(3);
            self.pos.make_null();
            let null_score = -self.negamax((depth - 1 - r).max(0), ply + 1, -beta, -beta + 1, true, None);
            self.pos.unmake_null();
            if !self.stop.load(Ordering::Relaxed) && null_score >= beta {
                if depth < 13 {
                    return null_score;
                }
                let verify = self.negamax((depth - 1 - r).max(0), ply, beta - 1, beta, false, None);
                if verify >= beta {
                    return null_score;
                }
            }
        }

        if pv_node && depth >= 4 && tt_move.is_none() {
            depth -= 1;
        }

        let mut gen = MoveGenerator::new(self.pos, tt_move, &self.killers, &self.history, ply);
        let mut move_count = 0usize;
        let mut best_score = -MATE_SCORE;
        let mut best_move = Move::NULL;
        let mut bound = Bound::Upper;
        let mut quiets_tried: Vec<(Color, Square, Square)> = Vec::new();

        while let Some((m, stage)) = gen.next() {
            let (mover_color, moving_piece) =
                self.pos.piece_at(m.from()).expect("pseudolegal move has a mover");
            let is_tactical = matches!(stage, Stage::TacticalCaptures) || m.promotion().is_some();
            let is_capture = self.pos.piece_at(m.to()).is_some()
                || (moving_piece == Piece::Pawn && Some(m.to()) == self.pos.en_passant);
            let is_recapture = is_capture && prev_capture_to == Some(m.to());
            let is_pawn_push = moving_piece == Piece::Pawn && !is_capture;
            let pawn_push_to_seventh =
                is_pawn_push && is_seventh_rank(m.to(), self.pos.side_to_move);
            let hist_score = self.history.score(mover_color, m.from(), m.to());

            if !self.pos.make_move(m) {
                continue;
            }
            move_count += 1;

            let gives_check = self.pos.in_check(self.pos.side_to_move);
            let mut extension = i32::from(gives_check);
            if extension == 0 && (pv_node || depth <= 4) {
                if pawn_push_to_seventh {
                    extension = 1;
                } else if is_recapture {
                    let see_score = -quiescence::quiescence(self, -alpha - 1, -alpha, ply + 1);
                    if see_score > alpha {
                        extension = 1;
                    }
                }
            }
            let new_depth = depth - 1 + extension;
            let child_prev_capture = if is_capture { Some(m.to()) } else { None };

            let score = if move_count == 1 {
                -self.negamax(new_depth, ply + 1, -beta, -alpha, false, child_prev_capture)
            } else {
                let mut reduction = 0;
                if !pv_node
                    && depth >= self.config.lmr_min_depth
                    && move_count > self.config.lmr_move_threshold
                    && !is_tactical
                    && !gives_check
                    && moving_piece != Piece::King
                    && !is_pawn_push
                    && !is_recapture
                    && static_eval.abs() < MATE_IN_MAX
                    && hist_score < -depth
                {
                    reduction = depth / 3;
                }
                let reduced = (new_depth - reduction).max(0);
                let mut s = -self.negamax(reduced, ply + 1, -alpha - 1, -alpha, false, child_prev_capture);
                if s > alpha && (reduction > 0 || s < beta) {
                    s = -self.negamax(new_depth, ply + 1, -beta, -alpha, false, child_prev_capture);
                }
                s
            };

            self.pos.unmake_move(m);

            if self.stop.load(Ordering::Relaxed) {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = m;
                if score > alpha {
                    alpha = score;
                    bound = Bound::Exact;
                }
            }

            if alpha >= beta {
                bound = Bound::Lower;
                if !is_tactical {
                    self.killers.store(ply, m);
                    self.history.update(mover_color, m.from(), m.to(), depth);
                    for &(c, from, to) in &quiets_tried {
                        self.history.penalize(c, from, to, depth);
                    }
                }
                break;
            }

            if !is_tactical {
                quiets_tried.push((mover_color, m.from(), m.to()));
            }
        }

        if move_count == 0 {
            return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
        }

        self.tt.store(self.pos.key, Some(best_move), best_score, depth, bound, ply);
        best_score
    }
}
