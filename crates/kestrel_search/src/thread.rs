//! One search worker: iterative deepening with aspiration windows over a
//! negamax / principal variation search core.
//!
//! Positions are copied before every move, so a pruned or illegal branch
//! never has to be undone.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use tracing::trace;

use kestrel_core::{legal_moves, Move, Piece, Position, SearchLimits, TimeControl};

use crate::history::HistoryTable;
use crate::info::{SearchEvent, SearchInfo};
use crate::lmr;
use crate::movepick::{MovePicker, Stage, KILLER_BONUS};
use crate::tt::{Bound, TranspositionTable};
use crate::{INF, MATE, MATE_BOUND, MAX_PLY, NO_SCORE};

/// Nodes between clock and node-limit checks.
const CHECKUP_INTERVAL: u64 = 2048;

/// Iterations up to this depth search with a full window.
const ASPIRATION_MIN_DEPTH: i32 = 6;
const ASPIRATION_DELTA: i32 = 15;

const RFP_MARGIN: i32 = 80;
const NMP_MIN_DEPTH: i32 = 3;
const IIR_MIN_DEPTH: i32 = 3;

/// Triangular principal variation table.
struct PvTable {
    moves: Vec<[Move; MAX_PLY + 1]>,
    len: [usize; MAX_PLY + 1],
}

impl PvTable {
    fn new() -> Self {
        Self {
            moves: vec![[Move::NULL; MAX_PLY + 1]; MAX_PLY + 1],
            len: [0; MAX_PLY + 1],
        }
    }

    #[inline]
    fn start(&mut self, ply: usize) {
        self.len[ply] = ply;
    }

    /// `mv` raised alpha at `ply`: the line becomes `mv` followed by the
    /// child's line.
    fn update(&mut self, ply: usize, mv: Move) {
        let child_len = self.len[ply + 1].max(ply + 1);
        self.moves[ply][ply] = mv;
        for i in ply + 1..child_len {
            self.moves[ply][i] = self.moves[ply + 1][i];
        }
        self.len[ply] = child_len;
    }

    fn line(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

/// Outcome of [`SearchThread::go`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `Move::NULL` when the root has no legal move.
    pub best_move: Move,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: i32,
    pub nodes: u64,
    pub seldepth: usize,
    /// Legal root moves searched in the last completed iteration.
    pub root_moves: usize,
    pub pv: Vec<Move>,
}

pub struct SearchThread {
    id: usize,
    tt: Arc<TranspositionTable>,
    time: TimeControl,
    limits: SearchLimits,
    history: HistoryTable,
    pv: PvTable,
    nodes: u64,
    seldepth: usize,
    root_moves: usize,
    /// Root moves already reported by earlier lines of this iteration.
    searched_pv: Vec<Move>,
    /// Only the main thread reports progress.
    events: Option<Sender<SearchEvent>>,
}

impl SearchThread {
    pub fn new(
        id: usize,
        tt: Arc<TranspositionTable>,
        time: TimeControl,
        limits: SearchLimits,
        history: HistoryTable,
    ) -> Self {
        Self {
            id,
            tt,
            time,
            limits,
            history,
            pv: PvTable::new(),
            nodes: 0,
            seldepth: 0,
            root_moves: 0,
            searched_pv: Vec::new(),
            events: None,
        }
    }

    /// Make this the main thread: it reports to `events`, honours the soft
    /// time limit and stops the helpers when done.
    pub fn with_events(mut self, events: Sender<SearchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn is_main(&self) -> bool {
        self.events.is_some()
    }

    /// Give the ordering statistics back, e.g. to reuse them next search.
    pub fn into_history(self) -> HistoryTable {
        self.history
    }

    /// Search `root` until a limit is hit or the shared stop flag is set.
    pub fn go(&mut self, root: &Position) -> SearchResult {
        let legal = legal_moves(root);
        let lines = self.limits.multi_pv.clamp(1, legal.len().max(1));

        let mut result = SearchResult {
            best_move: Move::NULL,
            score: 0,
            depth: 0,
            nodes: 0,
            seldepth: 0,
            root_moves: 0,
            pv: Vec::new(),
        };
        let mut line_scores = vec![0; lines];

        self.history.soft_reset();
        self.nodes = 0;

        'deepening: for depth in 1..=self.limits.depth as i32 {
            let iteration_start = self.time.elapsed();
            self.searched_pv.clear();
            self.seldepth = 0;

            for line in 0..lines {
                let score = if depth >= ASPIRATION_MIN_DEPTH {
                    self.aspiration(root, depth, line_scores[line])
                } else {
                    self.negamax(root, depth, 0, -INF, INF)
                };

                if self.time.is_stopped() {
                    break 'deepening;
                }

                line_scores[line] = score;
                let pv = self.pv.line().to_vec();
                if let Some(&first) = pv.first() {
                    self.searched_pv.push(first);
                }
                if line == 0 {
                    result.score = score;
                    result.root_moves = self.root_moves;
                    if let Some(&first) = pv.first() {
                        result.best_move = first;
                    }
                    result.pv = pv.clone();
                }

                self.report(depth, line, score, pv);
            }

            result.depth = depth;
            result.seldepth = self.seldepth;
            trace!(
                thread = self.id,
                depth,
                nodes = self.nodes,
                score = result.score,
                "iteration done"
            );

            if legal.is_empty() {
                break;
            }

            let iteration_time = self.time.elapsed().saturating_sub(iteration_start);
            if self.is_main() && self.time.soft_limit_reached(iteration_time) {
                break;
            }
        }

        // Stopped before the first iteration finished
        if result.best_move.is_null() {
            if let Some(&first) = legal.first() {
                result.best_move = first;
            }
        }
        result.nodes = self.nodes;

        if let Some(events) = &self.events {
            events.send(SearchEvent::BestMove(result.best_move)).ok();
            self.tt.age_up();
            self.time.stop();
        }

        result
    }

    fn report(&self, depth: i32, line: usize, score: i32, pv: Vec<Move>) {
        if let Some(events) = &self.events {
            let info = SearchInfo {
                depth,
                seldepth: self.seldepth,
                multipv: line + 1,
                score,
                nodes: self.nodes,
                time: self.time.elapsed(),
                hashfull: self.tt.hashfull(),
                pv,
            };
            events.send(SearchEvent::Info(info)).ok();
        }
    }

    /// Search around the previous score with a narrow window, widening it
    /// (and doubling the step) on every failure.
    fn aspiration(&mut self, root: &Position, depth: i32, previous: i32) -> i32 {
        let mut delta = ASPIRATION_DELTA;
        let mut alpha = (previous - delta).max(-INF);
        let mut beta = (previous + delta).min(INF);
        let mut fail_highs = 0;

        loop {
            let search_depth = (depth - fail_highs).max(1);
            let score = self.negamax(root, search_depth, 0, alpha, beta);

            if self.time.is_stopped() {
                return 0;
            }

            if score <= alpha {
                beta = (alpha + beta) / 2;
                alpha = (alpha - delta).max(-INF);
                fail_highs = 0;
            } else if score >= beta {
                beta = (beta + delta).min(INF);
                fail_highs += 1;
            } else {
                return score;
            }

            delta *= 2;
        }
    }

    /// Count a node and every `CHECKUP_INTERVAL` nodes check the clock and
    /// node budget. True when the search must unwind.
    #[inline]
    fn checkup(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes % CHECKUP_INTERVAL == 0 {
            let out_of_nodes = self.limits.nodes.is_some_and(|n| self.nodes >= n);
            if out_of_nodes {
                self.time.stop();
            }
            if self.time.check_time() {
                return true;
            }
        }
        self.time.is_stopped()
    }

    fn negamax(
        &mut self,
        pos: &Position,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.pv.start(ply);

        if self.checkup() {
            return 0;
        }

        if ply > 0 && pos.is_draw() {
            return 0;
        }

        let is_pv = beta - alpha > 1;
        let in_check = pos.is_in_check();

        // Mate distance pruning
        alpha = alpha.max(-MATE + ply as i32);
        beta = beta.min(MATE - ply as i32);
        if alpha >= beta {
            return alpha;
        }

        if in_check {
            depth += 1;
        }

        if depth <= 0 || ply >= MAX_PLY - 1 {
            return self.qsearch(pos, ply, alpha, beta);
        }

        let entry = self.tt.probe(pos.hash(), ply);

        if let Some(entry) = entry {
            if !is_pv && ply > 0 && entry.depth as i32 >= depth {
                let cutoff = match entry.bound {
                    Bound::Exact => true,
                    Bound::Lower => entry.score >= beta,
                    Bound::Upper => entry.score <= alpha,
                };
                if cutoff {
                    return entry.score;
                }
            }
        }

        let eval = match entry {
            Some(entry) if entry.eval != NO_SCORE => entry.eval,
            _ if in_check => NO_SCORE,
            _ => pos.evaluate(),
        };
        let mut best_move = entry.map_or(0, |e| e.best_move);

        let pawns_and_kings = pos.pieces(Piece::Pawn) | pos.pieces(Piece::King);
        let pawn_ending = pawns_and_kings == pos.occupied();

        if !is_pv && !in_check && !pawn_ending {
            // Reverse futility pruning
            if beta.abs() < MATE_BOUND && eval >= beta + RFP_MARGIN * depth {
                return eval;
            }

            // Null move pruning: passing and still failing high means this
            // node is very likely a cutoff
            if eval >= beta && depth >= NMP_MIN_DEPTH {
                let r = 3 + depth / 3 + ((eval - beta) / 200).min(3);
                let mut next = *pos;
                next.make_null_move();

                let score = -self.negamax(&next, depth - r, ply + 1, -beta, -beta + 1);
                if self.time.is_stopped() {
                    return 0;
                }
                if score >= beta {
                    return if score >= MATE_BOUND { beta } else { score };
                }
            }
        }

        // Internal iterative reduction
        if is_pv && depth >= IIR_MIN_DEPTH && best_move == 0 {
            depth -= 1;
        }

        let mut best_score = -INF;
        let mut bound = Bound::Upper;
        let mut moves_made = 0;
        let mut picker = MovePicker::new(pos, ply, best_move);

        while let Some(mv) = picker.next_move(&self.history) {
            if ply == 0 && self.searched_pv.contains(&mv) {
                continue;
            }

            let mut next = *pos;
            if !next.make_move(mv) {
                continue;
            }
            self.tt.prefetch(next.hash());
            moves_made += 1;

            // Late move reduction
            let mut reduction = 0;
            if depth >= 2
                && moves_made > 1
                && picker.stage() >= Stage::Quiet
                && mv.score < KILLER_BONUS
            {
                reduction = lmr::reduction(depth, moves_made);
                reduction -= is_pv as i32;
                if next.is_in_check() {
                    reduction -= 1;
                }
                reduction = reduction.max(0);
            }

            let score = if moves_made == 1 {
                -self.negamax(&next, depth - 1, ply + 1, -beta, -alpha)
            } else {
                let reduced = depth - 1 - reduction;
                let zero_window = -self.negamax(&next, reduced, ply + 1, -alpha - 1, -alpha);
                if zero_window > alpha && is_pv {
                    -self.negamax(&next, depth - 1, ply + 1, -beta, -alpha)
                } else {
                    zero_window
                }
            };

            if self.time.is_stopped() {
                return 0;
            }

            if score <= best_score {
                continue;
            }
            best_score = score;
            best_move = mv.pack();

            if score >= beta {
                bound = Bound::Lower;
                if mv.is_quiet() {
                    self.history.update_quiet(pos.side_to_move(), mv, depth, ply);
                }
                break;
            }

            if score > alpha {
                bound = Bound::Exact;
                alpha = score;
                if is_pv {
                    self.pv.update(ply, mv);
                }
            }
        }

        if ply == 0 {
            self.root_moves = moves_made;
        }

        if moves_made == 0 {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }

        self.tt.store(pos.hash(), best_move, best_score, eval, bound, depth, ply);
        best_score
    }

    fn qsearch(&mut self, pos: &Position, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        if self.checkup() {
            return 0;
        }

        if pos.is_draw() {
            return 0;
        }

        self.seldepth = self.seldepth.max(ply);

        let eval = pos.evaluate();
        if ply >= MAX_PLY {
            return eval;
        }

        // Stand pat
        let mut best_score = eval;
        if best_score >= beta {
            return best_score;
        }
        alpha = alpha.max(best_score);

        let hash_move = self.tt.probe(pos.hash(), ply).map_or(0, |e| e.best_move);
        let mut best_move = 0;
        let mut bound = Bound::Upper;
        let mut picker = MovePicker::quiescence(pos, hash_move);

        while let Some(mv) = picker.next_move(&self.history) {
            let mut next = *pos;
            if !next.make_move(mv) {
                continue;
            }
            self.tt.prefetch(next.hash());

            let score = -self.qsearch(&next, ply + 1, -beta, -alpha);
            if self.time.is_stopped() {
                return 0;
            }

            if score <= best_score {
                continue;
            }
            best_score = score;
            best_move = mv.pack();

            if score >= beta {
                bound = Bound::Lower;
                break;
            }
            if score > alpha {
                bound = Bound::Exact;
                alpha = score;
            }
        }

        self.tt.store(pos.hash(), best_move, best_score, eval, bound, 0, ply);
        best_score
    }
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod thread_tests;
