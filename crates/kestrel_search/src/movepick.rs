//! Staged move ordering.
//!
//! Moves come out in the order: hash move, winning and equal captures,
//! quiet moves by history, then losing captures. Each list is only generated
//! when the previous stage runs dry, so a cutoff on the hash move never pays
//! for move generation.

use kestrel_core::{Move, MoveList, Piece, Position};

use crate::history::HistoryTable;
use crate::see::see;

/// Ordering bonus of the ply's killer move, above any history score.
pub const KILLER_BONUS: i32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Best,
    GenNoisy,
    GoodNoisy,
    GenQuiet,
    Quiet,
    BadNoisy,
    Finished,
}

pub struct MovePicker<'a> {
    pos: &'a Position,
    ply: usize,
    hash_move: Move,
    stage: Stage,
    skip_quiets: bool,
    noisy: MoveList,
    bad_noisy: MoveList,
    quiet: MoveList,
}

impl<'a> MovePicker<'a> {
    /// Picker for a full-width node at `ply`. `hash_move` is a packed move
    /// from the transposition table, 0 for none.
    pub fn new(pos: &'a Position, ply: usize, hash_move: u16) -> Self {
        Self {
            pos,
            ply,
            hash_move: Move::unpack(hash_move, pos),
            stage: Stage::Best,
            skip_quiets: false,
            noisy: MoveList::new(),
            bad_noisy: MoveList::new(),
            quiet: MoveList::new(),
        }
    }

    /// Picker that only yields noisy moves. A quiet hash move is ignored.
    pub fn quiescence(pos: &'a Position, hash_move: u16) -> Self {
        let mut picker = Self::new(pos, 0, hash_move);
        picker.skip_quiets = true;
        if picker.hash_move.is_quiet() {
            picker.hash_move = Move::NULL;
        }
        picker
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Next move in ordering priority, `None` once every stage is exhausted.
    /// Moves are pseudo-legal; the caller checks legality when making them.
    pub fn next_move(&mut self, history: &HistoryTable) -> Option<Move> {
        loop {
            match self.stage {
                Stage::Best => {
                    self.stage = Stage::GenNoisy;
                    if !self.hash_move.is_null() && self.pos.is_pseudo_legal(self.hash_move) {
                        return Some(self.hash_move);
                    }
                    self.hash_move = Move::NULL;
                }

                Stage::GenNoisy => {
                    self.pos.gen_noisy(&mut self.noisy);
                    self.score_noisy();
                    self.stage = Stage::GoodNoisy;
                }

                Stage::GoodNoisy => {
                    while let Some(mv) = pick_move(&mut self.noisy) {
                        if mv == self.hash_move {
                            continue;
                        }
                        if see(self.pos, mv, 0) {
                            return Some(mv);
                        }
                        self.bad_noisy.push(mv);
                    }
                    self.stage = Stage::GenQuiet;
                }

                Stage::GenQuiet => {
                    if !self.skip_quiets {
                        self.pos.gen_quiet(&mut self.quiet);
                        self.score_quiet(history);
                    }
                    self.stage = Stage::Quiet;
                }

                Stage::Quiet => {
                    while let Some(mv) = pick_move(&mut self.quiet) {
                        if mv != self.hash_move {
                            return Some(mv);
                        }
                    }
                    self.stage = Stage::BadNoisy;
                }

                Stage::BadNoisy => {
                    // Already filtered against the hash move
                    if let Some(mv) = pick_move(&mut self.bad_noisy) {
                        return Some(mv);
                    }
                    self.stage = Stage::Finished;
                }

                Stage::Finished => return None,
            }
        }
    }

    /// MVV-LVA: the victim dominates, the cheaper attacker breaks ties.
    /// Promotions add the value of the new piece.
    fn score_noisy(&mut self) {
        for mv in self.noisy.iter_mut() {
            let victim = if mv.is_en_passant() {
                Some(Piece::Pawn)
            } else {
                self.pos.piece_at(mv.to)
            };
            mv.score = victim.map_or(0, Piece::mvv)
                + mv.promotion_piece().map_or(0, Piece::mvv)
                + mv.piece.lva();
        }
    }

    fn score_quiet(&mut self, history: &HistoryTable) {
        let stm = self.pos.side_to_move();
        let killer = history.killer(self.ply);
        for mv in self.quiet.iter_mut() {
            mv.score = history.score(stm, *mv);
            if *mv == killer {
                mv.score += KILLER_BONUS;
            }
        }
    }
}

/// Take the highest scoring move out of `list`.
fn pick_move(list: &mut MoveList) -> Option<Move> {
    let best = list
        .iter()
        .enumerate()
        .max_by_key(|(_, mv)| mv.score)
        .map(|(i, _)| i)?;
    Some(list.swap_remove(best))
}

#[cfg(test)]
#[path = "movepick_tests.rs"]
mod movepick_tests;
