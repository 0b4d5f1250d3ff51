//! Progress reports sent from the main search thread to the caller.

use std::fmt;
use std::time::Duration;

use kestrel_core::Move;

use crate::{MATE, MATE_BOUND};

/// Statistics for one completed principal variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: i32,
    pub seldepth: usize,
    /// 1-based line number.
    pub multipv: usize,
    pub score: i32,
    pub nodes: u64,
    pub time: Duration,
    /// Permille of the transposition table in use.
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    /// Moves to mate, negative when the side to move is getting mated.
    pub fn mate_in(&self) -> Option<i32> {
        if self.score >= MATE_BOUND {
            Some((MATE - self.score + 1) / 2)
        } else if self.score <= -MATE_BOUND {
            Some(-(MATE + self.score) / 2)
        } else {
            None
        }
    }

    pub fn nps(&self) -> u64 {
        let ms = self.time.as_millis() as u64;
        if ms == 0 {
            0
        } else {
            self.nodes * 1000 / ms
        }
    }
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mate_in() {
            Some(n) => write!(f, "info score mate {n}")?,
            None => write!(f, "info score cp {}", self.score)?,
        }
        write!(
            f,
            " multipv {} seldepth {} depth {} nodes {} time {} nps {} hashfull {} pv",
            self.multipv,
            self.seldepth,
            self.depth,
            self.nodes,
            self.time.as_millis(),
            self.nps(),
            self.hashfull
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Info(SearchInfo),
    /// Final answer; `Move::NULL` when the root has no legal move.
    BestMove(Move),
}

impl fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchEvent::Info(info) => info.fmt(f),
            SearchEvent::BestMove(mv) => write!(f, "bestmove {mv}"),
        }
    }
}

#[cfg(test)]
#[path = "info_tests.rs"]
mod info_tests;
