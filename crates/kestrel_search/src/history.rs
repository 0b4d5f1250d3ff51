//! Quiet-move ordering statistics, owned by a single search thread.

use kestrel_core::{Color, Move};

use crate::MAX_PLY;

/// Magnitude history scores converge towards but never pass.
pub const HISTORY_MAX: i32 = 16_384;

/// Butterfly history indexed by `[color][from][to]`, plus one killer move
/// per ply.
#[derive(Clone)]
pub struct HistoryTable {
    butterfly: Box<[[[i32; 64]; 64]; 2]>,
    killers: [Move; MAX_PLY],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            butterfly: Box::new([[[0; 64]; 64]; 2]),
            killers: [Move::NULL; MAX_PLY],
        }
    }

    #[inline]
    pub fn score(&self, color: Color, mv: Move) -> i32 {
        self.butterfly[color.idx()][mv.from as usize][mv.to as usize]
    }

    #[inline]
    pub fn killer(&self, ply: usize) -> Move {
        self.killers.get(ply).copied().unwrap_or(Move::NULL)
    }

    /// A quiet move caused a beta cutoff at `depth`, `ply`.
    pub fn update_quiet(&mut self, color: Color, mv: Move, depth: i32, ply: usize) {
        let bonus = (depth * depth).min(HISTORY_MAX);
        let entry = &mut self.butterfly[color.idx()][mv.from as usize][mv.to as usize];
        // Gravity: the closer to the cap, the smaller the step
        *entry += bonus - *entry * bonus / HISTORY_MAX;

        if let Some(killer) = self.killers.get_mut(ply) {
            *killer = mv;
        }
    }

    /// Between searches of the same game: keep the shape of the table but
    /// let the next search re-learn magnitudes. Killers are position
    /// specific and are dropped.
    pub fn soft_reset(&mut self) {
        for value in self.butterfly.iter_mut().flatten().flatten() {
            *value /= 2;
        }
        self.killers = [Move::NULL; MAX_PLY];
    }

    pub fn clear(&mut self) {
        *self.butterfly = [[[0; 64]; 64]; 2];
        self.killers = [Move::NULL; MAX_PLY];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
