//! Time control and search limits.
//!
//! [`GoParams`] is the raw clock information from a `go` command;
//! [`SearchLimits`] turns it into hard/soft budgets, and [`TimeControl`] is the
//! per-search clock that workers poll during search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::types::Color;

/// Moves assumed to remain when the GUI does not say.
pub const DEFAULT_MOVES_TO_GO: u64 = 20;

/// Clock fields of a `go` command, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

/// Search limits that control when an engine should stop searching.
///
/// The hard limit stops every worker at its next checkup. The soft limit is
/// only consulted between iterations: once an iteration alone took longer
/// than it, the next one is not started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum search depth in plies (half-moves)
    pub depth: u8,
    /// Node budget per worker (None = unlimited)
    pub nodes: Option<u64>,
    pub hard_time: Option<Duration>,
    pub soft_time: Option<Duration>,
    /// Number of principal variations to report
    pub multi_pv: usize,
}

impl SearchLimits {
    /// Deepest iteration the search will ever attempt.
    pub const MAX_DEPTH: u8 = 127;

    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: depth.clamp(1, Self::MAX_DEPTH),
            ..Self::infinite()
        }
    }

    /// Create limits with only a node budget.
    pub fn nodes(nodes: u64) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::infinite()
        }
    }

    /// Fixed time per move; hard and soft limits coincide.
    pub fn move_time(time: Duration) -> Self {
        Self {
            hard_time: Some(time),
            soft_time: Some(time),
            ..Self::infinite()
        }
    }

    /// No limit at all; the search runs until stopped.
    pub fn infinite() -> Self {
        Self {
            depth: Self::MAX_DEPTH,
            nodes: None,
            hard_time: None,
            soft_time: None,
            multi_pv: 1,
        }
    }

    /// Derive limits from a `go` command for the side to move.
    ///
    /// hard = min(movetime, time / movestogo + 3 * inc / 4) - overhead and
    /// soft = 7/10 of hard, unless the hard limit came from movetime.
    pub fn from_go(params: &GoParams, stm: Color, overhead: Duration) -> Self {
        let mut limits = Self::infinite();
        if let Some(d) = params.depth {
            limits.depth = d.clamp(1, Self::MAX_DEPTH);
        }
        limits.nodes = params.nodes;

        if params.infinite {
            return limits;
        }

        let (time, inc) = match stm {
            Color::White => (params.wtime, params.winc),
            Color::Black => (params.btime, params.binc),
        };
        let moves_to_go = params.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
        let clock = time.map(|t| t / moves_to_go + 3 * inc.unwrap_or(0) / 4);

        let (hard_ms, from_movetime) = match (params.movetime, clock) {
            (Some(mt), Some(c)) if c < mt => (Some(c), false),
            (Some(mt), _) => (Some(mt), true),
            (None, c) => (c, false),
        };

        if let Some(hard_ms) = hard_ms {
            let hard = Duration::from_millis(hard_ms)
                .saturating_sub(overhead)
                .max(Duration::from_millis(1));
            let soft = if from_movetime { hard } else { hard * 7 / 10 };
            limits.hard_time = Some(hard);
            limits.soft_time = Some(soft);
        }
        limits
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::infinite()
    }
}

/// Thread-safe time controller that tracks whether search should stop.
///
/// This is designed to be cheaply cloneable and shareable across search threads.
/// The `is_stopped()` check is very fast (atomic load) so it can be called
/// frequently during search without performance impact.
#[derive(Debug, Clone)]
pub struct TimeControl {
    /// Shared stop flag
    stopped: Arc<AtomicBool>,
    start_time: Instant,
    hard_limit: Option<Duration>,
    soft_limit: Option<Duration>,
}

impl TimeControl {
    /// Start a new clock for `limits`, sharing `stopped` with the caller.
    pub fn new(limits: &SearchLimits, stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start_time: Instant::now(),
            hard_limit: limits.hard_time,
            soft_limit: limits.soft_time,
        }
    }

    /// Force stop the search immediately.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Check if search should stop.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Check the clock and raise the stop flag once the hard limit passed.
    ///
    /// Reads the system clock; call this periodically rather than per node.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.hard_limit {
            if self.start_time.elapsed() >= limit {
                self.stop();
                return true;
            }
        }

        false
    }

    /// True when an iteration that took `last_iteration` means the next
    /// one should not be started.
    pub fn soft_limit_reached(&self, last_iteration: Duration) -> bool {
        self.soft_limit.is_some_and(|soft| last_iteration >= soft)
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
