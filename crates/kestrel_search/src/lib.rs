//! Kestrel search
//!
//! Iterative deepening over a negamax/PVS core with quiescence search,
//! staged move ordering (SEE, MVV-LVA, history and killers) and a lock-free
//! transposition table shared by every worker thread.

pub mod history;
pub mod info;
pub mod lmr;
pub mod movepick;
pub mod pool;
pub mod see;
pub mod thread;
pub mod tt;

pub use history::HistoryTable;
pub use info::{SearchEvent, SearchInfo};
pub use movepick::{MovePicker, Stage};
pub use pool::Searcher;
pub use see::see;
pub use thread::{SearchResult, SearchThread};
pub use tt::{Bound, TranspositionTable, TtEntry};

// Search scores have to fit into 16 bits so they can be stored in the TT.

/// Placeholder for "no score available".
pub const NO_SCORE: i32 = 32001;
/// Bound of the root window.
pub const INF: i32 = 32000;
/// Score of delivering mate at the root; a mate at ply `n` scores `MATE - n`.
pub const MATE: i32 = 30000;
/// Deepest ply a search line may reach.
pub const MAX_PLY: usize = 128;
/// Scores at or beyond this magnitude are mate scores.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;
