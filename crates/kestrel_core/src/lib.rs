//! Board model for the Kestrel engine: bitboards, magic attack tables,
//! Zobrist keys, the copy-make `Position`, pseudo-legal move generation,
//! evaluation, perft and the move text codec.
//!
//! Call [`init`] once before spawning threads; everything else is pure.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod eval;
pub mod magic;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use attacks::init;
pub use bitboard::*;
pub use board::*;
pub use error::{FenError, MoveParseError};
pub use eval::{Accumulator, EVAL_LIMIT, evaluate};
pub use movegen::legal_moves;
pub use moves::{MAX_MOVES, Move, MoveFlag, MoveList};
pub use perft::{perft, perft_divide};
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
