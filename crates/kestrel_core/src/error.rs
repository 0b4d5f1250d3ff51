//! Error types for text input accepted by the core: FEN strings and
//! coordinate move text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("invalid piece character '{0}'")]
    BadPiece(char),
    #[error("rank {0} does not describe exactly 8 files")]
    BadRankWidth(usize),
    #[error("invalid side to move '{0}'")]
    BadSide(String),
    #[error("invalid castling character '{0}'")]
    BadCastling(char),
    #[error("invalid en passant square '{0}'")]
    BadEnPassant(String),
    #[error("invalid clock value '{0}'")]
    BadClock(String),
    #[error("each side needs exactly one king")]
    MissingKing,
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("move text '{0}' must be 4 or 5 characters")]
    BadLength(String),
    #[error("invalid square in '{0}'")]
    BadSquare(String),
    #[error("invalid promotion piece '{0}'")]
    BadPromotion(char),
    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}
