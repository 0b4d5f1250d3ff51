//! Coordinate move text ("e2e4", "e7e8q") used by the line protocol.

use crate::error::MoveParseError;
use crate::{board::Position, moves::Move, movegen::legal_moves, types::*};

pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

/// Parse move text and match it against the legal moves so that flags
/// (castle, en passant, double push, capture) come out right.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Result<Move, MoveParseError> {
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(MoveParseError::BadLength(txt.to_string()));
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(|| MoveParseError::BadSquare(txt.to_string()))?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(|| MoveParseError::BadSquare(txt.to_string()))?;
    let promo = match txt.as_bytes().get(4) {
        None => None,
        Some(&b) => match Piece::from_symbol(b as char) {
            Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
            _ => return Err(MoveParseError::BadPromotion(b as char)),
        },
    };

    legal_moves(pos)
        .into_iter()
        .find(|m| m.from == from && m.to == to && m.promotion_piece() == promo)
        .ok_or_else(|| MoveParseError::Illegal(txt.to_string()))
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
