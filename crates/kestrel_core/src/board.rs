//! Bitboard position: piece placement, game state and move application.
//!
//! `Position` is a plain `Copy` value. Search explores a move by copying the
//! parent, calling [`Position::make_move`] on the copy and discarding it when
//! the move turns out to be illegal, so there is no unmake.

use std::fmt;

use crate::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::eval::{self, Accumulator};
use crate::moves::Move;
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Castling right bits
pub const WHITE_KING_SIDE: u8 = 1;
pub const WHITE_QUEEN_SIDE: u8 = 2;
pub const BLACK_KING_SIDE: u8 = 4;
pub const BLACK_QUEEN_SIDE: u8 = 8;

/// Rights kept after a piece leaves or lands on each square.
#[rustfmt::skip]
const CASTLING_UPDATE: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

/// Hashes of earlier positions since the last irreversible move.
pub const HISTORY_CAPACITY: usize = 128;

#[derive(Clone, Copy, Debug)]
pub struct Position {
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    side_to_move: Color,
    en_passant: Option<Square>,
    castling: u8,
    hash: u64,
    halfmove_clock: u16,
    fullmove_number: u16,
    accumulators: [Accumulator; 2],
    history: [u64; HISTORY_CAPACITY],
    history_len: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            en_passant: None,
            castling: 0,
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            accumulators: [Accumulator::default(); 2],
            history: [0; HISTORY_CAPACITY],
            history_len: 0,
        }
    }

    pub fn startpos() -> Self {
        match Self::from_fen(STARTPOS_FEN) {
            Ok(pos) => pos,
            Err(e) => unreachable!("start position FEN is valid: {e}"),
        }
    }

    /// Parse a Forsyth-Edwards Notation string. The clock fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let mut pos = Position::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        // FEN lists rank 8 first, which is also square order
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as usize;
                } else {
                    let piece = Piece::from_symbol(ch).ok_or(FenError::BadPiece(ch))?;
                    if file >= 8 {
                        return Err(FenError::BadRankWidth(8 - row));
                    }
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    pos.add_piece(color, piece, (row * 8 + file) as Square);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::BadRankWidth(8 - row));
                }
            }
            if file != 8 {
                return Err(FenError::BadRankWidth(8 - row));
            }
        }

        for color in Color::ALL {
            if pos.pieces_of(Piece::King, color).popcount() != 1 {
                return Err(FenError::MissingKing);
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSide(other.to_string())),
        };
        if pos.side_to_move == Color::Black {
            pos.hash ^= ZOBRIST.side_to_move;
        }

        if parts[2] != "-" {
            for c in parts[2].chars() {
                pos.castling |= match c {
                    'K' => WHITE_KING_SIDE,
                    'Q' => WHITE_QUEEN_SIDE,
                    'k' => BLACK_KING_SIDE,
                    'q' => BLACK_QUEEN_SIDE,
                    _ => return Err(FenError::BadCastling(c)),
                };
            }
        }
        pos.castling &= pos.consistent_castling();
        pos.hash ^= ZOBRIST.castling_key(pos.castling);

        if parts[3] != "-" {
            let ep = coord_to_sq(parts[3])
                .ok_or_else(|| FenError::BadEnPassant(parts[3].to_string()))?;
            let expected_rank = if pos.side_to_move == Color::White { 5 } else { 2 };
            if rank_of(ep) != expected_rank {
                return Err(FenError::BadEnPassant(parts[3].to_string()));
            }
            // Only keep the target when the pawn that just moved is there
            // and a pawn of the side to move can take it
            let pushed = Self::ep_capture_square(pos.side_to_move, ep);
            if pos
                .pieces_of(Piece::Pawn, pos.side_to_move.other())
                .contains(pushed)
                && pos.ep_capturable(ep, pos.side_to_move)
            {
                pos.en_passant = Some(ep);
                pos.hash ^= ZOBRIST.ep_key(ep);
            }
        }

        if let Some(hmc) = parts.get(4) {
            pos.halfmove_clock = hmc
                .parse()
                .map_err(|_| FenError::BadClock(hmc.to_string()))?;
        }
        if let Some(fmn) = parts.get(5) {
            pos.fullmove_number = fmn
                .parse()
                .map_err(|_| FenError::BadClock(fmn.to_string()))?;
        }

        let them = pos.side_to_move.other();
        if pos.is_attacked_by(pos.king_sq(them), pos.side_to_move) {
            return Err(FenError::OpponentInCheck);
        }

        Ok(pos)
    }

    /// Rights whose king and rook still stand on their home squares.
    fn consistent_castling(&self) -> u8 {
        let mut ok = 0;
        let home = |c: Color, p: Piece, s: Square| self.pieces_of(p, c).contains(s);
        if home(Color::White, Piece::King, squares::E1) {
            if home(Color::White, Piece::Rook, squares::H1) {
                ok |= WHITE_KING_SIDE;
            }
            if home(Color::White, Piece::Rook, squares::A1) {
                ok |= WHITE_QUEEN_SIDE;
            }
        }
        if home(Color::Black, Piece::King, squares::E8) {
            if home(Color::Black, Piece::Rook, squares::H8) {
                ok |= BLACK_KING_SIDE;
            }
            if home(Color::Black, Piece::Rook, squares::A8) {
                ok |= BLACK_QUEEN_SIDE;
            }
        }
        ok
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for row in 0..8u8 {
            let mut empty = 0;
            for file in 0..8u8 {
                let s = row * 8 + file;
                match (self.piece_at(s), self.color_at(s)) {
                    (Some(p), Some(c)) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        let ch = p.symbol();
                        fen.push(if c.is_white() {
                            ch.to_ascii_uppercase()
                        } else {
                            ch
                        });
                    }
                    _ => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move.is_white() { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (bit, ch) in [
                (WHITE_KING_SIDE, 'K'),
                (WHITE_QUEEN_SIDE, 'Q'),
                (BLACK_KING_SIDE, 'k'),
                (BLACK_QUEEN_SIDE, 'q'),
            ] {
                if self.castling & bit != 0 {
                    fen.push(ch);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(ep) => fen.push_str(&sq_to_coord(ep)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));
        fen
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline(always)]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.idx()]
    }

    #[inline(always)]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.idx()] & self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline(always)]
    pub fn accumulator(&self, color: Color) -> &Accumulator {
        &self.accumulators[color.idx()]
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[p.idx()].contains(sq))
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.colors[c.idx()].contains(sq))
    }

    /// Square of `color`'s king. Every position built by `from_fen` has one.
    #[inline(always)]
    pub fn king_sq(&self, color: Color) -> Square {
        let kings = self.pieces_of(Piece::King, color);
        debug_assert!(!kings.is_empty());
        kings.0.trailing_zeros() as Square
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    /// Every piece of either color attacking `sq`, given occupancy `occ`.
    pub fn attacks_at(&self, sq: Square, occ: Bitboard) -> Bitboard {
        (pawn_attacks(sq, Color::White) & self.pieces_of(Piece::Pawn, Color::Black))
            | (pawn_attacks(sq, Color::Black) & self.pieces_of(Piece::Pawn, Color::White))
            | (knight_attacks(sq) & self.pieces(Piece::Knight))
            | (king_attacks(sq) & self.pieces(Piece::King))
            | (bishop_attacks(sq, occ) & self.pieces(Piece::Bishop))
            | (rook_attacks(sq, occ) & self.pieces(Piece::Rook))
            | (queen_attacks(sq, occ) & self.pieces(Piece::Queen))
    }

    #[inline]
    pub fn is_attacked_by(&self, sq: Square, by: Color) -> bool {
        !(self.attacks_at(sq, self.occupied()) & self.color_bb(by)).is_empty()
    }

    /// Is the side to move in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.is_attacked_by(self.king_sq(self.side_to_move), self.side_to_move.other())
    }

    // =========================================================================
    // Draws
    // =========================================================================

    /// Fifty-move rule, or the current position already occurred with the
    /// same side to move since the last irreversible move.
    pub fn is_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }

        let window = self.halfmove_clock as usize;
        let mut i = self.history_len;
        while i >= 2 && self.history_len - (i - 2) <= window {
            i -= 2;
            if self.history[i] == self.hash {
                return true;
            }
        }
        false
    }

    // =========================================================================
    // Move application
    // =========================================================================

    /// Square of the pawn removed by an en passant capture landing on `ep`.
    #[inline(always)]
    fn ep_capture_square(mover: Color, to: Square) -> Square {
        match mover {
            Color::White => to + 8,
            Color::Black => to - 8,
        }
    }

    /// True if a `capturer` pawn attacks the skipped square `ep`.
    #[inline(always)]
    fn ep_capturable(&self, ep: Square, capturer: Color) -> bool {
        !(pawn_attacks(ep, capturer.other()) & self.pieces_of(Piece::Pawn, capturer)).is_empty()
    }

    /// Apply a pseudo-legal move. Returns false if it left the mover's king
    /// attacked; the position is then garbage and must be discarded.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = us.other();
        let (from, to) = (mv.from, mv.to);
        let irreversible = mv.piece == Piece::Pawn || mv.is_capture();

        self.record_history(irreversible);

        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        if irreversible {
            self.halfmove_clock = 0;
        }

        if mv.is_en_passant() {
            self.clear_piece(them, Piece::Pawn, Self::ep_capture_square(us, to));
        } else if mv.is_capture() {
            // Kings are never captured
            let target = [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
            ]
            .into_iter()
            .find(|p| self.pieces[p.idx()].contains(to));
            if let Some(target) = target {
                self.clear_piece(them, target, to);
            }
        } else if mv.is_castle() {
            let (rook_from, rook_to) = match to {
                squares::G1 => (squares::H1, squares::F1),
                squares::C1 => (squares::A1, squares::D1),
                squares::G8 => (squares::H8, squares::F8),
                _ => (squares::A8, squares::D8),
            };
            self.move_piece(us, Piece::Rook, rook_from, rook_to);
        }

        let placed = mv.promotion_piece().unwrap_or(mv.piece);
        self.clear_piece(us, mv.piece, from);
        self.add_piece(us, placed, to);

        self.hash ^= ZOBRIST.castling_key(self.castling);
        self.castling &= CASTLING_UPDATE[from as usize] & CASTLING_UPDATE[to as usize];
        self.hash ^= ZOBRIST.castling_key(self.castling);

        self.change_side();

        if mv.is_double_push() {
            let ep = Self::ep_capture_square(us, to);
            if self.ep_capturable(ep, them) {
                self.en_passant = Some(ep);
                self.hash ^= ZOBRIST.ep_key(ep);
            }
        }

        !self.is_attacked_by(self.king_sq(us), them)
    }

    /// Pass the turn without moving.
    pub fn make_null_move(&mut self) {
        self.record_history(false);
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        self.change_side();
    }

    fn change_side(&mut self) {
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.ep_key(ep);
        }
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.other();
        self.hash ^= ZOBRIST.side_to_move;
    }

    fn record_history(&mut self, irreversible: bool) {
        if irreversible {
            self.history_len = 0;
            return;
        }
        if self.history_len == HISTORY_CAPACITY {
            self.history.copy_within(1.., 0);
            self.history_len -= 1;
        }
        self.history[self.history_len] = self.hash;
        self.history_len += 1;
    }

    #[inline(always)]
    fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.pieces[piece.idx()].set(sq);
        self.colors[color.idx()].set(sq);
        self.hash ^= ZOBRIST.piece_key(color, piece, sq);
        self.accumulators[color.idx()].add(color, piece, sq);
    }

    #[inline(always)]
    fn clear_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.pieces[piece.idx()].clear(sq);
        self.colors[color.idx()].clear(sq);
        self.hash ^= ZOBRIST.piece_key(color, piece, sq);
        self.accumulators[color.idx()].remove(color, piece, sq);
    }

    #[inline(always)]
    fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.clear_piece(color, piece, from);
        self.add_piece(color, piece, to);
    }

    // =========================================================================
    // Verification helpers
    // =========================================================================

    /// Hash recomputed from scratch; always equals [`Position::hash`].
    pub fn compute_hash(&self) -> u64 {
        let mut h = 0u64;
        for color in Color::ALL {
            for piece in Piece::ALL {
                for s in self.pieces_of(piece, color) {
                    h ^= ZOBRIST.piece_key(color, piece, s);
                }
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_to_move;
        }
        h ^= ZOBRIST.castling_key(self.castling);
        if let Some(ep) = self.en_passant {
            h ^= ZOBRIST.ep_key(ep);
        }
        h
    }

    /// Accumulators recomputed from scratch.
    pub fn compute_accumulators(&self) -> [Accumulator; 2] {
        let mut acc = [Accumulator::default(); 2];
        for color in Color::ALL {
            for piece in Piece::ALL {
                for s in self.pieces_of(piece, color) {
                    acc[color.idx()].add(color, piece, s);
                }
            }
        }
        acc
    }

    /// Static evaluation from the side to move's point of view.
    #[inline]
    pub fn evaluate(&self) -> i32 {
        eval::evaluate(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " +---+---+---+---+---+---+---+---+")?;
        for row in 0..8u8 {
            for file in 0..8u8 {
                let s = row * 8 + file;
                let ch = match (self.piece_at(s), self.color_at(s)) {
                    (Some(p), Some(Color::White)) => p.symbol().to_ascii_uppercase(),
                    (Some(p), _) => p.symbol(),
                    _ => ' ',
                };
                write!(f, " | {ch}")?;
            }
            writeln!(f, " | {}", 8 - row)?;
            writeln!(f, " +---+---+---+---+---+---+---+---+")?;
        }
        writeln!(f, "   a   b   c   d   e   f   g   h")?;
        writeln!(f)?;
        writeln!(f, "Fen: {}", self.to_fen())?;
        write!(f, "Key: {:016X}", self.hash)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
