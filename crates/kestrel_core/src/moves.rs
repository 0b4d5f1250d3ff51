//! Move representation and its 16-bit packed form.
//!
//! A packed move is `from | to << 6 | flag << 12`. The moving piece is not
//! packed; [`Move::unpack`] re-derives it from the position it is applied to.

use std::fmt;

use arrayvec::ArrayVec;

use crate::board::Position;
use crate::types::{Piece, Square, sq_to_coord};

/// Upper bound on the number of moves in any reachable position.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity move buffer; generation never allocates.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Four-bit move kind. Bit 2 marks captures, bit 3 marks promotions and the
/// low two bits of a promotion select the piece (knight..queen).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Normal = 0,
    DoublePush = 1,
    Castle = 2,
    Capture = 4,
    EnPassant = 5,
    KnightPromo = 8,
    BishopPromo = 9,
    RookPromo = 10,
    QueenPromo = 11,
    KnightPromoCapture = 12,
    BishopPromoCapture = 13,
    RookPromoCapture = 14,
    QueenPromoCapture = 15,
}

impl MoveFlag {
    /// Decode the four flag bits. Unused codes decode as `Normal`.
    pub fn from_bits(bits: u8) -> MoveFlag {
        match bits & 15 {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::Castle,
            4 => MoveFlag::Capture,
            5 => MoveFlag::EnPassant,
            8 => MoveFlag::KnightPromo,
            9 => MoveFlag::BishopPromo,
            10 => MoveFlag::RookPromo,
            11 => MoveFlag::QueenPromo,
            12 => MoveFlag::KnightPromoCapture,
            13 => MoveFlag::BishopPromoCapture,
            14 => MoveFlag::RookPromoCapture,
            15 => MoveFlag::QueenPromoCapture,
            _ => MoveFlag::Normal,
        }
    }

    /// Promotion flag for `piece`, with or without a capture.
    pub fn promotion(piece: Piece, capture: bool) -> MoveFlag {
        let base = 8 + (piece.idx() as u8).saturating_sub(1).min(3);
        MoveFlag::from_bits(if capture { base | 4 } else { base })
    }

    #[inline(always)]
    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
    /// The piece standing on `from` before the move.
    pub piece: Piece,
    /// Ordering score, owned by whoever is sorting the move list.
    pub score: i32,
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.flag == other.flag
    }
}

impl Eq for Move {}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl Move {
    /// The "no move" value (`from == to`); prints as `0000`.
    pub const NULL: Move = Move {
        from: 0,
        to: 0,
        flag: MoveFlag::Normal,
        piece: Piece::Pawn,
        score: 0,
    };

    #[inline(always)]
    pub fn new(from: Square, to: Square, flag: MoveFlag, piece: Piece) -> Self {
        Move {
            from,
            to,
            flag,
            piece,
            score: 0,
        }
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.flag.bits() & 4 != 0
    }

    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        self.flag.bits() & 8 != 0
    }

    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline(always)]
    pub fn is_castle(&self) -> bool {
        self.flag == MoveFlag::Castle
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.flag == MoveFlag::EnPassant
    }

    #[inline(always)]
    pub fn is_double_push(&self) -> bool {
        self.flag == MoveFlag::DoublePush
    }

    /// Piece a pawn promotes to, if this is a promotion.
    #[inline]
    pub fn promotion_piece(&self) -> Option<Piece> {
        if self.is_promotion() {
            Some(Piece::from_idx((self.flag.bits() & 3) as usize + 1))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn pack(&self) -> u16 {
        self.from as u16 | (self.to as u16) << 6 | (self.flag.bits() as u16) << 12
    }

    /// Inverse of [`Move::pack`] against the position the move belongs to.
    /// The result is not validated; see `Position::is_pseudo_legal`.
    pub fn unpack(packed: u16, pos: &Position) -> Move {
        let from = (packed & 63) as Square;
        let to = ((packed >> 6) & 63) as Square;
        let flag = MoveFlag::from_bits((packed >> 12) as u8);
        let piece = pos.piece_at(from).unwrap_or(Piece::Pawn);
        Move::new(from, to, flag, piece)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", sq_to_coord(self.from), sq_to_coord(self.to))?;
        if let Some(p) = self.promotion_piece() {
            write!(f, "{}", p.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "moves_tests.rs"]
mod moves_tests;
