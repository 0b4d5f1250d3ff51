//! Pseudo-legal move generation.
//!
//! Moves are split into two passes: [`Position::gen_noisy`] (captures,
//! en passant and every promotion) and [`Position::gen_quiet`] (pushes,
//! quiet piece moves and castling). Neither checks king safety; that is
//! resolved by [`Position::make_move`] returning false.

use crate::attacks::{
    attacks, between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks,
    queen_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::board::{
    BLACK_KING_SIDE, BLACK_QUEEN_SIDE, Position, WHITE_KING_SIDE, WHITE_QUEEN_SIDE,
};
use crate::moves::{Move, MoveFlag, MoveList};
use crate::types::{Color, Piece, Square, squares};

const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Knight, Piece::Rook, Piece::Bishop];

struct CastleRule {
    right: u8,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
}

const CASTLES: [[CastleRule; 2]; 2] = [
    [
        CastleRule {
            right: WHITE_KING_SIDE,
            king_from: squares::E1,
            king_to: squares::G1,
            rook_from: squares::H1,
        },
        CastleRule {
            right: WHITE_QUEEN_SIDE,
            king_from: squares::E1,
            king_to: squares::C1,
            rook_from: squares::A1,
        },
    ],
    [
        CastleRule {
            right: BLACK_KING_SIDE,
            king_from: squares::E8,
            king_to: squares::G8,
            rook_from: squares::H8,
        },
        CastleRule {
            right: BLACK_QUEEN_SIDE,
            king_from: squares::E8,
            king_to: squares::C8,
            rook_from: squares::A8,
        },
    ],
];

#[inline(always)]
fn piece_attacks(piece: Piece, from: Square, occ: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(from),
        Piece::Bishop => bishop_attacks(from, occ),
        Piece::Rook => rook_attacks(from, occ),
        Piece::Queen => queen_attacks(from, occ),
        _ => king_attacks(from),
    }
}

/// Rank a pawn of `color` stands on just before promoting.
#[inline(always)]
fn promo_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_7,
        Color::Black => Bitboard::RANK_2,
    }
}

/// Rank a pawn of `color` reaches with a single push from its start rank.
#[inline(always)]
fn third_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_3,
        Color::Black => Bitboard::RANK_6,
    }
}

#[inline(always)]
fn forward(color: Color, bb: Bitboard) -> Bitboard {
    match color {
        Color::White => bb.north(),
        Color::Black => bb.south(),
    }
}

/// Square behind `to` from `color`'s point of view.
#[inline(always)]
fn backward(color: Color, to: Square, steps: u8) -> Square {
    match color {
        Color::White => to + 8 * steps,
        Color::Black => to - 8 * steps,
    }
}

impl Position {
    /// Captures, en passant and all promotions (capturing or not).
    pub fn gen_noisy(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let occ = self.occupied();
        let enemies = self.color_bb(us.other());

        for piece in [
            Piece::King,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
        ] {
            for from in self.pieces_of(piece, us) {
                for to in piece_attacks(piece, from, occ) & enemies {
                    list.push(Move::new(from, to, MoveFlag::Capture, piece));
                }
            }
        }

        let promo_from = promo_rank(us);
        for from in self.pieces_of(Piece::Pawn, us) {
            let mut targets = pawn_attacks(from, us);

            if let Some(ep) = self.en_passant() {
                if targets.contains(ep) {
                    list.push(Move::new(from, ep, MoveFlag::EnPassant, Piece::Pawn));
                    targets.clear(ep);
                }
            }

            let promoting = promo_from.contains(from);
            for to in targets & enemies {
                if promoting {
                    for p in PROMOTIONS {
                        list.push(Move::new(from, to, MoveFlag::promotion(p, true), Piece::Pawn));
                    }
                } else {
                    list.push(Move::new(from, to, MoveFlag::Capture, Piece::Pawn));
                }
            }
        }

        // Push promotions
        let pushers = self.pieces_of(Piece::Pawn, us) & promo_from;
        for to in forward(us, pushers) & !occ {
            let from = backward(us, to, 1);
            for p in PROMOTIONS {
                list.push(Move::new(from, to, MoveFlag::promotion(p, false), Piece::Pawn));
            }
        }
    }

    /// Non-promoting pushes, quiet piece moves and castling.
    pub fn gen_quiet(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let occ = self.occupied();
        let empty = !occ;

        for piece in [
            Piece::King,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
        ] {
            for from in self.pieces_of(piece, us) {
                for to in piece_attacks(piece, from, occ) & empty {
                    list.push(Move::new(from, to, MoveFlag::Normal, piece));
                }
            }
        }

        let pawns = self.pieces_of(Piece::Pawn, us) & !promo_rank(us);
        let pushes = forward(us, pawns) & empty;
        let double_pushes = forward(us, pushes & third_rank(us)) & empty;

        for to in pushes {
            list.push(Move::new(
                backward(us, to, 1),
                to,
                MoveFlag::Normal,
                Piece::Pawn,
            ));
        }
        for to in double_pushes {
            list.push(Move::new(
                backward(us, to, 2),
                to,
                MoveFlag::DoublePush,
                Piece::Pawn,
            ));
        }

        for rule in &CASTLES[us.idx()] {
            if self.can_castle(rule) {
                list.push(Move::new(
                    rule.king_from,
                    rule.king_to,
                    MoveFlag::Castle,
                    Piece::King,
                ));
            }
        }
    }

    /// Right held, path to the rook empty, not in check and no attacked
    /// square strictly between the king's start and destination. The
    /// destination itself is covered by the legality test in `make_move`.
    fn can_castle(&self, rule: &CastleRule) -> bool {
        if self.castling_rights() & rule.right == 0 {
            return false;
        }
        if !(between(rule.king_from, rule.rook_from) & self.occupied()).is_empty() {
            return false;
        }
        if self.is_in_check() {
            return false;
        }
        let them = self.side_to_move().other();
        !between(rule.king_from, rule.king_to).any(|s| self.is_attacked_by(s, them))
    }

    /// Structural check for a move that did not come from this position's
    /// own generator (a hash move). Accepts exactly the moves `gen_noisy`
    /// or `gen_quiet` could produce here, so it is safe to pass the move to
    /// `make_move`.
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let us = self.side_to_move();
        let (from, to) = (mv.from, mv.to);

        if !self.pieces_of(mv.piece, us).contains(from) || self.color_bb(us).contains(to) {
            return false;
        }

        let occ = self.occupied();
        let enemy_on_to = self.color_bb(us.other()).contains(to);

        if mv.is_castle() {
            return mv.piece == Piece::King
                && CASTLES[us.idx()]
                    .iter()
                    .any(|r| r.king_from == from && r.king_to == to && self.can_castle(r));
        }

        if mv.is_en_passant() {
            return mv.piece == Piece::Pawn
                && self.en_passant() == Some(to)
                && pawn_attacks(from, us).contains(to);
        }

        // Ordinary captures must land on an enemy, everything else on an empty square
        if mv.is_capture() != enemy_on_to {
            return false;
        }

        if mv.piece != Piece::Pawn {
            return matches!(mv.flag, MoveFlag::Normal | MoveFlag::Capture)
                && attacks(mv.piece, us, from, occ).contains(to);
        }

        if mv.is_promotion() != promo_rank(us).contains(from) {
            return false;
        }

        match mv.flag {
            MoveFlag::DoublePush => {
                let start = Bitboard::from_square(from);
                let one = forward(us, start) & !occ;
                let two = forward(us, one & third_rank(us)) & !occ;
                two.contains(to)
            }
            MoveFlag::Castle | MoveFlag::EnPassant => false,
            _ if mv.is_capture() => pawn_attacks(from, us).contains(to),
            _ => forward(us, Bitboard::from_square(from)).contains(to),
        }
    }
}

/// All legal moves in `pos`.
pub fn legal_moves(pos: &Position) -> MoveList {
    let mut list = MoveList::new();
    pos.gen_noisy(&mut list);
    pos.gen_quiet(&mut list);
    list.retain(|mv| {
        let mut next = *pos;
        next.make_move(*mv)
    });
    list
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
