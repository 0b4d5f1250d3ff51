//! Static exchange evaluation.

use kestrel_core::attacks::{bishop_attacks, rook_attacks};
use kestrel_core::{Bitboard, Move, Piece, Position};

/// Exchange values, indexed by piece. The king is never captured.
pub const SEE_VALUES: [i32; 6] = [100, 300, 300, 450, 850, 0];

#[inline(always)]
fn value(piece: Piece) -> i32 {
    SEE_VALUES[piece.idx()]
}

/// Does `mv` win at least `threshold` once every capture on its target
/// square has been played out, each side always recapturing with its least
/// valuable attacker?
///
/// Castling, promotions and en passant always pass.
pub fn see(pos: &Position, mv: Move, threshold: i32) -> bool {
    if mv.is_castle() || mv.is_promotion() || mv.is_en_passant() {
        return true;
    }

    let to = mv.to;
    let victim = pos.piece_at(to).map_or(0, value);
    let mut attacker = mv.piece;

    // Even a free capture does not reach the threshold
    let mut balance = victim - threshold;
    if balance < 0 {
        return false;
    }

    // Assume the moved piece is lost
    balance -= value(attacker);
    if balance >= 0 {
        return true;
    }

    let mut occ = pos.occupied() & !Bitboard::from_square(mv.from) & !Bitboard::from_square(to);
    let mut attackers = pos.attacks_at(to, occ);

    let diagonal = pos.pieces(Piece::Bishop) | pos.pieces(Piece::Queen);
    let straight = pos.pieces(Piece::Rook) | pos.pieces(Piece::Queen);

    let us = pos.side_to_move();
    let mut side = us.other();

    loop {
        attackers &= occ;

        let ours = attackers & pos.color_bb(side);
        if ours.is_empty() {
            break;
        }

        // Least valuable attacker recaptures
        for piece in Piece::ALL {
            if let Some(from) = (ours & pos.pieces(piece)).lsb() {
                attacker = piece;
                occ.clear(from);
                break;
            }
        }

        // Sliders behind the piece that just moved join in
        if matches!(attacker, Piece::Pawn | Piece::Bishop | Piece::Queen) {
            attackers |= bishop_attacks(to, occ) & diagonal;
        }
        if matches!(attacker, Piece::Rook | Piece::Queen) {
            attackers |= rook_attacks(to, occ) & straight;
        }

        // Negamax the balance
        balance = -balance - 1 - value(attacker);
        side = side.other();

        if balance >= 0 {
            // A king may only take last: if the other side can still
            // recapture, the king capture was illegal
            if attacker == Piece::King && !(attackers & occ & pos.color_bb(side)).is_empty() {
                side = side.other();
            }
            break;
        }
    }

    side != us
}

#[cfg(test)]
#[path = "see_tests.rs"]
mod see_tests;
