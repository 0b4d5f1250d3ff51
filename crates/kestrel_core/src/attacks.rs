//! Pre-computed attack tables for fast move generation and attack detection.
//!
//! This module contains:
//! - Knight attack tables (constant)
//! - King attack tables (constant)
//! - Pawn attack tables (constant, per color)
//! - Magic-indexed bishop and rook tables, built once by [`init`]
//! - The "between" table for aligned square pairs

use std::sync::OnceLock;
use std::time::Instant;

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::magic::{self, BISHOP_DIRS, BISHOP_STRIDE, Magic, ROOK_DIRS, ROOK_STRIDE};
use crate::types::{Color, Piece, Square, file_of, rank_of};

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        // Knight moves: all 8 L-shaped jumps with proper masking
        let mut result = 0u64;

        result |= (bb.0 << 17) & Bitboard::NOT_FILE_A.0;
        result |= (bb.0 << 15) & Bitboard::NOT_FILE_H.0;
        result |= (bb.0 << 10) & Bitboard::NOT_FILE_AB.0;
        result |= (bb.0 << 6) & Bitboard::NOT_FILE_GH.0;
        result |= (bb.0 >> 6) & Bitboard::NOT_FILE_AB.0;
        result |= (bb.0 >> 10) & Bitboard::NOT_FILE_GH.0;
        result |= (bb.0 >> 15) & Bitboard::NOT_FILE_A.0;
        result |= (bb.0 >> 17) & Bitboard::NOT_FILE_H.0;

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        let mut result = 0u64;

        // All 8 directions
        result |= bb.0 >> 8; // North
        result |= bb.0 << 8; // South
        result |= (bb.0 << 1) & Bitboard::NOT_FILE_A.0; // East
        result |= (bb.0 >> 1) & Bitboard::NOT_FILE_H.0; // West
        result |= (bb.0 >> 7) & Bitboard::NOT_FILE_A.0; // North-East
        result |= (bb.0 >> 9) & Bitboard::NOT_FILE_H.0; // North-West
        result |= (bb.0 << 9) & Bitboard::NOT_FILE_A.0; // South-East
        result |= (bb.0 << 7) & Bitboard::NOT_FILE_H.0; // South-West

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pre-computed pawn attacks, indexed by `[color][square]`.
/// White pawns capture toward rank 8, black pawns toward rank 1.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        attacks[0][sq as usize] = Bitboard(
            ((bb.0 >> 7) & Bitboard::NOT_FILE_A.0) | ((bb.0 >> 9) & Bitboard::NOT_FILE_H.0),
        );
        attacks[1][sq as usize] = Bitboard(
            ((bb.0 << 9) & Bitboard::NOT_FILE_A.0) | ((bb.0 << 7) & Bitboard::NOT_FILE_H.0),
        );
        sq += 1;
    }
    attacks
};

/// Runtime-built sliding and between tables. Read-only once constructed.
pub struct AttackTables {
    bishop_magics: [Magic; 64],
    rook_magics: [Magic; 64],
    bishop_table: Vec<Bitboard>,
    rook_table: Vec<Bitboard>,
    between: Vec<Bitboard>,
}

const MAGIC_SEED: u64 = 0x2545_F491_4F6C_DD1D;

impl AttackTables {
    fn build() -> Self {
        let start = Instant::now();

        let mut bishop_table = vec![Bitboard::EMPTY; 64 * BISHOP_STRIDE];
        let mut rook_table = vec![Bitboard::EMPTY; 64 * ROOK_STRIDE];
        let mut bishop_magics = [Magic::default(); 64];
        let mut rook_magics = [Magic::default(); 64];

        for sq in 0..64u8 {
            let s = sq as usize;
            bishop_magics[s] = magic::find_magic(
                sq,
                &BISHOP_DIRS,
                &mut bishop_table[s * BISHOP_STRIDE..(s + 1) * BISHOP_STRIDE],
                MAGIC_SEED,
            );
            rook_magics[s] = magic::find_magic(
                sq,
                &ROOK_DIRS,
                &mut rook_table[s * ROOK_STRIDE..(s + 1) * ROOK_STRIDE],
                MAGIC_SEED.rotate_left(17),
            );
        }

        let mut tables = AttackTables {
            bishop_magics,
            rook_magics,
            bishop_table,
            rook_table,
            between: vec![Bitboard::EMPTY; 64 * 64],
        };
        tables.fill_between();

        debug!(elapsed = ?start.elapsed(), "attack tables built");
        tables
    }

    fn fill_between(&mut self) {
        for a in 0..64u8 {
            for b in 0..64u8 {
                if a == b {
                    continue;
                }
                let pair = Bitboard::from_square(a) | Bitboard::from_square(b);
                let (fa, ra) = (file_of(a), rank_of(a));
                let (fb, rb) = (file_of(b), rank_of(b));

                let squares = if fa == fb || ra == rb {
                    self.rook(a, pair) & self.rook(b, pair)
                } else if fa - ra == fb - rb || fa + ra == fb + rb {
                    self.bishop(a, pair) & self.bishop(b, pair)
                } else {
                    Bitboard::EMPTY
                };
                self.between[a as usize * 64 + b as usize] = squares;
            }
        }
    }

    #[inline(always)]
    fn bishop(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let s = sq as usize;
        self.bishop_table[s * BISHOP_STRIDE + self.bishop_magics[s].index(occ)]
    }

    #[inline(always)]
    fn rook(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let s = sq as usize;
        self.rook_table[s * ROOK_STRIDE + self.rook_magics[s].index(occ)]
    }
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Build the sliding attack tables. Cheap to call again; only the first
/// call does any work. Call before spawning search threads.
pub fn init() {
    tables();
}

#[inline(always)]
fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::build)
}

/// Get pawn attacks for a given color and square.
#[inline(always)]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

/// Get knight attacks for a given square.
#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

/// Get king attacks for a given square.
#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Bishop attacks given a square and occupied squares.
#[inline(always)]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop(sq, occupied)
}

/// Rook attacks given a square and occupied squares.
#[inline(always)]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook(sq, occupied)
}

/// Queen attacks (union of bishop and rook attacks).
#[inline(always)]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let t = tables();
    t.bishop(sq, occupied) | t.rook(sq, occupied)
}

/// Squares strictly between two squares on a shared rank, file or diagonal.
/// Empty when the squares are not aligned.
#[inline(always)]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between[a as usize * 64 + b as usize]
}

/// Attack set of `piece` standing on `sq`. `color` only matters for pawns.
#[inline]
pub fn attacks(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
