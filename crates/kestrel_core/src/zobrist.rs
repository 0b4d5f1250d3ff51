//! Zobrist hashing for chess positions.
//!
//! Zobrist hashing enables incremental hash updates during make-move,
//! reducing hash computation from O(64) to O(1) per move. This is critical
//! for efficient repetition detection and the transposition table.
//!
//! The hash is computed by XOR-ing together random values for:
//! - Each piece on each square (2 colors × 6 pieces × 64 squares)
//! - Side to move (XOR when black is to move)
//! - Castling rights (one value per 4-bit rights combination)
//! - En passant file (8 values)

use crate::types::{Color, Piece, Square, file_of};

/// Pre-computed random values for Zobrist hashing.
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Indexed by [color][piece][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// Indexed directly by the castling rights byte (0..16).
    pub castling: [u64; 16],
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Generate Zobrist keys using a simple PRNG with fixed seed.
    /// Uses xorshift64 for fast, reproducible random numbers.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x123456789ABCDEF0u64; // Fixed seed

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        // No rights hashes to zero so that a fresh position needs no key.
        let mut castling = [0u64; 16];
        let mut i = 1;
        while i < 16 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.idx()][piece.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn castling_key(&self, rights: u8) -> u64 {
        self.castling[(rights & 15) as usize]
    }

    /// Key for an en passant target square; only the file is hashed.
    #[inline(always)]
    pub fn ep_key(&self, sq: Square) -> u64 {
        self.en_passant[file_of(sq) as usize]
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
