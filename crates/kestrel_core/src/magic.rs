//! Magic-number indexing for sliding piece attacks.
//!
//! For every square the relevant blocker mask is multiplied by a magic
//! constant and shifted down, giving a collision-free index into a dense
//! per-square table of attack sets. The constants are found once at startup
//! by a seeded trial search, so the tables are identical on every run.

use crate::bitboard::Bitboard;
use crate::types::{Square, file_of, rank_of, sq};

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Entries per square in the rook table (at most 12 relevant blockers).
pub const ROOK_STRIDE: usize = 4096;
/// Entries per square in the bishop table (at most 9 relevant blockers).
pub const BISHOP_STRIDE: usize = 512;

#[derive(Clone, Copy, Debug, Default)]
pub struct Magic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u8,
}

impl Magic {
    #[inline(always)]
    pub fn index(&self, occ: Bitboard) -> usize {
        ((occ.0 & self.mask.0).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Walk each direction from `from` until the board edge or a blocker
/// (the blocker itself is included).
pub fn ray_attacks(from: Square, occ: Bitboard, dirs: &[(i8, i8); 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in dirs {
        let mut f = file_of(from) + df;
        let mut r = rank_of(from) + dr;
        while let Some(to) = sq(f, r) {
            attacks.set(to);
            if occ.contains(to) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

/// Squares whose occupancy can change the attack set: every ray square
/// except the last one before the edge.
pub fn relevant_mask(from: Square, dirs: &[(i8, i8); 4]) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(df, dr) in dirs {
        let mut f = file_of(from) + df;
        let mut r = rank_of(from) + dr;
        while let Some(to) = sq(f, r) {
            if sq(f + df, r + dr).is_none() {
                break;
            }
            mask.set(to);
            f += df;
            r += dr;
        }
    }
    mask
}

/// Small xorshift generator, same family as the Zobrist key generator.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Candidates with few set bits make good magics.
    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

/// Find a magic for `from` and fill `table` (one square's slice) with the
/// attack set for every blocker subset.
pub fn find_magic(
    from: Square,
    dirs: &[(i8, i8); 4],
    table: &mut [Bitboard],
    seed: u64,
) -> Magic {
    let mask = relevant_mask(from, dirs);
    let bits = mask.popcount();
    let shift = (64 - bits) as u8;

    let occupancies: Vec<Bitboard> = mask.subsets().collect();
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| ray_attacks(from, occ, dirs))
        .collect();

    let size = 1usize << bits;
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;
    let mut rng = Xorshift(seed ^ (from as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));

    loop {
        let candidate = rng.sparse();
        // Cheap rejection: the top byte of mask * magic must be well populated
        if (mask.0.wrapping_mul(candidate) >> 56).count_ones() < 6 {
            continue;
        }

        attempt += 1;
        let magic = Magic {
            mask,
            magic: candidate,
            shift,
        };

        let mut ok = true;
        for (occ, attacks) in occupancies.iter().zip(reference.iter()) {
            let idx = magic.index(*occ);
            if epoch[idx] < attempt {
                epoch[idx] = attempt;
                table[idx] = *attacks;
            } else if table[idx] != *attacks {
                ok = false;
                break;
            }
        }

        if ok {
            return magic;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask_excludes_edges() {
        // a8 rook: b8..g8 and a7..a2
        let mask = relevant_mask(0, &ROOK_DIRS);
        assert_eq!(mask.popcount(), 12);
        assert!(!mask.contains(7)); // h8
        assert!(!mask.contains(56)); // a1
    }

    #[test]
    fn bishop_mask_center_square() {
        // e4 = 36
        let mask = relevant_mask(36, &BISHOP_DIRS);
        assert_eq!(mask.popcount(), 9);
    }

    #[test]
    fn ray_attacks_stop_at_blocker() {
        // Rook on a1 (56), blocker on a4 (32)
        let attacks = ray_attacks(56, Bitboard::from_square(32), &ROOK_DIRS);
        assert!(attacks.contains(48)); // a2
        assert!(attacks.contains(32)); // a4
        assert!(!attacks.contains(24)); // a5
        assert!(attacks.contains(63)); // h1
    }

    #[test]
    fn find_magic_every_square_and_seed() {
        // High squares and seeds push the seed mixing past u64::MAX
        for seed in [0, 0x2545_F491_4F6C_DD1D, u64::MAX] {
            for from in 0..64u8 {
                let mut table = vec![Bitboard::EMPTY; BISHOP_STRIDE];
                let magic = find_magic(from, &BISHOP_DIRS, &mut table, seed);
                for occ in magic.mask.subsets() {
                    assert_eq!(
                        table[magic.index(occ)],
                        ray_attacks(from, occ, &BISHOP_DIRS)
                    );
                }
            }
        }

        let mut table = vec![Bitboard::EMPTY; ROOK_STRIDE];
        let magic = find_magic(63, &ROOK_DIRS, &mut table, u64::MAX);
        for occ in magic.mask.subsets() {
            assert_eq!(table[magic.index(occ)], ray_attacks(63, occ, &ROOK_DIRS));
        }
    }
}
