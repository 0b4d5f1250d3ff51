//! Late move reduction table.

use std::sync::OnceLock;

const SIZE: usize = 64;

static TABLE: OnceLock<[[i32; SIZE]; SIZE]> = OnceLock::new();

fn build() -> [[i32; SIZE]; SIZE] {
    let mut table = [[0; SIZE]; SIZE];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (moves, r) in row.iter_mut().enumerate().skip(1) {
            *r = (0.3 * (depth as f64).ln() * (moves as f64).ln() + 0.8) as i32;
        }
    }
    table
}

/// Base reduction for the `moves_made`-th move at `depth`.
#[inline]
pub fn reduction(depth: i32, moves_made: usize) -> i32 {
    let d = depth.clamp(0, SIZE as i32 - 1) as usize;
    let m = moves_made.min(SIZE - 1);
    TABLE.get_or_init(build)[d][m]
}
