use crate::{board::Position, moves::Move, moves::MoveList};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    pos.gen_noisy(&mut list);
    pos.gen_quiet(&mut list);

    let mut nodes = 0u64;
    for mv in list {
        let mut next = *pos;
        if !next.make_move(mv) {
            continue;
        }
        // Bulk count at the last ply
        nodes += if depth == 1 { 1 } else { perft(&next, depth - 1) };
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(pos: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut list = MoveList::new();
    pos.gen_noisy(&mut list);
    pos.gen_quiet(&mut list);

    list.into_iter()
        .filter_map(|mv| {
            let mut next = *pos;
            next.make_move(mv)
                .then(|| (mv, perft(&next, depth - 1)))
        })
        .collect()
}
