//! Random playouts checking the incremental state against from-scratch
//! recomputation after every move.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kestrel_core::{
    Bitboard, Color, MoveList, Piece, Position, legal_moves, move_to_uci, parse_uci_move,
};

const GAMES: usize = 40;
const MAX_PLIES: usize = 160;

const OPENINGS: [&str; 3] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

fn assert_consistent(pos: &Position) {
    assert_eq!(pos.hash(), pos.compute_hash(), "hash drift in {}", pos.to_fen());
    assert_eq!(
        [*pos.accumulator(Color::White), *pos.accumulator(Color::Black)],
        pos.compute_accumulators(),
        "accumulator drift in {}",
        pos.to_fen()
    );

    let white = pos.color_bb(Color::White);
    let black = pos.color_bb(Color::Black);
    assert!((white & black).is_empty());

    let mut union = Bitboard::EMPTY;
    for piece in Piece::ALL {
        union |= pos.pieces(piece);
    }
    assert_eq!(union, pos.occupied());

    for color in Color::ALL {
        assert_eq!(pos.pieces_of(Piece::King, color).popcount(), 1);
    }
}

#[test]
fn random_playouts_keep_incremental_state_exact() {
    kestrel_core::init();
    let mut rng = StdRng::seed_from_u64(0x5EED_CAFE);

    for game in 0..GAMES {
        let mut pos = Position::from_fen(OPENINGS[game % OPENINGS.len()]).unwrap();

        for _ in 0..MAX_PLIES {
            assert_consistent(&pos);

            let mut pseudo = MoveList::new();
            pos.gen_noisy(&mut pseudo);
            pos.gen_quiet(&mut pseudo);

            let mover = pos.side_to_move();
            let mut legal = Vec::new();
            for mv in pseudo {
                let mut next = pos;
                if next.make_move(mv) {
                    // The mover's king is never left attacked
                    assert!(!next.is_attacked_by(next.king_sq(mover), mover.other()));
                    assert_consistent(&next);
                    legal.push(mv);
                }
            }

            let reference = legal_moves(&pos);
            assert_eq!(legal.len(), reference.len());

            if legal.is_empty() || pos.is_draw() {
                break;
            }

            let mv = legal[rng.gen_range(0..legal.len())];
            assert_eq!(parse_uci_move(&pos, &move_to_uci(mv)), Ok(mv));
            assert!(pos.make_move(mv));
        }
    }
}

#[test]
fn copies_are_independent() {
    let root = Position::startpos();
    let mut child = root;
    let mv = parse_uci_move(&child, "e2e4").unwrap();
    assert!(child.make_move(mv));
    assert_ne!(root.hash(), child.hash());
    assert_eq!(root.to_fen(), Position::startpos().to_fen());
}
