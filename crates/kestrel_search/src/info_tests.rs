use super::*;
use kestrel_core::{parse_uci_move, Position};

fn info(score: i32) -> SearchInfo {
    SearchInfo {
        depth: 7,
        seldepth: 11,
        multipv: 1,
        score,
        nodes: 50_000,
        time: Duration::from_millis(250),
        hashfull: 12,
        pv: Vec::new(),
    }
}

#[test]
fn test_centipawn_line() {
    let pos = Position::startpos();
    let mut line = info(34);
    line.pv = vec![
        parse_uci_move(&pos, "e2e4").unwrap(),
        parse_uci_move(&pos, "d2d4").unwrap(),
    ];
    assert_eq!(
        line.to_string(),
        "info score cp 34 multipv 1 seldepth 11 depth 7 nodes 50000 time 250 nps 200000 hashfull 12 pv e2e4 d2d4"
    );
}

#[test]
fn test_mate_scores_in_moves() {
    // Mate delivered on ply 1, 3 and 5
    assert_eq!(info(MATE - 1).mate_in(), Some(1));
    assert_eq!(info(MATE - 3).mate_in(), Some(2));
    assert_eq!(info(MATE - 5).mate_in(), Some(3));
    // Getting mated on ply 2 and 4
    assert_eq!(info(-MATE + 2).mate_in(), Some(-1));
    assert_eq!(info(-MATE + 4).mate_in(), Some(-2));
    assert_eq!(info(500).mate_in(), None);

    assert!(info(MATE - 3).to_string().starts_with("info score mate 2 multipv 1"));
    assert!(info(-MATE + 4).to_string().starts_with("info score mate -2 "));
}

#[test]
fn test_nps_without_elapsed_time() {
    let mut line = info(0);
    line.time = Duration::ZERO;
    assert_eq!(line.nps(), 0);
}

#[test]
fn test_bestmove_line() {
    let pos = Position::startpos();
    let mv = parse_uci_move(&pos, "g1f3").unwrap();
    assert_eq!(SearchEvent::BestMove(mv).to_string(), "bestmove g1f3");
    assert_eq!(SearchEvent::BestMove(Move::NULL).to_string(), "bestmove 0000");
}
