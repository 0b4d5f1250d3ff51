use super::*;
use crate::types::coord_to_sq;

fn s(c: &str) -> Square {
    coord_to_sq(c).unwrap()
}

#[test]
fn test_pack_layout() {
    let mv = Move::new(s("e2"), s("e4"), MoveFlag::DoublePush, Piece::Pawn);
    assert_eq!(mv.pack(), 52 | (36 << 6) | (1 << 12));
}

#[test]
fn test_unpack_derives_piece_from_position() {
    let pos = Position::startpos();
    let mv = Move::new(s("g1"), s("f3"), MoveFlag::Normal, Piece::Knight);
    let back = Move::unpack(mv.pack(), &pos);
    assert_eq!(back, mv);
    assert_eq!(back.piece, Piece::Knight);
    assert_eq!(back.flag, MoveFlag::Normal);
}

#[test]
fn test_flag_predicates() {
    let mv = Move::new(s("b7"), s("a8"), MoveFlag::QueenPromoCapture, Piece::Pawn);
    assert!(mv.is_capture());
    assert!(mv.is_promotion());
    assert!(!mv.is_quiet());
    assert_eq!(mv.promotion_piece(), Some(Piece::Queen));

    let mv = Move::new(s("b7"), s("b8"), MoveFlag::KnightPromo, Piece::Pawn);
    assert!(!mv.is_capture());
    assert_eq!(mv.promotion_piece(), Some(Piece::Knight));

    let mv = Move::new(s("e5"), s("d6"), MoveFlag::EnPassant, Piece::Pawn);
    assert!(mv.is_capture() && mv.is_en_passant());
    assert_eq!(mv.promotion_piece(), None);

    let mv = Move::new(s("e1"), s("g1"), MoveFlag::Castle, Piece::King);
    assert!(mv.is_castle() && mv.is_quiet());
}

#[test]
fn test_promotion_flag_builder() {
    assert_eq!(
        MoveFlag::promotion(Piece::Rook, true),
        MoveFlag::RookPromoCapture
    );
    assert_eq!(MoveFlag::promotion(Piece::Bishop, false), MoveFlag::BishopPromo);
    assert_eq!(MoveFlag::from_bits(3), MoveFlag::Normal);
}

#[test]
fn test_equality_ignores_score_and_piece() {
    let mut a = Move::new(10, 18, MoveFlag::Normal, Piece::Pawn);
    let b = Move::new(10, 18, MoveFlag::Normal, Piece::Queen);
    a.score = 1234;
    assert_eq!(a, b);
    assert_ne!(a, Move::new(10, 18, MoveFlag::Capture, Piece::Pawn));
}

#[test]
fn test_display() {
    let mv = Move::new(s("e7"), s("e8"), MoveFlag::QueenPromo, Piece::Pawn);
    assert_eq!(mv.to_string(), "e7e8q");
    assert_eq!(Move::NULL.to_string(), "0000");
    assert!(Move::default().is_null());
}
