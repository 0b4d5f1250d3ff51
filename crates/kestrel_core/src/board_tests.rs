use super::*;
use crate::moves::MoveFlag;
use crate::uci::parse_uci_move;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn s(c: &str) -> Square {
    coord_to_sq(c).unwrap()
}

fn play(pos: &mut Position, moves: &[&str]) {
    for txt in moves {
        let mv = parse_uci_move(pos, txt).unwrap();
        assert!(pos.make_move(mv), "{txt} should be legal");
    }
}

// =============================================================================
// FEN
// =============================================================================

#[test]
fn test_fen_round_trip() {
    assert_eq!(Position::startpos().to_fen(), STARTPOS_FEN);
    assert_eq!(Position::from_fen(KIWIPETE).unwrap().to_fen(), KIWIPETE);

    let with_ep = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
    assert_eq!(Position::from_fen(with_ep).unwrap().to_fen(), with_ep);
}

#[test]
fn test_fen_clocks_are_optional() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
    assert_eq!(pos.side_to_move(), Color::Black);
}

#[test]
fn test_fen_errors() {
    assert_eq!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - -").unwrap_err(),
        FenError::MissingKing
    );
    assert_eq!(
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq -").unwrap_err(),
        FenError::RankCount(7)
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4X3 w - -").unwrap_err(),
        FenError::BadPiece('X')
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - -").unwrap_err(),
        FenError::BadRankWidth(1)
    );
    assert!(matches!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
        Err(FenError::BadSide(_))
    ));
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w Z -").unwrap_err(),
        FenError::BadCastling('Z')
    );
    assert!(matches!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4"),
        Err(FenError::BadEnPassant(_))
    ));
    assert!(matches!(
        Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
        Err(FenError::BadClock(_))
    ));
    assert_eq!(
        Position::from_fen("only three fields").unwrap_err(),
        FenError::FieldCount(3)
    );
}

#[test]
fn test_fen_rejects_capturable_king() {
    assert_eq!(
        Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
        FenError::OpponentInCheck
    );
    assert_eq!(
        Position::from_fen("4k3/8/8/8/8/8/3p4/4K3 b - - 0 1").unwrap_err(),
        FenError::OpponentInCheck
    );
    // The same placements are fine with the checked side to move
    assert!(Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1").unwrap().is_in_check());
    assert!(Position::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap().is_in_check());
}

#[test]
fn test_castling_rights_follow_piece_placement() {
    // No rook on h1, so K is dropped
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1").unwrap();
    assert_eq!(
        pos.castling_rights(),
        WHITE_QUEEN_SIDE | BLACK_KING_SIDE | BLACK_QUEEN_SIDE
    );
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_piece_and_color_lookup() {
    let pos = Position::startpos();
    assert_eq!(pos.piece_at(s("e1")), Some(Piece::King));
    assert_eq!(pos.color_at(s("e1")), Some(Color::White));
    assert_eq!(pos.piece_at(s("d8")), Some(Piece::Queen));
    assert_eq!(pos.color_at(s("d8")), Some(Color::Black));
    assert_eq!(pos.piece_at(s("e4")), None);
    assert_eq!(pos.king_sq(Color::Black), s("e8"));
    assert_eq!(pos.occupied().popcount(), 32);
}

#[test]
fn test_attacks_at_reports_both_colors() {
    let pos = Position::startpos();
    // f3 is covered by the g1 knight and the e2 and g2 pawns
    let attackers = pos.attacks_at(s("f3"), pos.occupied());
    assert_eq!(attackers.popcount(), 3);
    assert!(attackers.contains(s("g1")));
    assert!(pos.is_attacked_by(s("f3"), Color::White));
    assert!(!pos.is_attacked_by(s("f3"), Color::Black));
}

#[test]
fn test_is_in_check() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
    assert!(pos.is_in_check());
    assert!(!Position::startpos().is_in_check());
}

// =============================================================================
// Make move
// =============================================================================

#[test]
fn test_double_push_sets_en_passant() {
    let mut pos = Position::from_fen("4k3/6p1/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
    let mv = Move::new(s("e2"), s("e4"), MoveFlag::DoublePush, Piece::Pawn);
    assert!(pos.make_move(mv));
    assert_eq!(pos.en_passant(), Some(s("e3")));
    assert_eq!(pos.side_to_move(), Color::Black);
    assert_eq!(pos.piece_at(s("e4")), Some(Piece::Pawn));
    assert_eq!(pos.piece_at(s("e2")), None);
    assert_eq!(pos.hash(), pos.compute_hash());

    // Any reply clears it again
    play(&mut pos, &["g7g6"]);
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_double_push_without_capturer_has_no_en_passant() {
    let mut pos = Position::startpos();
    play(&mut pos, &["e2e4"]);
    assert_eq!(pos.en_passant(), None);
    assert_eq!(
        pos.hash(),
        Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .unwrap()
            .hash()
    );

    // A pawn on the same rank but not adjacent cannot take
    let mut pos = Position::from_fen("4k3/8/8/8/7p/8/4P3/4K3 w - - 0 1").unwrap();
    play(&mut pos, &["e2e4"]);
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_fen_drops_uncapturable_en_passant() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
    let pos = Position::from_fen(fen).unwrap();
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.hash(), pos.compute_hash());
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let mv = Move::new(s("e5"), s("d6"), MoveFlag::EnPassant, Piece::Pawn);
    assert!(pos.make_move(mv));
    assert_eq!(pos.piece_at(s("d5")), None);
    assert_eq!(pos.piece_at(s("d6")), Some(Piece::Pawn));
    assert_eq!(pos.color_bb(Color::Black).popcount(), 1);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = Move::new(s("e1"), s("g1"), MoveFlag::Castle, Piece::King);
    assert!(pos.make_move(mv));
    assert_eq!(pos.piece_at(s("f1")), Some(Piece::Rook));
    assert_eq!(pos.piece_at(s("h1")), None);
    assert_eq!(pos.castling_rights(), BLACK_KING_SIDE | BLACK_QUEEN_SIDE);

    let mv = Move::new(s("e8"), s("c8"), MoveFlag::Castle, Piece::King);
    assert!(pos.make_move(mv));
    assert_eq!(pos.piece_at(s("d8")), Some(Piece::Rook));
    assert_eq!(pos.piece_at(s("a8")), None);
    assert_eq!(pos.castling_rights(), 0);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_capturing_rook_clears_its_right() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut pos, &["a1a8"]);
    assert_eq!(pos.castling_rights(), WHITE_KING_SIDE | BLACK_KING_SIDE);
    assert_eq!(pos.halfmove_clock(), 0);
}

#[test]
fn test_promotion_places_new_piece() {
    let mut pos = Position::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    play(&mut pos, &["a7b8n"]);
    assert_eq!(pos.piece_at(s("b8")), Some(Piece::Knight));
    assert!(pos.pieces(Piece::Pawn).is_empty());
    assert!(pos.pieces(Piece::Rook).is_empty());
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_move_into_check_is_rejected() {
    // Bishop on e2 is pinned by the rook on e7
    let mut pos = Position::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    let mv = Move::new(s("e2"), s("d3"), MoveFlag::Normal, Piece::Bishop);
    assert!(!pos.make_move(mv));
}

#[test]
fn test_null_move() {
    let mut pos = Position::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
    assert_eq!(pos.en_passant(), Some(s("e3")));
    let before = pos.hash();
    pos.make_null_move();
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.en_passant(), None);
    assert_ne!(pos.hash(), before);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_en_passant_dropped_without_pushed_pawn() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3 0 1").unwrap();
    assert_eq!(pos.en_passant(), None);
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_accumulators_track_moves() {
    let mut pos = Position::from_fen(KIWIPETE).unwrap();
    play(&mut pos, &["e2a6", "b4c3", "e1g1", "h3g2", "d5e6"]);
    assert_eq!(
        [*pos.accumulator(Color::White), *pos.accumulator(Color::Black)],
        pos.compute_accumulators()
    );
}

// =============================================================================
// Draws
// =============================================================================

#[test]
fn test_repetition_is_draw() {
    let mut pos = Position::startpos();
    assert!(!pos.is_draw());
    play(&mut pos, &["g1f3", "g8f6", "f3g1"]);
    assert!(!pos.is_draw());
    play(&mut pos, &["f6g8"]);
    assert!(pos.is_draw());
}

#[test]
fn test_repetition_window_resets_on_pawn_move() {
    let mut pos = Position::startpos();
    play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(pos.is_draw());
    play(&mut pos, &["e2e4"]);
    assert!(!pos.is_draw());
    play(&mut pos, &["g8f6", "g1f3", "f6g8"]);
    assert!(!pos.is_draw());
    play(&mut pos, &["f3g1"]);
    assert!(pos.is_draw());
}

#[test]
fn test_clocks_saturate() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 65535 65535").unwrap();
    play(&mut pos, &["e8d8"]);
    assert_eq!(pos.halfmove_clock(), u16::MAX);
    assert_eq!(pos.fullmove_number(), u16::MAX);
    pos.make_null_move();
    assert_eq!(pos.halfmove_clock(), u16::MAX);
    assert!(pos.is_draw());
}

#[test]
fn test_fifty_move_rule() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 100 80").unwrap();
    assert!(pos.is_draw());
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 99 80").unwrap();
    assert!(!pos.is_draw());
}

#[test]
fn test_display_shows_fen() {
    let text = Position::startpos().to_string();
    assert!(text.contains(&format!("Fen: {STARTPOS_FEN}")));
    assert!(text.contains("| R | N | B | Q | K | B | N | R | 1"));
}
