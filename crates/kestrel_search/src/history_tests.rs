use super::*;
use kestrel_core::{MoveFlag, Piece};

fn quiet(from: u8, to: u8) -> Move {
    Move::new(from, to, MoveFlag::Normal, Piece::Knight)
}

#[test]
fn test_cutoff_raises_history_for_side() {
    let mut history = HistoryTable::new();
    let mv = quiet(62, 45);
    history.update_quiet(Color::White, mv, 4, 0);

    assert_eq!(history.score(Color::White, mv), 16);
    assert_eq!(history.score(Color::Black, mv), 0);
    assert_eq!(history.score(Color::White, quiet(57, 42)), 0);
}

#[test]
fn test_gravity_keeps_scores_bounded() {
    let mut history = HistoryTable::new();
    let mv = quiet(62, 45);
    let mut last = 0;
    for _ in 0..10_000 {
        history.update_quiet(Color::White, mv, 40, 3);
        let now = history.score(Color::White, mv);
        assert!(now >= last);
        assert!(now <= HISTORY_MAX);
        last = now;
    }
    assert!(last > HISTORY_MAX / 2);
}

#[test]
fn test_killer_per_ply() {
    let mut history = HistoryTable::new();
    let a = quiet(62, 45);
    let b = quiet(57, 42);

    history.update_quiet(Color::White, a, 3, 5);
    assert_eq!(history.killer(5), a);
    assert!(history.killer(4).is_null());

    history.update_quiet(Color::White, b, 3, 5);
    assert_eq!(history.killer(5), b);

    // Out of range plies are ignored rather than panicking
    history.update_quiet(Color::White, a, 3, MAX_PLY + 10);
    assert!(history.killer(MAX_PLY + 10).is_null());
}

#[test]
fn test_soft_reset_halves_and_drops_killers() {
    let mut history = HistoryTable::new();
    let mv = quiet(62, 45);
    history.update_quiet(Color::Black, mv, 10, 1);
    let before = history.score(Color::Black, mv);

    history.soft_reset();
    assert_eq!(history.score(Color::Black, mv), before / 2);
    assert!(history.killer(1).is_null());

    history.clear();
    assert_eq!(history.score(Color::Black, mv), 0);
}
