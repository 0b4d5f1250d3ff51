use super::*;
use crate::MATE;

const HASH: u64 = 0x1234_5678_9ABC_DEF0;

#[test]
fn test_sizing_from_megabytes() {
    let tt = TranspositionTable::new(1);
    assert_eq!(tt.len(), (1 << 20) / 16 - 2);
    assert_eq!(tt.hashfull(), 0);
}

#[test]
fn test_store_then_probe() {
    let tt = TranspositionTable::new(1);
    tt.store(HASH, 0x0F3C, -57, 12, Bound::Exact, 7, 3);

    let entry = tt.probe(HASH, 3).expect("entry should be found");
    assert_eq!(entry.best_move, 0x0F3C);
    assert_eq!(entry.score, -57);
    assert_eq!(entry.eval, 12);
    assert_eq!(entry.bound, Bound::Exact);
    assert_eq!(entry.depth, 7);
    assert_eq!(entry.age, 0);
}

#[test]
fn test_probe_miss_on_other_hash() {
    let tt = TranspositionTable::new(1);
    tt.store(HASH, 1, 0, 0, Bound::Lower, 3, 0);
    assert!(tt.probe(HASH ^ 1, 0).is_none());
    assert!(tt.probe(!HASH, 0).is_none());
}

#[test]
fn test_empty_slot_is_a_miss() {
    let tt = TranspositionTable::new(1);
    assert!(tt.probe(HASH, 0).is_none());
    // An empty slot has key == data == 0; hash 0 must not decode as an entry
    assert!(tt.probe(0, 0).is_none());
}

#[test]
fn test_mate_scores_rebased_by_ply() {
    let tt = TranspositionTable::new(1);
    // Mate found 5 plies from the root, stored at ply 2
    tt.store(HASH, 0, MATE - 5, 0, Bound::Exact, 4, 2);

    // Same node reached at ply 2 again: unchanged
    assert_eq!(tt.probe(HASH, 2).unwrap().score, MATE - 5);
    // Reached at ply 4 instead: the mate is two plies further from the root
    assert_eq!(tt.probe(HASH, 4).unwrap().score, MATE - 7);

    tt.store(HASH ^ 0xFF, 0, -MATE + 6, 0, Bound::Exact, 4, 1);
    assert_eq!(tt.probe(HASH ^ 0xFF, 3).unwrap().score, -MATE + 8);
}

#[test]
fn test_shallow_bound_does_not_evict_deep_entry() {
    let tt = TranspositionTable::new(1);
    tt.store(HASH, 1, 100, 0, Bound::Lower, 12, 0);

    // Much shallower non-exact result from the same search is dropped
    tt.store(HASH, 2, 50, 0, Bound::Upper, 3, 0);
    let entry = tt.probe(HASH, 0).unwrap();
    assert_eq!(entry.depth, 12);
    assert_eq!(entry.best_move, 1);

    // Within the margin it replaces
    tt.store(HASH, 3, 60, 0, Bound::Upper, 8, 0);
    assert_eq!(tt.probe(HASH, 0).unwrap().depth, 8);
}

#[test]
fn test_exact_and_new_generation_always_replace() {
    let tt = TranspositionTable::new(1);
    tt.store(HASH, 1, 100, 0, Bound::Lower, 20, 0);
    tt.store(HASH, 2, 10, 0, Bound::Exact, 1, 0);
    assert_eq!(tt.probe(HASH, 0).unwrap().best_move, 2);

    tt.store(HASH, 3, 100, 0, Bound::Lower, 20, 0);
    tt.age_up();
    tt.store(HASH, 4, 10, 0, Bound::Upper, 1, 0);
    let entry = tt.probe(HASH, 0).unwrap();
    assert_eq!(entry.best_move, 4);
    assert_eq!(entry.age, 1);
}

#[test]
fn test_age_wraps_at_six_bits() {
    let tt = TranspositionTable::new(1);
    for _ in 0..63 {
        tt.age_up();
    }
    assert_eq!(tt.age(), 63);
    tt.age_up();
    assert_eq!(tt.age(), 0);
}

#[test]
fn test_clear_and_resize_empty_the_table() {
    let mut tt = TranspositionTable::new(1);
    for i in 0..5000u64 {
        tt.store(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), 0, 0, 0, Bound::Exact, 1, 0);
    }
    assert!(tt.hashfull() > 0);

    tt.clear();
    assert_eq!(tt.hashfull(), 0);

    tt.store(HASH, 0, 0, 0, Bound::Exact, 1, 0);
    tt.age_up();
    tt.resize(2);
    assert_eq!(tt.len(), (2 << 20) / 16 - 2);
    assert_eq!(tt.age(), 0);
    assert!(tt.probe(HASH, 0).is_none());
}

#[test]
fn test_torn_slot_reads_as_miss() {
    let tt = TranspositionTable::new(1);
    tt.store(HASH, 5, 5, 5, Bound::Exact, 5, 0);

    // Overwrite only the data half, as a racing writer might
    let slot = &tt.slots[tt.index(HASH)];
    slot.data.fetch_xor(1 << SCORE_SHIFT, Ordering::Relaxed);
    assert!(tt.probe(HASH, 0).is_none());
}

#[test]
fn test_prefetch_is_harmless() {
    let tt = TranspositionTable::new(1);
    tt.prefetch(HASH);
    tt.prefetch(0);
    tt.prefetch(u64::MAX);
}
