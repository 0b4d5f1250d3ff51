use super::*;
use std::thread;

fn flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[test]
fn test_search_limits_depth_only() {
    let limits = SearchLimits::depth(5);
    assert_eq!(limits.depth, 5);
    assert!(limits.hard_time.is_none());
    assert!(limits.soft_time.is_none());
    assert!(limits.nodes.is_none());
}

#[test]
fn test_go_with_clock_uses_moves_to_go_and_increment() {
    let params = GoParams {
        wtime: Some(60_000),
        winc: Some(1_000),
        btime: Some(1),
        ..GoParams::default()
    };
    let limits = SearchLimits::from_go(&params, Color::White, Duration::from_millis(10));
    // 60000 / 20 + 750 - 10
    assert_eq!(limits.hard_time, Some(Duration::from_millis(3_740)));
    assert_eq!(limits.soft_time, Some(Duration::from_millis(2_618)));
}

#[test]
fn test_go_movetime_sets_equal_soft_limit() {
    let params = GoParams {
        movetime: Some(500),
        ..GoParams::default()
    };
    let limits = SearchLimits::from_go(&params, Color::Black, Duration::ZERO);
    assert_eq!(limits.hard_time, Some(Duration::from_millis(500)));
    assert_eq!(limits.soft_time, Some(Duration::from_millis(500)));
}

#[test]
fn test_go_movetime_capped_by_clock() {
    let params = GoParams {
        movetime: Some(10_000),
        btime: Some(2_000),
        movestogo: Some(4),
        ..GoParams::default()
    };
    let limits = SearchLimits::from_go(&params, Color::Black, Duration::ZERO);
    assert_eq!(limits.hard_time, Some(Duration::from_millis(500)));
    assert_eq!(limits.soft_time, Some(Duration::from_millis(350)));
}

#[test]
fn test_go_infinite_and_depth() {
    let params = GoParams {
        wtime: Some(1_000),
        depth: Some(7),
        infinite: true,
        ..GoParams::default()
    };
    let limits = SearchLimits::from_go(&params, Color::White, Duration::ZERO);
    assert_eq!(limits.depth, 7);
    assert!(limits.hard_time.is_none());
}

#[test]
fn test_overhead_never_produces_zero_budget() {
    let params = GoParams {
        wtime: Some(5),
        ..GoParams::default()
    };
    let limits = SearchLimits::from_go(&params, Color::White, Duration::from_millis(50));
    assert_eq!(limits.hard_time, Some(Duration::from_millis(1)));
}

#[test]
fn test_time_control_expiry() {
    let limits = SearchLimits::move_time(Duration::from_millis(10));
    let tc = TimeControl::new(&limits, flag());
    assert!(!tc.is_stopped());

    // Wait for time to expire
    thread::sleep(Duration::from_millis(20));
    tc.check_time();
    assert!(tc.is_stopped());
}

#[test]
fn test_time_control_no_limit() {
    let tc = TimeControl::new(&SearchLimits::infinite(), flag());
    thread::sleep(Duration::from_millis(10));
    tc.check_time();
    assert!(!tc.is_stopped());
    assert!(!tc.soft_limit_reached(Duration::from_secs(3600)));
}

#[test]
fn test_time_control_manual_stop_is_shared() {
    let stopped = flag();
    let tc = TimeControl::new(&SearchLimits::infinite(), stopped.clone());
    let clone = tc.clone();
    assert!(!tc.is_stopped());
    clone.stop();
    assert!(tc.is_stopped());
    assert!(stopped.load(Ordering::SeqCst));
}

#[test]
fn test_soft_limit() {
    let limits = SearchLimits {
        soft_time: Some(Duration::from_millis(100)),
        ..SearchLimits::infinite()
    };
    let tc = TimeControl::new(&limits, flag());
    assert!(!tc.soft_limit_reached(Duration::from_millis(99)));
    assert!(tc.soft_limit_reached(Duration::from_millis(100)));
    let unlimited = TimeControl::new(&SearchLimits::infinite(), flag());
    assert!(!unlimited.soft_limit_reached(Duration::from_secs(3600)));
}
