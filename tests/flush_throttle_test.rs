use tile_view::term::FlushThrottle;

#[test]
fn flush_throttle_flushes_first_frame() {
    let mut t = FlushThrottle::new(250);
    assert!(t.should_flush(0, 1, false));
}

#[test]
fn flush_throttle_static_flushes_on_change() {
    let mut t = FlushThrottle::new(250);
    assert!(t.should_flush(0, 1, false));
    assert!(t.should_flush(1, 2, false));
}

#[test]
fn flush_throttle_static_throttles_when_unchanged() {
    let mut t = FlushThrottle::new(250);
    assert!(t.should_flush(0, 1, false));
    assert!(!t.should_flush(10, 1, false));
    assert!(!t.should_flush(249, 1, false));
    assert!(t.should_flush(250, 1, false));
}

#[test]
fn flush_throttle_animating_always_flushes() {
    let mut t = FlushThrottle::new(250);
    assert!(t.should_flush(0, 1, true));
    assert!(t.should_flush(1, 1, true));
    assert!(t.should_flush(2, 1, true));
}

#[test]
fn flush_throttle_interval_restarts_after_animation() {
    let mut t = FlushThrottle::new(250);
    assert!(t.should_flush(0, 1, true));
    assert!(t.should_flush(100, 2, true));
    assert!(t.should_flush(116, 3, false));
    assert!(!t.should_flush(200, 3, false));
    assert!(t.should_flush(366, 3, false));
}
