/// Decides when a rendered frame is worth flushing to the terminal.
#[derive(Debug, Clone)]
pub struct FlushThrottle {
    min_static_interval_ms: u64,
    last_flush_ms: u64,
    last_fingerprint: u64,
    has_flushed: bool,
}

impl FlushThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_flush_ms: 0,
            last_fingerprint: 0,
            has_flushed: false,
        }
    }

    /// Forget the last flush so the next call returns `true`.
    pub fn reset(&mut self) {
        self.has_flushed = false;
    }

    /// - First call, or while animations run: always flush.
    /// - Static scene: flush on fingerprint change, otherwise at most once per
    ///   `min_static_interval_ms`.
    pub fn should_flush(&mut self, now_ms: u64, fingerprint: u64, animating: bool) -> bool {
        let changed = fingerprint != self.last_fingerprint;
        let due = now_ms.saturating_sub(self.last_flush_ms) >= self.min_static_interval_ms;
        if self.has_flushed && !animating && !changed && !due {
            return false;
        }
        self.has_flushed = true;
        self.last_flush_ms = now_ms;
        self.last_fingerprint = fingerprint;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_scene_flushes_on_interval() {
        let mut t = FlushThrottle::new(250);
        assert!(t.should_flush(0, 1, false));
        assert!(!t.should_flush(16, 1, false));
        assert!(!t.should_flush(249, 1, false));
        assert!(t.should_flush(250, 1, false));
    }

    #[test]
    fn fingerprint_change_flushes_immediately() {
        let mut t = FlushThrottle::new(250);
        assert!(t.should_flush(0, 1, false));
        assert!(t.should_flush(16, 2, false));
        assert!(!t.should_flush(32, 2, false));
    }

    #[test]
    fn animation_always_flushes() {
        let mut t = FlushThrottle::new(250);
        for ms in (0..200).step_by(16) {
            assert!(t.should_flush(ms, 7, true));
        }
    }

    #[test]
    fn reset_forces_next_flush() {
        let mut t = FlushThrottle::new(1000);
        assert!(t.should_flush(0, 1, false));
        assert!(!t.should_flush(5, 1, false));
        t.reset();
        assert!(t.should_flush(6, 1, false));
    }
}
