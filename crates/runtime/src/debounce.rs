use foundation::time::{DurationMs, TimestampMs};

/// Delay-coalescing primitive.
///
/// Each `trigger` re-arms a single deadline at `now + delay`; a burst of
/// triggers therefore collapses into one firing, observed via `fire_due`
/// once the quiet period has elapsed. Only the fact "fire" is debounced:
/// callers read whatever ambient state they need at fire time, not at
/// trigger time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: DurationMs,
    deadline: Option<TimestampMs>,
}

impl Debouncer {
    pub fn new(delay: DurationMs) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or push back) the deadline.
    pub fn trigger(&mut self, now: TimestampMs) {
        self.deadline = Some(now.offset(self.delay));
    }

    /// Report and clear an elapsed deadline.
    pub fn fire_due(&mut self, now: TimestampMs) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Force a pending deadline to fire immediately.
    ///
    /// Returns false when nothing was pending. Exists for deterministic
    /// teardown in tests and session resets.
    pub fn flush(&mut self) -> bool {
        let was_pending = self.deadline.is_some();
        self.deadline = None;
        was_pending
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use foundation::time::{DurationMs, TimestampMs};

    #[test]
    fn burst_collapses_to_one_firing() {
        let mut d = Debouncer::new(DurationMs::millis(400));
        d.trigger(TimestampMs(0));
        d.trigger(TimestampMs(100));
        d.trigger(TimestampMs(200));

        assert!(!d.fire_due(TimestampMs(500)));
        assert!(d.fire_due(TimestampMs(600)));
        assert!(!d.fire_due(TimestampMs(700)));
    }

    #[test]
    fn deadline_measured_from_last_trigger() {
        let mut d = Debouncer::new(DurationMs::millis(400));
        d.trigger(TimestampMs(0));
        assert!(!d.fire_due(TimestampMs(399)));
        d.trigger(TimestampMs(399));
        assert!(!d.fire_due(TimestampMs(400)));
        assert!(d.fire_due(TimestampMs(799)));
    }

    #[test]
    fn cancel_discards_pending_fire() {
        let mut d = Debouncer::new(DurationMs::millis(100));
        d.trigger(TimestampMs(0));
        d.cancel();
        assert!(!d.fire_due(TimestampMs(1_000)));
    }

    #[test]
    fn flush_reports_whether_anything_was_pending() {
        let mut d = Debouncer::new(DurationMs::millis(100));
        assert!(!d.flush());
        d.trigger(TimestampMs(0));
        assert!(d.flush());
        assert!(!d.fire_due(TimestampMs(1_000)));
    }
}
