use std::collections::VecDeque;

use foundation::time::{DurationMs, TimestampMs};

/// Bookkeeping of recent event timestamps for rolling-window rate limits.
///
/// Timestamps are assumed non-decreasing (single logical thread of control),
/// so stale entries can be pruned lazily from the front on each query. A
/// rejected `allow` check has no side effects; logging the rejection is the
/// caller's job.
#[derive(Debug, Default, Clone)]
pub struct RateLimiter {
    history: VecDeque<TimestampMs>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, now: TimestampMs) {
        self.history.push_back(now);
    }

    /// Number of recorded events strictly newer than `now - window`.
    pub fn count_within(&mut self, now: TimestampMs, window: DurationMs) -> usize {
        self.prune(now, window);
        self.history.len()
    }

    /// True iff another event may run now without exceeding `max_per_window`.
    pub fn allow(&mut self, now: TimestampMs, max_per_window: usize, window: DurationMs) -> bool {
        self.count_within(now, window) < max_per_window
    }

    fn prune(&mut self, now: TimestampMs, window: DurationMs) {
        let cutoff = TimestampMs(now.0 - window.0);
        while let Some(&front) = self.history.front() {
            if front > cutoff {
                break;
            }
            self.history.pop_front();
        }
    }
}
