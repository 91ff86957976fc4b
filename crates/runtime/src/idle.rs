use foundation::time::{DurationMs, TimestampMs};

/// Quiet-period watchdog.
///
/// Any user activity `kick`s the deadline forward; `expired` reports (and
/// disarms) a deadline that has elapsed. The owner re-arms after handling
/// the expiry, so a dead table does not reset in a loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleTimer {
    timeout: DurationMs,
    deadline: Option<TimestampMs>,
}

impl IdleTimer {
    pub fn new(timeout: DurationMs) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// Restart the quiet period.
    pub fn kick(&mut self, now: TimestampMs) {
        self.deadline = Some(now.offset(self.timeout));
    }

    /// Report and disarm an elapsed deadline.
    pub fn expired(&mut self, now: TimestampMs) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
