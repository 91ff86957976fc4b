use foundation::time::TimestampMs;

/// Minimal event type for traceability.
///
/// Every control decision in the kiosk (gate flips, dropped analyses,
/// suppressed transitions) lands here as structured text, stamped with the
/// caller-supplied timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at: TimestampMs,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: TimestampMs, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
