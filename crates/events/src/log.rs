//! Pending-event buffer owned by each aggregate.

use crate::event::LifecycleEvent;

/// An outbox-style append buffer.
///
/// Aggregates record into it from their behavior methods; the unit of work
/// drains it at commit. It is deliberately not a persisted log — state lives
/// on the aggregate, not in the events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pending: Vec<LifecycleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: LifecycleEvent) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[LifecycleEvent] {
        &self.pending
    }

    /// Take every buffered event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Access to an aggregate's pending events.
pub trait HasEvents {
    fn pending_events(&self) -> &[LifecycleEvent];

    /// Drain the buffer. Called by the repository at commit.
    fn take_events(&mut self) -> Vec<LifecycleEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LifecycleKind;
    use uuid::Uuid;

    #[test]
    fn drain_empties_the_buffer() {
        let mut log = EventLog::new();
        log.record(LifecycleEvent::new(
            "catalog.product",
            Uuid::now_v7(),
            LifecycleKind::Created,
            serde_json::Value::Null,
        ));
        assert_eq!(log.pending().len(), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.pending().is_empty());
    }
}
