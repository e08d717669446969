use crate::events::DaSignersEvent;
use crate::ports::outbound::EventSink;

/// Event sink that records everything it receives.
pub struct InMemoryEventSink {
    events: parking_lot::RwLock<Vec<DaSignersEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::RwLock::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<DaSignersEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, event: DaSignersEvent) {
        self.events.write().push(event);
    }
}

impl<T: EventSink> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: DaSignersEvent) {
        (**self).emit(event)
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: DaSignersEvent) {}
}
