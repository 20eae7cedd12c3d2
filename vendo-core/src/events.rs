use parking_lot::Mutex;
use vendo_shared::OrderEvent;

/// Hand-off point for order lifecycle events.
///
/// The workflow constructs each event exactly once per triggering
/// transition; the delivery mechanism behind this trait is external.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: OrderEvent);
}

/// Records published events in memory. Used by tests and as the default
/// sink when no broker is wired in.
#[derive(Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<OrderEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for MemoryEventSink {
    fn publish(&self, event: OrderEvent) {
        self.events.lock().push(event);
    }
}
