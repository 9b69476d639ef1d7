//! Subscriber registry and fan-out.

use std::sync::Arc;

use sqltap_events::{Event, Subscriber};

/// Ordered list of subscribers.
///
/// Every event is offered to every subscriber in registration order. The
/// event decides whether a subscriber receives it. A panicking handler is
/// not caught and aborts the remaining deliveries.
#[derive(Clone, Default)]
pub struct Dispatcher {
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber`. Registering the same subscriber twice delivers
    /// each event to it twice.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        tracing::debug!(position = self.subscribers.len(), "subscriber registered");
        self.subscribers.push(subscriber);
    }

    /// Offers `event` to every registered subscriber.
    pub fn notify(&self, event: &dyn Event) {
        tracing::trace!(
            kind = %event.kind(),
            subscribers = self.subscribers.len(),
            "dispatching event"
        );
        for subscriber in &self.subscribers {
            event.deliver(subscriber.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
