//! # outpost_event - Typed Event Delivery
//!
//! Two ways to consume simulation events:
//! - [`Observers`]: a list of subscribers for one event kind, called
//!   synchronously in priority order when the owner emits
//! - [`EventChannel`]: an unbounded queue for draining events later, e.g. on a
//!   presentation or network thread
//!
//! Every event kind gets its own `Observers<E>`; there is no dynamic type
//! dispatch and no optional single-callback slot.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Subscriber priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Subscribers for a single event kind
pub struct Observers<E> {
    subscribers: Vec<(SubscriberId, Priority, EventHandler<E>)>,
    next_subscriber_id: u64,
}

impl<E> Observers<E> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Subscribe with normal priority
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    /// Subscribe with priority. Higher priorities are called first; equal
    /// priorities keep subscription order.
    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.subscribers.push((id, priority, Box::new(handler)));
        // Stable sort keeps registration order within a priority
        self.subscribers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Forward every event into a channel
    pub fn forward_to(&mut self, sender: Sender<E>) -> SubscriberId
    where
        E: Clone + Send + 'static,
    {
        self.subscribe(move |event: &E| {
            // A dropped receiver just means nobody is listening anymore
            let _ = sender.send(event.clone());
        })
    }

    /// Unsubscribe. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber
    pub fn emit(&self, event: &E) {
        for (_, _, handler) in &self.subscribers {
            handler(event);
        }
    }

    /// Remove all subscribers
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Unbounded queue for a single event type
pub struct EventChannel<E> {
    sender: Sender<E>,
    receiver: Receiver<E>,
}

impl<E> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Get a sender handle (cheap to clone)
    pub fn sender(&self) -> Sender<E> {
        self.sender.clone()
    }

    /// Send an event
    pub fn send(&self, event: E) {
        // The channel holds its own receiver, so this cannot disconnect
        let _ = self.sender.send(event);
    }

    /// Receive one event if available
    pub fn receive(&self) -> Option<E> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending events
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{EventChannel, EventHandler, Observers, Priority, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct TestEvent(i32);

    #[test]
    fn test_observers() {
        let mut observers = Observers::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        observers.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        observers.emit(&TestEvent(42));
        observers.emit(&TestEvent(43));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut observers = Observers::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = observers.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(&TestEvent(1));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_priority() {
        let mut observers = Observers::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let order1 = order.clone();
        let order2 = order.clone();

        observers.subscribe_with_priority(
            move |e: &TestEvent| {
                order1.lock().push(("low", e.0));
            },
            Priority::Low,
        );

        observers.subscribe_with_priority(
            move |e: &TestEvent| {
                order2.lock().push(("high", e.0));
            },
            Priority::High,
        );

        observers.emit(&TestEvent(42));

        let received = order.lock();
        // High priority should be first
        assert_eq!(received[0].0, "high");
        assert_eq!(received[1].0, "low");
    }

    #[test]
    fn test_event_channel() {
        let channel: EventChannel<TestEvent> = EventChannel::new();

        channel.send(TestEvent(1));
        channel.send(TestEvent(2));
        channel.send(TestEvent(3));

        let events = channel.drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, 1);
        assert_eq!(events[1].0, 2);
        assert_eq!(events[2].0, 3);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_forward_to_channel() {
        let channel: EventChannel<TestEvent> = EventChannel::new();
        let mut observers = Observers::new();
        observers.forward_to(channel.sender());

        observers.emit(&TestEvent(7));
        assert_eq!(channel.receive().map(|e| e.0), Some(7));
        assert!(channel.receive().is_none());
    }
}
