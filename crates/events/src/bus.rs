//! Event publishing/subscription abstraction.
//!
//! A lightweight pub/sub seam between the commit point and audit consumers.
//! Delivery is at-least-once and best-effort; events are returned from the
//! commit first, so a failed publish never loses the fact.

use std::sync::{Mutex, mpsc};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    /// Publish failed due to internal lock poisoning.
    #[error("event bus lock poisoned")]
    Poisoned,
}

/// A subscription to an event stream. Broadcast semantics: each subscriber
/// gets a copy of every published message.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: mpsc::Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: mpsc::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub seam).
pub trait EventBus<M>: Send + Sync {
    fn publish(&self, message: M) -> Result<(), PublishError>;

    fn subscribe(&self) -> Subscription<M>;
}

/// In-memory fan-out bus.
///
/// - no IO, no async
/// - at-least-once acceptable (subscribers must be idempotent)
/// - dead subscribers are dropped while publishing
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) -> Result<(), PublishError> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| PublishError::Poisoned)?;

        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_each_message() {
        let bus = InMemoryEventBus::<u32>::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(7).unwrap();

        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
    }

    #[test]
    fn dropped_subscribers_do_not_break_publish() {
        let bus = InMemoryEventBus::<u32>::new();
        drop(bus.subscribe());
        let live = bus.subscribe();

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(live.try_recv().unwrap(), 1);
        assert_eq!(live.try_recv().unwrap(), 2);
    }
}
