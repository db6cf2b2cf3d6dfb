//! Topic-based event bus implementation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;

use crate::protocol::ServerMessage;
use crate::types::ConnectionId;

/// One encoded outbound message, shared by every recipient of a fan-out.
pub type Frame = Arc<str>;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Everything visible to every connection in the world
    World,
}

struct Subscriber {
    tx: mpsc::UnboundedSender<Frame>,
    topics: HashSet<Topic>,
}

/// Topic-based event bus
///
/// Each subscribed connection owns an unbounded queue drained by its
/// transport writer. Delivery is best-effort: a queue whose receiver is gone
/// counts as not writable and is skipped.
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<ConnectionId, Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe a connection to the given topics.
    ///
    /// Returns the receiving half of the connection's queue. Subscribing a
    /// connection twice replaces its previous queue.
    pub fn subscribe(
        &self,
        connection: ConnectionId,
        topics: &[Topic],
    ) -> mpsc::UnboundedReceiver<Frame> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            tx,
            topics: topics.iter().copied().collect(),
        };
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(connection, subscriber);
        rx
    }

    /// Drop a connection's queue. Returns whether it was subscribed.
    pub fn unsubscribe(&self, connection: ConnectionId) -> bool {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&connection)
            .is_some()
    }

    /// Publish an event to every subscriber of `topic` except `exclude`.
    ///
    /// The event is encoded once. Returns the number of queues it reached.
    pub fn publish(
        &self,
        topic: Topic,
        event: &ServerMessage,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };

        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        for (id, subscriber) in subscribers.iter() {
            if Some(*id) == exclude || !subscriber.topics.contains(&topic) {
                continue;
            }
            if subscriber.tx.send(Arc::clone(&frame)).is_ok() {
                delivered += 1;
            } else {
                tracing::trace!(connection = %id, "Skipping closed subscriber queue");
            }
        }
        delivered
    }

    /// Send an event to a single connection regardless of topic.
    pub fn send_to(&self, connection: ConnectionId, event: &ServerMessage) -> bool {
        let Some(frame) = encode(event) else {
            return false;
        };

        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers
            .get(&connection)
            .is_some_and(|subscriber| subscriber.tx.send(frame).is_ok())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn encode(event: &ServerMessage) -> Option<Frame> {
    match event.encode() {
        Ok(json) => Some(Frame::from(json)),
        Err(error) => {
            tracing::error!(%error, "Failed to encode outbound event");
            None
        }
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left(name: &str) -> ServerMessage {
        ServerMessage::PlayerLeft {
            username: name.into(),
        }
    }

    #[test]
    fn publish_skips_excluded_connection() {
        let bus = EventBus::new();
        let mut a = bus.subscribe(ConnectionId(1), &[Topic::World]);
        let mut b = bus.subscribe(ConnectionId(2), &[Topic::World]);

        let delivered = bus.publish(Topic::World, &left("alice"), Some(ConnectionId(1)));

        assert_eq!(delivered, 1);
        assert!(a.try_recv().is_err());
        let frame = b.try_recv().expect("b receives");
        assert!(frame.contains("\"playerLeft\""));
    }

    #[test]
    fn frames_are_shared_not_reencoded() {
        let bus = EventBus::new();
        let mut a = bus.subscribe(ConnectionId(1), &[Topic::World]);
        let mut b = bus.subscribe(ConnectionId(2), &[Topic::World]);

        bus.publish(Topic::World, &left("x"), None);

        let fa = a.try_recv().unwrap();
        let fb = b.try_recv().unwrap();
        assert!(Arc::ptr_eq(&fa, &fb));
    }

    #[test]
    fn closed_queues_are_not_writable() {
        let bus = EventBus::new();
        let a = bus.subscribe(ConnectionId(1), &[Topic::World]);
        let mut b = bus.subscribe(ConnectionId(2), &[Topic::World]);
        drop(a);

        assert_eq!(bus.publish(Topic::World, &left("x"), None), 1);
        assert!(b.try_recv().is_ok());
        assert!(!bus.send_to(ConnectionId(1), &left("x")));
    }

    #[test]
    fn send_to_reaches_only_target() {
        let bus = EventBus::new();
        let mut a = bus.subscribe(ConnectionId(1), &[]);
        let mut b = bus.subscribe(ConnectionId(2), &[Topic::World]);

        assert!(bus.send_to(ConnectionId(1), &left("x")));
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_err());

        // Not subscribed to World, so publish skips it.
        assert_eq!(bus.publish(Topic::World, &left("y"), None), 1);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn unsubscribe_removes_queue() {
        let bus = EventBus::new();
        let _a = bus.subscribe(ConnectionId(1), &[Topic::World]);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(bus.unsubscribe(ConnectionId(1)));
        assert!(!bus.unsubscribe(ConnectionId(1)));
        assert_eq!(bus.publish(Topic::World, &left("x"), None), 0);
    }
}
