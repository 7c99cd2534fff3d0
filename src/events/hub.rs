//! Subscriber registry and fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::events::event::Event;

/// Opaque handle identifying one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of live subscribers, each fed through its own unbounded channel.
///
/// Sends never block, so publishing can run while the caller holds a lock.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    subscribers: HashMap<SubscriberId, mpsc::UnboundedSender<Arc<Event>>>,
    next_id: u64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, queueing `backlog` ahead of any later publish.
    pub fn register(
        &mut self,
        backlog: &[Arc<Event>],
    ) -> (SubscriberId, mpsc::UnboundedReceiver<Arc<Event>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in backlog {
            // The receiver is still in hand, so this cannot fail.
            let _ = tx.send(event.clone());
        }

        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.subscribers.insert(id, tx);
        (id, rx)
    }

    /// Deliver `event` to every subscriber. Subscribers whose receiving end is
    /// gone are dropped. Returns the number of deliveries.
    pub fn publish(&mut self, event: &Arc<Event>) -> usize {
        let before = self.subscribers.len();
        self.subscribers.retain(|id, tx| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                tracing::debug!(subscriber = %id, "Dropping disconnected subscriber");
            }
            delivered
        });
        let delivered = self.subscribers.len();
        if delivered < before {
            tracing::debug!(dropped = before - delivered, "Pruned closed subscribers");
        }
        delivered
    }

    /// Remove a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
