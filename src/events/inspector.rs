//! The inspector service: event log + broadcast hub behind one lock.
//!
//! Ingress appends and publishes while holding the lock; subscribe snapshots
//! the backlog and registers while holding the same lock. A subscriber
//! therefore sees each event exactly once: either in its backlog or as a
//! live publish, never both and never neither.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures_util::Stream;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::events::event::{Event, EventHeaders};
use crate::events::hub::{BroadcastHub, SubscriberId};
use crate::events::log::EventLog;
use crate::observability::metrics;

#[derive(Debug, Default)]
struct Shared {
    log: EventLog,
    hub: BroadcastHub,
}

/// Owns all in-memory event state. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    shared: Arc<Mutex<Shared>>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }

    /// Record an inbound webhook and fan it out to live subscribers.
    pub fn receive(&self, headers: EventHeaders, body: Value) -> Arc<Event> {
        let mut shared = self.lock();
        let event = shared.log.append(headers, body);
        let delivered = shared.hub.publish(&event);

        metrics::record_webhook_received(shared.log.len(), shared.hub.len());
        tracing::info!(id = event.id, subscribers = delivered, "Webhook received");
        event
    }

    /// Attach a new subscriber. It first yields the full backlog, then every
    /// event received afterwards.
    pub fn subscribe(&self) -> Subscription {
        let mut shared = self.lock();
        let Shared { log, hub } = &mut *shared;
        let (id, rx) = hub.register(log.all());

        metrics::record_subscribers(hub.len());
        tracing::debug!(subscriber = %id, backlog = log.len(), "Subscriber attached");
        Subscription {
            id,
            rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Detach a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        detach(&self.shared, id);
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<Arc<Event>> {
        self.lock().log.all().to_vec()
    }

    pub fn event_count(&self) -> usize {
        self.lock().log.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().hub.len()
    }
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // Nothing panics while holding the lock, but a poisoned lock still holds
    // a consistent log.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn detach(shared: &Mutex<Shared>, id: SubscriberId) {
    let mut shared = lock_shared(shared);
    if shared.hub.unsubscribe(id) {
        metrics::record_subscribers(shared.hub.len());
        tracing::debug!(subscriber = %id, "Subscriber detached");
    }
}

/// A live subscription. Yields events as a [`Stream`]; detaches on drop.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Arc<Event>>,
    shared: Weak<Mutex<Shared>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next event. `None` once the inspector is gone or the
    /// subscription has been removed.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Next already-queued event, if any.
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        self.rx.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = Arc<Event>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            detach(&shared, self.id);
        }
    }
}
