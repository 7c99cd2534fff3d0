//! Append-only in-memory event log.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use serde_json::Value;

use crate::events::event::{Event, EventHeaders};

/// Ordered record of every event received by this process.
///
/// The log is the only source of event ids. It is not synchronized on its
/// own; [`crate::events::Inspector`] owns it behind the same lock as the hub.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Arc<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new event and return it.
    ///
    /// The id is the previous id + 1 (1 for an empty log). The timestamp is
    /// clamped so it never goes backwards relative to the previous event.
    pub fn append(&mut self, headers: EventHeaders, body: Value) -> Arc<Event> {
        let last = self.events.last();
        let id = last.map_or(1, |e| e.id + 1);

        let now = Utc::now().trunc_subsecs(3);
        let received_at = match last {
            Some(prev) if prev.received_at > now => prev.received_at,
            _ => now,
        };

        let event = Arc::new(Event {
            id,
            received_at,
            headers,
            body,
        });
        self.events.push(event.clone());
        event
    }

    /// Every event recorded so far, in arrival order.
    pub fn all(&self) -> &[Arc<Event>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
