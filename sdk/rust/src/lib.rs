//! Typed client for the webhook inspector HTTP API.

mod client;

pub use client::{ClientError, ConfigRules, EventStream, InspectorClient, RelayOutcome, StreamedEvent};
