//! Outbound test-webhook relay.

pub mod client;

pub use client::{RelayClient, RelayError, RelayResponse};
