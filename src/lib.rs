//! Webhook Inspector Library
//!
//! Receives webhooks, keeps them in memory, streams them live to observers,
//! relays test webhooks to arbitrary URLs, and persists named rule configs.

pub mod config;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod store;

pub use config::schema::InspectorConfig;
pub use events::{Event, EventHeaders, Inspector, Subscription};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::ConfigStore;
