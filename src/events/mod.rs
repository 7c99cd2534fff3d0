//! Inbound event recording and live fan-out.
//!
//! # Data Flow
//! ```text
//! POST /api/webhook/receive
//!     → EventHeaders::from_header_map (content-type, user-agent only)
//!     → Inspector::receive
//!         → log.rs   append (assign id + timestamp)
//!         → hub.rs   publish (one unbounded channel per subscriber)
//!
//! GET /api/events
//!     → Inspector::subscribe (backlog queued, then registered)
//!     → Subscription stream → SSE frames
//! ```
//!
//! # Design Decisions
//! - Log and hub share one lock so append happens-before publish and the
//!   backlog/live boundary is exact
//! - Unbounded per-subscriber channels: publish never waits on a slow client
//! - Nothing is persisted or evicted; the log lives as long as the process

pub mod event;
pub mod hub;
pub mod inspector;
pub mod log;

pub use event::{Event, EventHeaders};
pub use hub::{BroadcastHub, SubscriberId};
pub use inspector::{Inspector, Subscription};
pub use log::EventLog;
