//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → /api/configs*        → configs.rs → store
//!     → /api/webhook/receive → webhook.rs → events::Inspector
//!     → /api/webhook/send    → webhook.rs → relay
//!     → /api/events          → events.rs  → Subscription → SSE
//!     → error.rs renders failures as { ok: false, error }
//! ```

pub mod configs;
pub mod error;
pub mod events;
pub mod health;
pub mod request;
pub mod server;
pub mod webhook;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
