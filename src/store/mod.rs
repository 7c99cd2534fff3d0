//! Named rule config persistence.
//!
//! # Data Flow
//! ```text
//! Config API handler
//!     → config_store.rs (validate name/rules)
//!     → load JSON document → mutate → write temp file → rename
//! ```

pub mod config_store;

pub use config_store::{ConfigStore, Rule, StoreError, StoreResult};
