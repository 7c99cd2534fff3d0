//! Recorded webhook event types.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One received webhook call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Sequence number, starting at 1, never reused within a process.
    pub id: u64,
    /// Arrival time, millisecond precision, non-decreasing with `id`.
    pub received_at: DateTime<Utc>,
    /// Retained subset of the inbound request headers.
    pub headers: EventHeaders,
    /// Parsed request payload.
    pub body: Value,
}

/// Fixed projection of request headers kept on an [`Event`].
///
/// Only `content-type` and `user-agent` survive; absent headers are omitted
/// from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeaders {
    #[serde(rename = "content-type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "user-agent", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl EventHeaders {
    /// Project the retained headers out of a full header map.
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };
        Self {
            content_type: get(header::CONTENT_TYPE),
            user_agent: get(header::USER_AGENT),
        }
    }
}
