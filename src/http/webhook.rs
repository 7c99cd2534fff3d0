//! Webhook ingress and outbound relay.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::events::EventHeaders;
use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::relay::RelayResponse;

/// `POST /api/webhook/receive`
///
/// Always accepted: whatever the body is, it is recorded.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let event = state
        .inspector
        .receive(EventHeaders::from_header_map(&headers), parse_body(&body));

    tracing::debug!(request_id = %request_id(&headers), id = event.id, bytes = body.len(), "Recorded webhook");
    Json(json!({ "ok": true, "id": event.id }))
}

/// Interpret a raw ingress body.
///
/// Empty → `{}`; valid JSON → that value; anything else → the raw text as a
/// JSON string.
pub fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Default::default());
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[derive(Debug, Deserialize)]
pub struct SendWebhookRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct SendWebhookResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub response: RelayResponse,
}

/// `POST /api/webhook/send`
pub async fn send_webhook(
    State(state): State<AppState>,
    payload: Result<Json<SendWebhookRequest>, JsonRejection>,
) -> Result<Json<SendWebhookResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.relay.send(&request.url, &request.payload).await?;
    Ok(Json(SendWebhookResponse { ok: true, response }))
}
