//! Live event stream (`text/event-stream`).

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures_util::{Stream, StreamExt};

use crate::events::Event;
use crate::http::server::AppState;

/// `GET /api/events`
///
/// Emits the backlog, then each new event, as `data: <json>\n\n`. The stream
/// ends when the client goes away (the subscription is dropped) or the server
/// shuts down.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let subscription = state.inspector.subscribe();
    tracing::info!(
        subscriber = %subscription.id(),
        subscribers = state.inspector.subscriber_count(),
        "Event stream opened"
    );

    let shutdown = state.shutdown.clone();
    let stream = subscription
        .filter_map(|event| async move { to_sse(&event) })
        .map(Ok::<_, Infallible>)
        .take_until(async move { shutdown.wait().await });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(state.keep_alive))
}

fn to_sse(event: &Event) -> Option<SseEvent> {
    match SseEvent::default().json_data(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(id = event.id, error = %e, "Failed to encode event");
            None
        }
    }
}
