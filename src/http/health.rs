use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub version: &'static str,
    pub events: usize,
    pub subscribers: usize,
}

/// `GET /api/health`
pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
        events: state.inspector.event_count(),
        subscribers: state.inspector.subscriber_count(),
    })
}
