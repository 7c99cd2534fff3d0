//! Config API: CRUD over named rule lists.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    #[serde(default)]
    pub name: String,
    /// Kept untyped so a non-array is reported as invalid input, not a
    /// deserialization failure.
    #[serde(default)]
    pub rules: Value,
}

/// `GET /api/configs`
pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let names = state.store.list().await?;
    Ok(Json(json!({ "ok": true, "names": names })))
}

/// `GET /api/configs/{name}`
pub async fn get_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rules = state.store.get(&name).await?;
    Ok(Json(json!({ "ok": true, "name": name, "rules": rules })))
}

/// `POST /api/configs`
pub async fn save_config(
    State(state): State<AppState>,
    payload: Result<Json<SaveConfigRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let name = state.store.save(&request.name, request.rules).await?;
    Ok(Json(json!({ "ok": true, "name": name })))
}

/// `DELETE /api/configs/{name}`
pub async fn delete_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(&name).await?;
    Ok(Json(json!({ "ok": true })))
}
