// HTTP request handlers
use crate::application::control_surface::ControlAction;
use crate::application::reading_service::StoredReading;
use crate::domain::reading::Reading;
use crate::infrastructure::http_response::{json_response, preflight_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const INGEST_MESSAGE: &str = "Reading accepted";

#[derive(Serialize)]
struct IngestResponse {
    success: bool,
    message: &'static str,
    data: Reading,
    timestamp: String,
}

#[derive(Serialize)]
struct RetrieveResponse {
    success: bool,
    data: Reading,
    timestamp: String,
}

fn timestamp(stored: &StoredReading) -> String {
    stored.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Store a new reading
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("body is not valid JSON: {e}")))?;

    let stored = state.reading_service.ingest(&payload).await?;

    Ok(json_response(
        StatusCode::OK,
        &IngestResponse {
            success: true,
            message: INGEST_MESSAGE,
            data: stored.reading,
            timestamp: timestamp(&stored),
        },
    ))
}

/// Return the latest stored reading
pub async fn retrieve_reading(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let stored = state.reading_service.retrieve().await?;

    Ok(json_response(
        StatusCode::OK,
        &RetrieveResponse {
            success: true,
            data: stored.reading,
            timestamp: timestamp(&stored),
        },
    ))
}

/// CORS preflight for the reading resource
pub async fn reading_preflight() -> impl IntoResponse {
    preflight_response()
}

/// Read-only view of the dashboard
pub async fn dashboard_snapshot(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.as_ref().ok_or(ApiError::DashboardDisabled)?;
    let snapshot = dashboard.lock().await.snapshot().await;
    Ok(json_response(StatusCode::OK, &snapshot))
}

/// Apply an operator action to the dashboard
pub async fn dashboard_action(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard.as_ref().ok_or(ApiError::DashboardDisabled)?;
    let action: ControlAction = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("unknown action: {e}")))?;

    tracing::info!(?action, "Operator action");
    let snapshot = dashboard.lock().await.dispatch(action).await?;
    Ok(json_response(StatusCode::OK, &snapshot))
}
