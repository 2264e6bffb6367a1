// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_action, dashboard_snapshot, health_check, ingest_reading, reading_preflight,
    retrieve_reading,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const READING_PATH: &str = "/api/data";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route(
            READING_PATH,
            get(retrieve_reading)
                .post(ingest_reading)
                .options(reading_preflight),
        )
        .route("/dashboard", get(dashboard_snapshot))
        .route("/dashboard/actions", post(dashboard_action))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
