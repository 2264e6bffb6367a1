// Error type returned by HTTP handlers
use crate::application::control_surface::ControlError;
use crate::application::reading_service::IngestError;
use crate::infrastructure::http_response::json_response;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid payload: {0}")]
    Validation(String),
    #[error("dashboard is not enabled")]
    DashboardDisabled,
    #[error(transparent)]
    Rejected(#[from] ControlError),
    #[error("internal server error")]
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::DashboardDisabled => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Invalid(e) => ApiError::Validation(e.to_string()),
            IngestError::Store(e) => ApiError::Internal(e),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            // Details stay in the server log only.
            tracing::error!("Request failed: {:#}", e);
        }
        json_response(
            self.status(),
            &ErrorBody {
                error: self.to_string(),
            },
        )
    }
}
