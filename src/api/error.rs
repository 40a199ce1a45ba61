use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::PlanningError;

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request is well-formed but admits no plan
    #[error("{0}")]
    Unprocessable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::Unprocessable(_) => "Infeasible",
            ApiError::InternalError(_) => "InternalServerError",
            ApiError::ServiceUnavailable(_) => "ServiceUnavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let (message, details) = match &self {
            ApiError::InternalError(_) => {
                tracing::error!(error = %self, "API error occurred");
                ("An internal error occurred".to_string(), None)
            }
            ApiError::ServiceUnavailable(reason) => {
                tracing::warn!(error = %self, "Service unavailable");
                (
                    "Service temporarily unavailable".to_string(),
                    Some(reason.clone()),
                )
            }
            _ => {
                tracing::debug!(error = %self, "Client error");
                (self.to_string(), None)
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<PlanningError> for ApiError {
    fn from(error: PlanningError) -> Self {
        match error {
            PlanningError::ValidationError(message) => ApiError::ValidationError(message),
            e @ PlanningError::InfeasibleModel { .. } => ApiError::Unprocessable(e.to_string()),
            e @ (PlanningError::SolverUnavailable(_) | PlanningError::NotSolved { .. }) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
            e @ (PlanningError::DivisionUndefined(_) | PlanningError::InconsistentSolution(_)) => {
                ApiError::InternalError(e.to_string())
            }
        }
    }
}
