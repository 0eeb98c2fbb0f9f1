use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::ValidationErrors;

use vitals_guard_domain::services::PredictionServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a validation error response listing every failing field
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let details: serde_json::Map<String, serde_json::Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<serde_json::Value> = errs
                    .iter()
                    .map(|e| {
                        serde_json::Value::String(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string()),
                        )
                    })
                    .collect();
                (field.to_string(), serde_json::Value::Array(messages))
            })
            .collect();

        Self::validation_error("Request validation failed", Some(details.into()))
    }

    /// Create an insufficient data error response
    pub fn insufficient_data(message: &str) -> Self {
        Self {
            error: "insufficient_data".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" | "insufficient_data" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&PredictionServiceError> for ErrorResponse {
    fn from(err: &PredictionServiceError) -> Self {
        match err {
            PredictionServiceError::ValidationError(msg) => Self::validation_error(msg, None),
            PredictionServiceError::Scoring(e) => Self::validation_error(&e.to_string(), None),
            PredictionServiceError::NotFound(_) => Self::not_found("assessment"),
            PredictionServiceError::InsufficientData(msg) => Self::insufficient_data(msg),
            PredictionServiceError::RepositoryError(_) => Self::internal_error(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Query parameters for history endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LimitQueryParams {
    /// Maximum number of records (default from configuration, max: 500)
    pub limit: Option<usize>,
}
