//! Shared API types
//!
//! Error responses share one shape: `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::DataError;
use crate::domain::sales::{SalesError, ValidationError};

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Missing parameters: product_id")]
    pub error: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    NotFound { message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Log the store failure in full and reply with `message` only
    ///
    /// Transient failures (timeouts, unreachable store) map to 503.
    pub fn from_data(e: DataError, message: &str) -> Self {
        tracing::error!(error = %e, backend = e.backend(), transient = e.is_transient(), "{}", message);
        if e.is_transient() {
            Self::service_unavailable(message)
        } else {
            Self::internal(message)
        }
    }

    pub fn from_validation(e: ValidationError) -> Self {
        tracing::debug!(field = ?e.field(), error = %e, "Rejected aggregate request");
        Self::bad_request(e.to_string())
    }

    pub fn from_sales(e: SalesError) -> Self {
        match e {
            SalesError::Validation(e) => Self::from_validation(e),
            SalesError::Execution(e) => Self::from_data(e, "Query failed"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::ServiceUnavailable { message }
            | Self::Internal { message } => message,
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
