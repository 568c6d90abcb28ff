use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::validation::FieldViolation;

/// Error response type for simple errors
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Error response type for field-level validation errors
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldViolation>,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Maps each failure to its HTTP status and a `{"detail": ...}` body.
/// Internal failures are logged and reported with a generic message only.
#[derive(Debug)]
pub enum ApiError {
    /// One or more request fields failed validation
    Validation(Vec<FieldViolation>),
    /// No event with the given id
    NotFound(String),
    /// An event with the given id already exists
    Conflict(String),
    /// Update body carried no updatable fields
    NoFieldsToUpdate,
    /// Store failure or other unexpected error
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(violations) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationErrorResponse { detail: violations }),
                )
                    .into_response();
            }
            ApiError::NotFound(id) => {
                tracing::debug!("Event not found: {}", id);
                (StatusCode::NOT_FOUND, "Event not found")
            }
            ApiError::Conflict(id) => {
                tracing::debug!("Event already exists: {}", id);
                (StatusCode::CONFLICT, "Event with this ID already exists")
            }
            ApiError::NoFieldsToUpdate => (StatusCode::BAD_REQUEST, "No fields to update"),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(ErrorResponse {
            detail: message.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::AlreadyExists(id) => ApiError::Conflict(id),
            StoreError::EmptyUpdate(_) => ApiError::NoFieldsToUpdate,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
