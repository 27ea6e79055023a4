use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use shared::ErrorEnvelope;

use crate::storage::StorageError;
use crate::upload::ValidationError;

/// Failure of one `/api/process-image` request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.category(),
            ApiError::Storage(_) => "Failed to process image",
            ApiError::Unknown(_) => "Internal server error",
        }
    }

    /// Validation details are always safe to show. Server-side details can
    /// carry paths, so production responses drop them.
    pub fn details(&self, production: bool) -> Option<String> {
        match self {
            ApiError::Validation(e) => Some(e.details()),
            _ if production => None,
            other => Some(other.to_string()),
        }
    }

    pub fn envelope(&self, production: bool) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.category().to_string(),
            details: self.details(production),
            timestamp: crate::timestamp(),
        }
    }

    pub fn to_response(&self, production: bool) -> HttpResponse {
        match self {
            ApiError::Validation(e) => log::warn!("Upload rejected: {}", e),
            other => log::error!("Image processing error: {}", other),
        }
        HttpResponse::build(self.status_code()).json(self.envelope(production))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response(true)
    }
}
