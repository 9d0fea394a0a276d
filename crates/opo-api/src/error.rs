use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{generator::GenerationError, topic::pdf::PdfError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("The model returned an invalid question: {0}")]
    InvalidGeneration(String),
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Topic PDF unavailable: {0}")]
    Pdf(#[from] PdfError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) | Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidGeneration(_) => StatusCode::BAD_GATEWAY,
            Self::Generation(GenerationError::RateLimited) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Generation(_) | Self::Pdf(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Malformed or incomplete JSON bodies get the usual error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            Self::Database(sqlx::Error::RowNotFound) => json!({ "error": "Resource not found" }),
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                json!({ "error": "Internal server error" })
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                json!({ "error": "Internal server error" })
            }
            Self::InvalidGeneration(details) => {
                tracing::warn!(details = %details, "Rejected model output");
                json!({
                    "error": "The AI returned an invalid question",
                    "details": details,
                })
            }
            Self::Generation(e) => {
                tracing::error!(error = %e, "Generation request failed");
                json!({ "error": self.to_string() })
            }
            Self::Pdf(e) => {
                tracing::error!(error = %e, "Topic PDF extraction failed");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
