use axum::{http::StatusCode, response::Json};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Error taxonomy shared by the generation pipeline, the persistence layer and
/// the assignment manager.
#[derive(Debug, Error)]
pub enum AppError {
    /// The generative or video service call itself failed (network, quota, timeout).
    #[error("generation service error: {0}")]
    GenerationService(String),

    /// The service answered, but not with the JSON shape we asked for.
    #[error("generation parse error: {0}")]
    GenerationParse(String),

    /// A structural invariant would be violated; nothing was written.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The document changed after it was read; the write was not applied.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::GenerationService(_) | Self::GenerationParse(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::GenerationService(_) => "GENERATION_SERVICE_ERROR",
            Self::GenerationParse(_) => "GENERATION_PARSE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidId(_) => "INVALID_ID",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<mongodb::bson::oid::Error> for AppError {
    fn from(e: mongodb::bson::oid::Error) -> Self {
        Self::InvalidId(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        Self::Database(e.into())
    }
}

impl From<AppError> for (StatusCode, Json<ErrorResponse>) {
    fn from(e: AppError) -> Self {
        let message = match &e {
            // Driver details stay in the logs.
            AppError::Database(_) => "Internal database error".to_string(),
            other => other.to_string(),
        };
        (
            e.status_code(),
            Json(ErrorResponse {
                error: e.code().to_string(),
                message,
            }),
        )
    }
}
