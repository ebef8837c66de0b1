pub mod assigned_course;
pub mod course;
pub mod generation;
pub mod supplementary;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use mongodb::bson::oid::ObjectId;

use crate::{dto::ErrorResponse, error::AppError};

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult = Result<Response, ApiError>;

pub(crate) fn pretty_json_response<T: serde::Serialize>(data: T) -> Response {
    pretty_json_response_with_status(StatusCode::OK, data)
}

pub(crate) fn pretty_json_response_with_status<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    match serde_json::to_string_pretty(&data) {
        Ok(json) => (status, [(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize response").into_response()
        }
    }
}

/// Path segment to ObjectId, or a 400.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()).into())
}

/// Log a failed request and turn the error into a response.
pub(crate) fn failure(action: &'static str) -> impl Fn(AppError) -> ApiError {
    move |e| {
        match &e {
            AppError::NotFound(_)
            | AppError::Validation(_)
            | AppError::InvalidId(_)
            | AppError::Conflict(_) => {
                tracing::warn!("{}: {}", action, e)
            }
            _ => tracing::error!("{}: {}", action, e),
        }
        e.into()
    }
}
