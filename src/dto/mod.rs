pub mod assigned_course;
pub mod auth;
pub mod course;
pub mod generation;
pub mod supplementary;

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// RFC 3339 rendering used for every timestamp in responses.
pub(crate) fn format_datetime(dt: Option<DateTime>) -> Option<String> {
    dt.and_then(|d| d.try_to_rfc3339_string().ok())
}
