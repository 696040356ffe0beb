//! Mapping of pipeline failures to HTTP responses
//!
//! Bodies use a single `detail` field:
//! - bad image: 400 `"Invalid image format."`
//! - anything else: 500 `"Internal server error: <message>"`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leafscan::LeafScanError;
use serde::Serialize;
use tracing::{error, warn};

pub const INVALID_IMAGE_DETAIL: &str = "Invalid image format.";
pub const INTERNAL_ERROR_PREFIX: &str = "Internal server error: ";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Error returned by request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Uploaded bytes are not an image
    InvalidImage,
    /// Request is missing the upload field
    MissingFile,
    /// Malformed or oversized multipart body
    Upload(StatusCode, String),
    /// Any other failure
    Internal(String),
}

impl From<LeafScanError> for ApiError {
    fn from(err: LeafScanError) -> Self {
        if err.is_client_error() {
            warn!("Uploaded file is not a valid image: {}", err);
            ApiError::InvalidImage
        } else {
            error!("Error during image classification: {:?}", err);
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::InvalidImage => (StatusCode::BAD_REQUEST, INVALID_IMAGE_DETAIL.to_string()),
            ApiError::MissingFile => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Missing multipart field 'file'.".to_string(),
            ),
            ApiError::Upload(status, msg) => (status, msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}{}", INTERNAL_ERROR_PREFIX, msg),
            ),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
