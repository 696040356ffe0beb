//! Classification endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::SharedState;

/// Name of the multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::Upload(err.status(), err.body_text())
}

/// POST /check_image - Classify an uploaded leaf image
pub async fn check_image(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut contents = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            debug!(
                "Received upload {:?} ({:?})",
                field.file_name().unwrap_or("<unnamed>"),
                field.content_type()
            );
            contents = Some(field.bytes().await.map_err(upload_error)?);
            break;
        }
    }

    let contents = contents.ok_or(ApiError::MissingFile)?;
    let pipeline = state.pipeline.clone();

    let result = tokio::task::spawn_blocking(move || pipeline.run(&contents))
        .await
        .map_err(|e| {
            error!("Classification task failed: {}", e);
            ApiError::Internal(e.to_string())
        })??;

    Ok(Json(result.to_response()).into_response())
}
