//! Health check endpoint

use axum::{extract::State, Json};
use leafscan::utils::format_duration;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub uptime: String,
    pub version: String,
    pub profile: String,
    pub num_classes: usize,
    pub class_label_counts: bool,
    pub classifier: String,
    pub image_size: u32,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    let pipeline = &state.pipeline;
    let uptime_seconds = state.uptime_seconds();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds,
        uptime: format_duration(uptime_seconds as f64),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profile: pipeline.profile_name().to_string(),
        num_classes: pipeline.catalog().len(),
        class_label_counts: pipeline.stats().is_some(),
        classifier: pipeline.classifier_name().to_string(),
        image_size: pipeline.image_size(),
    })
}
