//! Treatment transform endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use preview_core::TransformRequest;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub transformed_url: String,
}

/// Run a teeth or hair preview and return the result as a data URI
pub async fn transform_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> Result<Json<TransformResponse>, ApiError> {
    let Json(request) = payload?;

    let outcome = state
        .transform
        .transform(&request)
        .await
        .map_err(ApiError::Transform)?;

    let models: Vec<&str> = outcome.passes.iter().map(|p| p.model.as_str()).collect();
    info!(treatment = %outcome.treatment, models = ?models, "Transform complete");

    Ok(Json(TransformResponse {
        transformed_url: outcome.transformed_url,
    }))
}
