//! Photo suitability endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use preview_core::photo_check::{PhotoCheckRequest, PhotoVerdict};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn validate_photo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhotoCheckRequest>, JsonRejection>,
) -> Result<Json<PhotoVerdict>, ApiError> {
    let Json(request) = payload?;

    let verdict = state
        .photo_check
        .check(&request)
        .await
        .map_err(ApiError::PhotoCheck)?;

    Ok(Json(verdict))
}
