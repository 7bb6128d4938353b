//! Image proxy endpoint.
//!
//! Lets the site read an allow-listed remote image as a data URL without
//! tripping browser CORS rules.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use preview_core::source::{ImageSource, validate_image_url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub data_url: String,
}

/// Fetch an image and return it inline
pub async fn proxy_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProxyRequest>, JsonRejection>,
) -> Result<Json<ProxyResponse>, ApiError> {
    let Json(request) = payload?;

    let url = validate_image_url(
        request.url.as_deref(),
        &state.config.proxy_allowed_domains,
    )
    .map_err(ApiError::Proxy)?;

    let image = state.source.fetch(&url).await.map_err(ApiError::Proxy)?;
    debug!(url = %url, bytes = image.bytes.len(), "Proxied image");

    Ok(Json(ProxyResponse {
        data_url: image.to_data_uri(),
    }))
}
