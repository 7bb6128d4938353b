//! API route modules.

pub mod health;
pub mod image_proxy;
pub mod transform;
pub mod validate_photo;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/transform", post(transform::transform_image).options(preflight))
        .route(
            "/api/transform-image",
            post(transform::transform_image).options(preflight),
        )
        .route(
            "/validate-photo",
            post(validate_photo::validate_photo).options(preflight),
        )
        .route(
            "/image-proxy",
            post(image_proxy::proxy_image).options(preflight),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bare OPTIONS requests; real preflights are answered by the CORS layer
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.cors_origin() {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(origin, "Unusable CORS origin, allowing any");
                AllowOrigin::any()
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
