//! HTTP error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use preview_core::Error;
use serde::Serialize;
use tracing::error;

/// Error returned by a route handler
#[derive(Debug)]
pub enum ApiError {
    /// Failure in the transform endpoint
    Transform(Error),
    /// Failure in the photo check endpoint
    PhotoCheck(Error),
    /// Failure in the image proxy endpoint
    Proxy(Error),
    /// Request body was not valid JSON
    BadBody(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            message: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadBody(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    details: Some(reason),
                    ..ErrorBody::new("Invalid request body")
                },
            ),
            ApiError::Transform(err) => transform_error(err),
            ApiError::PhotoCheck(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(err.to_string()))
            }
            ApiError::PhotoCheck(err) => {
                error!(error = %err, "Photo check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: Some(err.to_string()),
                        ..ErrorBody::new("Failed to validate photo")
                    },
                )
            }
            ApiError::Proxy(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(err.to_string()))
            }
            ApiError::Proxy(err) => {
                error!(error = %err, "Image proxy failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Unable to process image"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn transform_error(err: Error) -> (StatusCode, ErrorBody) {
    match err {
        err if err.is_client_error() => (StatusCode::BAD_REQUEST, ErrorBody::new(err.to_string())),
        Error::Generation(failed) => {
            error!(attempts = failed.attempts.len(), error = %failed, "All models failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    details: Some(failed.to_string()),
                    ..ErrorBody::new("Failed to process image with Gemini API")
                },
            )
        }
        Error::Configuration(message) => {
            error!(error = %message, "Transform misconfigured");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(message))
        }
        other => {
            error!(error = %other, "Transform failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    details: Some(other.to_string()),
                    ..ErrorBody::new("Internal server error")
                },
            )
        }
    }
}
