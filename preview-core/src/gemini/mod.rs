//! Generative call adapter.
//!
//! Wraps a single Gemini `generateContent` call: prompt text, the primary
//! image and optional reference images go out; the first inline image (or the
//! joined text, for the photo check) comes back. There are no retries at this
//! layer; see [`crate::fallback`] for trying several models.

mod client;
mod types;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

pub use client::{GeminiClient, GeminiConfig};

/// Temperature used when a request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TOP_K: u32 = 32;
pub const DEFAULT_TOP_P: f32 = 1.0;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Base64 image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// One generation call against a named model.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub image: InlineImage,
    pub temperature: Option<f32>,
    pub references: Vec<InlineImage>,
    /// Output token cap; the adapter default applies when unset
    pub max_output_tokens: Option<u32>,
}

impl ImageRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, image: InlineImage) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            image,
            temperature: None,
            references: Vec::new(),
            max_output_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_references(mut self, references: Vec<InlineImage>) -> Self {
        self.references = references;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Same request aimed at another model.
    pub fn for_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }
}

/// Why a single generation call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("No candidates returned")]
    NoCandidate,

    #[error("No inline image data in response")]
    NoImageData,

    #[error("No text in response")]
    NoText,

    /// Non-2xx answer; carries the raw response body
    #[error("{}", http_reason(*status, body))]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("response decode failed: {0}")]
    Decode(String),
}

fn http_reason(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

/// Generative model seam. [`GeminiClient`] is the production implementation.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate an image; returns the first inline image of the first candidate.
    async fn generate_image(&self, request: &ImageRequest) -> Result<InlineImage, GenerationFailure>;

    /// Generate text; returns the joined text parts of the first candidate.
    async fn generate_text(&self, request: &ImageRequest) -> Result<String, GenerationFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_from_bytes() {
        let image = InlineImage::from_bytes("image/png", b"png-bytes");
        assert_eq!(image.data, STANDARD.encode(b"png-bytes"));
        assert!(image.to_data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_request_builder() {
        let request = ImageRequest::new("model-a", "prompt", InlineImage::new("image/jpeg", "abc"))
            .with_temperature(0.4)
            .with_references(vec![InlineImage::new("image/jpeg", "ref")]);

        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.references.len(), 1);

        let other = request.for_model("model-b");
        assert_eq!(other.model, "model-b");
        assert_eq!(other.prompt, "prompt");
        assert_eq!(other.references.len(), 1);
    }

    #[test]
    fn test_http_failure_reason() {
        let with_body = GenerationFailure::Http {
            status: 429,
            body: "{\"error\":\"quota\"}".into(),
        };
        assert_eq!(with_body.to_string(), "{\"error\":\"quota\"}");

        let empty = GenerationFailure::Http {
            status: 503,
            body: String::new(),
        };
        assert_eq!(empty.to_string(), "HTTP 503");
    }
}
