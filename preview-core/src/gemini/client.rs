//! Gemini HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    ResponsePart,
};
use super::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
    GenerationFailure, GenerativeModel, ImageRequest, InlineImage,
};
use crate::error::{Error, Result};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// API root, without a trailing slash
    pub api_base: String,
    /// Per-call timeout; the transport default applies when unset
    pub request_timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl AsRef<str>) -> Self {
        let trimmed = api_base.as_ref().trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.api_base = trimmed.to_string();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::configuration("No image generation API is configured"));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    fn endpoint(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.config.api_base, model_path)
    }

    fn build_body(request: &ImageRequest) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(2 + request.references.len());
        parts.push(Part::Text {
            text: request.prompt.clone(),
        });
        parts.push(image_part(&request.image));
        parts.extend(request.references.iter().map(image_part));

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                top_k: DEFAULT_TOP_K,
                top_p: DEFAULT_TOP_P,
                max_output_tokens: request
                    .max_output_tokens
                    .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            },
        }
    }

    /// Send the request and return the parts of the first candidate.
    async fn first_candidate_parts(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<Vec<ResponsePart>, GenerationFailure> {
        let endpoint = self.endpoint(&request.model);
        debug!(model = %request.model, references = request.references.len(), "Gemini request");

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationFailure::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationFailure::Decode(e.to_string()))?;

        let candidate = payload
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationFailure::NoCandidate)?;

        Ok(candidate.content.map(|c| c.parts).unwrap_or_default())
    }
}

fn image_part(image: &InlineImage) -> Part {
    Part::Image {
        inline_data: InlineData {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        },
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<InlineImage, GenerationFailure> {
        let parts = self.first_candidate_parts(request).await?;

        parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .find_map(|inline| {
                let data = inline.data.filter(|d| !d.is_empty())?;
                let mime_type = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
                Some(InlineImage { mime_type, data })
            })
            .ok_or(GenerationFailure::NoImageData)
    }

    async fn generate_text(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<String, GenerationFailure> {
        let parts = self.first_candidate_parts(request).await?;

        let text = parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>()
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(GenerationFailure::NoText);
        }
        Ok(text)
    }
}
