//! Photo suitability check.
//!
//! Asks a model whether an uploaded photo can be used for a preview before
//! the caller spends a transform on it. The model answers in JSON; the verdict
//! is accepted only above [`CONFIDENCE_THRESHOLD`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fallback::{AllModelsFailed, ModelAttempt};
use crate::gemini::{GenerativeModel, ImageRequest, InlineImage};
use crate::prompts::photo_check_prompt;
use crate::transform::Treatment;

/// Minimum model confidence for a photo to pass
pub const CONFIDENCE_THRESHOLD: f64 = 0.65;

const CHECK_MODEL: &str = "gemini-2.5-flash-image";
const CHECK_TEMPERATURE: f32 = 0.1;
const CHECK_MAX_OUTPUT_TOKENS: u32 = 512;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const DEFAULT_REASON: &str = "Unknown";

/// Incoming photo check request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCheckRequest {
    /// Base64 image, optionally with a `data:image/...;base64,` prefix
    pub image_data: Option<String>,
    pub mime_type: Option<String>,
    pub treatment_type: Option<String>,
}

/// Verdict returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoVerdict {
    pub is_valid: bool,
    pub confidence: f64,
    pub reason: String,
    pub issues: Vec<String>,
    pub threshold: f64,
}

/// Runs suitability checks against a text capable model
pub struct PhotoChecker {
    generator: Option<Arc<dyn GenerativeModel>>,
}

impl PhotoChecker {
    pub fn new(generator: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self { generator }
    }

    pub async fn check(&self, request: &PhotoCheckRequest) -> Result<PhotoVerdict> {
        let image_data = request
            .image_data
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::invalid_input("Image data is required"))?;
        let mime_type = request
            .mime_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::invalid_input("MIME type is required"))?;

        // Anything other than "hair" is checked as teeth
        let treatment = match request.treatment_type.as_deref() {
            Some("hair") => Treatment::Hair,
            _ => Treatment::Teeth,
        };

        let generator = self
            .generator
            .as_deref()
            .ok_or_else(|| Error::configuration("No image generation API is configured"))?;

        let image = InlineImage::new(mime_type, strip_data_uri_prefix(image_data));
        let request = ImageRequest::new(CHECK_MODEL, photo_check_prompt(treatment), image)
            .with_temperature(CHECK_TEMPERATURE)
            .with_max_output_tokens(CHECK_MAX_OUTPUT_TOKENS);

        let reply = generator.generate_text(&request).await.map_err(|failure| {
            warn!(model = CHECK_MODEL, error = %failure, "Photo check failed");
            Error::Generation(AllModelsFailed {
                attempts: vec![ModelAttempt {
                    model: CHECK_MODEL.to_string(),
                    reason: failure.to_string(),
                }],
            })
        })?;

        let verdict = parse_reply(&reply)?;
        info!(
            treatment = %treatment,
            is_valid = verdict.is_valid,
            confidence = verdict.confidence,
            "Photo checked"
        );
        Ok(verdict)
    }
}

/// Drop a leading `data:image/<subtype>;base64,` if present
fn strip_data_uri_prefix(data: &str) -> &str {
    let Some(rest) = data.strip_prefix("data:image/") else {
        return data;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return data;
    };
    if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        payload
    } else {
        data
    }
}

/// Parse the model reply. The JSON object may be wrapped in prose or a code fence.
fn parse_reply(reply: &str) -> Result<PhotoVerdict> {
    let json = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(Error::Serialization(
                "Could not parse validation response".to_string(),
            ));
        }
    };

    let value: Value = serde_json::from_str(json)
        .map_err(|_| Error::Serialization("Invalid JSON in validation response".to_string()))?;

    let model_valid = value.get("isValid").map(is_truthy).unwrap_or(false);
    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE);
    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REASON)
        .to_string();
    let issues = value
        .get("issues")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(PhotoVerdict {
        is_valid: model_valid && confidence >= CONFIDENCE_THRESHOLD,
        confidence,
        reason,
        issues,
        threshold: CONFIDENCE_THRESHOLD,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
