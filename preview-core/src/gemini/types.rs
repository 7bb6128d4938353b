//! `generateContent` wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text { text: String },
    Image { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response part. The API answers in camelCase, older gateways in snake_case.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResponsePart {
    pub text: Option<String>,
    #[serde(alias = "inline_data", rename = "inlineData")]
    pub inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseInlineData {
    #[serde(default, alias = "mime_type", rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "prompt".into(),
                    },
                    Part::Image {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".into(),
                            data: "abc".into(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_k: 32,
                top_p: 1.0,
                max_output_tokens: 4096,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "prompt" },
                        { "inline_data": { "mime_type": "image/jpeg", "data": "abc" } }
                    ]
                }],
                "generationConfig": {
                    "temperature": 0.5,
                    "topK": 32,
                    "topP": 1.0,
                    "maxOutputTokens": 4096
                }
            })
        );
    }

    #[test]
    fn test_response_accepts_both_casings() {
        let camel: ResponsePart = serde_json::from_value(json!({
            "inlineData": { "mimeType": "image/png", "data": "xyz" }
        }))
        .unwrap();
        let snake: ResponsePart = serde_json::from_value(json!({
            "inline_data": { "mime_type": "image/png", "data": "xyz" }
        }))
        .unwrap();

        for part in [camel, snake] {
            let inline = part.inline_data.unwrap();
            assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
            assert_eq!(inline.data.as_deref(), Some("xyz"));
        }
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.candidates.is_empty());
    }
}
