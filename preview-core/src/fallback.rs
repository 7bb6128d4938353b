//! Model fallback runner.
//!
//! Image endpoints are quota limited and flaky per model, so a pass walks an
//! ordered list of models and keeps the first image it gets back.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::{GenerativeModel, ImageRequest, InlineImage};

/// One failed model attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAttempt {
    pub model: String,
    pub reason: String,
}

impl fmt::Display for ModelAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

/// Every model in the list failed. Displays as `model: reason | model: reason`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", join_attempts(attempts))]
pub struct AllModelsFailed {
    pub attempts: Vec<ModelAttempt>,
}

fn join_attempts(attempts: &[ModelAttempt]) -> String {
    if attempts.is_empty() {
        return "no models configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSuccess {
    pub model: String,
    pub image: InlineImage,
    /// Attempts that failed before the winning model
    pub failed: Vec<ModelAttempt>,
}

/// Try `models` in order with the same request, returning the first image.
pub async fn run_with_fallback(
    generator: &dyn GenerativeModel,
    models: &[&str],
    request: &ImageRequest,
) -> Result<FallbackSuccess, AllModelsFailed> {
    let mut attempts = Vec::new();

    for model in models {
        match generator.generate_image(&request.for_model(model)).await {
            Ok(image) => {
                info!(provider = "gemini", model = %model, "Generation succeeded");
                return Ok(FallbackSuccess {
                    model: model.to_string(),
                    image,
                    failed: attempts,
                });
            }
            Err(failure) => {
                warn!(model = %model, error = %failure, "Generation attempt failed");
                attempts.push(ModelAttempt {
                    model: model.to_string(),
                    reason: failure.to_string(),
                });
            }
        }
    }

    Err(AllModelsFailed { attempts })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted generator shared by orchestrator and runner tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::gemini::{GenerationFailure, GenerativeModel, ImageRequest, InlineImage};

    /// Answers per model from a script and records every request it sees.
    #[derive(Default)]
    pub struct ScriptedModel {
        images: HashMap<String, Result<InlineImage, GenerationFailure>>,
        texts: HashMap<String, Result<String, GenerationFailure>>,
        calls: Mutex<Vec<ImageRequest>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn image(mut self, model: &str, result: Result<InlineImage, GenerationFailure>) -> Self {
            self.images.insert(model.to_string(), result);
            self
        }

        pub fn text(mut self, model: &str, result: Result<String, GenerationFailure>) -> Self {
            self.texts.insert(model.to_string(), result);
            self
        }

        pub fn calls(&self) -> Vec<ImageRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate_image(
            &self,
            request: &ImageRequest,
        ) -> Result<InlineImage, GenerationFailure> {
            self.calls.lock().unwrap().push(request.clone());
            self.images
                .get(&request.model)
                .cloned()
                .unwrap_or(Err(GenerationFailure::NoCandidate))
        }

        async fn generate_text(&self, request: &ImageRequest) -> Result<String, GenerationFailure> {
            self.calls.lock().unwrap().push(request.clone());
            self.texts
                .get(&request.model)
                .cloned()
                .unwrap_or(Err(GenerationFailure::NoText))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::gemini::GenerationFailure;

    fn request() -> ImageRequest {
        ImageRequest::new("unset", "prompt", InlineImage::new("image/jpeg", "aW1n"))
            .with_temperature(0.4)
    }

    #[tokio::test]
    async fn test_second_model_wins_and_only_first_is_logged() {
        let model = ScriptedModel::new()
            .image("model-a", Err(GenerationFailure::NoImageData))
            .image("model-b", Ok(InlineImage::new("image/png", "Yg==")));

        let success = run_with_fallback(&model, &["model-a", "model-b"], &request())
            .await
            .unwrap();

        assert_eq!(success.model, "model-b");
        assert_eq!(success.image.data, "Yg==");
        assert_eq!(success.failed.len(), 1);
        assert_eq!(success.failed[0].model, "model-a");
        assert!(success.failed.iter().all(|a| a.model != "model-b"));
    }

    #[tokio::test]
    async fn test_first_success_stops_the_walk() {
        let model = ScriptedModel::new()
            .image("model-a", Ok(InlineImage::new("image/png", "YQ==")))
            .image("model-b", Ok(InlineImage::new("image/png", "Yg==")));

        let success = run_with_fallback(&model, &["model-a", "model-b"], &request())
            .await
            .unwrap();

        assert_eq!(success.model, "model-a");
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_all_fail_keeps_order() {
        let model = ScriptedModel::new()
            .image("model-a", Err(GenerationFailure::NoCandidate))
            .image(
                "model-b",
                Err(GenerationFailure::Http {
                    status: 500,
                    body: "backend down".into(),
                }),
            );

        let err = run_with_fallback(&model, &["model-a", "model-b"], &request())
            .await
            .unwrap_err();

        assert_eq!(err.attempts.len(), 2);
        assert_eq!(
            err.to_string(),
            "model-a: No candidates returned | model-b: backend down"
        );
    }

    #[tokio::test]
    async fn test_request_carried_to_each_model() {
        let model = ScriptedModel::new();
        let _ = run_with_fallback(&model, &["model-a", "model-b"], &request()).await;

        let calls = model.calls();
        assert_eq!(
            calls.iter().map(|c| c.model.as_str()).collect::<Vec<_>>(),
            vec!["model-a", "model-b"]
        );
        assert!(calls.iter().all(|c| c.temperature == Some(0.4)));
        assert!(calls.iter().all(|c| c.prompt == "prompt"));
    }

    #[tokio::test]
    async fn test_empty_model_list() {
        let model = ScriptedModel::new();
        let err = run_with_fallback(&model, &[], &request()).await.unwrap_err();
        assert!(err.attempts.is_empty());
        assert_eq!(err.to_string(), "no models configured");
        assert!(model.calls().is_empty());
    }
}
