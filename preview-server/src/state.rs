//! Application state.

use std::sync::Arc;
use std::time::Instant;

use preview_core::photo_check::PhotoChecker;
use preview_core::references::ReferenceLibrary;
use preview_core::source::{HttpImageSource, ImageSource};
use preview_core::{GeminiClient, GeminiConfig, GenerativeModel, TransformService};
use tracing::warn;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Treatment orchestrator
    pub transform: TransformService,
    pub photo_check: PhotoChecker,
    /// Source image fetcher, shared with the image proxy
    pub source: Arc<dyn ImageSource>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Build production state: Gemini client when a key is configured, HTTP image source
    pub fn new(config: Config) -> preview_core::Result<Arc<Self>> {
        let generator = match config.gemini_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                let mut gemini = GeminiConfig::new(key);
                if let Some(base) = &config.gemini_api_base {
                    gemini = gemini.with_api_base(base);
                }
                Some(Arc::new(GeminiClient::new(gemini)?) as Arc<dyn GenerativeModel>)
            }
            None => {
                warn!("GEMINI_API_KEY is not set; transform and photo check requests will fail");
                None
            }
        };

        let source: Arc<dyn ImageSource> = Arc::new(HttpImageSource::new()?);
        Ok(Self::with_parts(config, generator, source))
    }

    /// Build state from explicit parts
    pub fn with_parts(
        config: Config,
        generator: Option<Arc<dyn GenerativeModel>>,
        source: Arc<dyn ImageSource>,
    ) -> Arc<Self> {
        let references = Arc::new(ReferenceLibrary::new(config.references_dir.clone()));
        let transform = TransformService::new(generator.clone(), Arc::clone(&source), references)
            .with_allowed_domains(config.allowed_domains.clone());

        Arc::new(Self {
            config: Arc::new(config),
            transform,
            photo_check: PhotoChecker::new(generator),
            source,
            start_time: Instant::now(),
        })
    }
}
