//! preview-core - Core library for Smile Preview
//!
//! This crate holds everything behind the preview endpoints:
//!
//! - **prompts**: Treatment prompt templates and shade/style lookup tables
//! - **references**: Lazily loaded hair reference photos
//! - **gemini**: Generative call adapter for `generateContent`
//! - **fallback**: Ordered model fallback runner
//! - **source**: Source image fetching with type and size limits
//! - **transform**: Treatment orchestration (validate, fetch, prompt, generate)
//! - **photo_check**: Photo suitability check before a preview is requested

pub mod error;
pub mod fallback;
pub mod gemini;
pub mod photo_check;
pub mod prompts;
pub mod references;
pub mod source;
pub mod transform;

// Re-export commonly used types
pub use error::{Error, Result};
pub use gemini::{GeminiClient, GeminiConfig, GenerativeModel, InlineImage};
pub use transform::{TransformOutcome, TransformRequest, TransformService, Treatment};
