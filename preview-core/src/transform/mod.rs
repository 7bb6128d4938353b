//! Treatment orchestration.
//!
//! A transform moves through these stages:
//!
//! ```text
//! ValidatingInput -> FetchingSourceImage -> BuildingPrompt
//!     -> TeethSinglePass                    -> Done
//!     -> HairBasePass -> HairControlPass    -> Done
//! ```
//!
//! Any stage can fail. Validation and fetch failures happen before any
//! generation call. A generation stage fails only after its whole model list
//! is exhausted, and a failed hair base pass ends the transform without a
//! control pass.

mod plan;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::fallback::run_with_fallback;
use crate::gemini::{GenerativeModel, ImageRequest, InlineImage};
use crate::prompts::{HairView, hair_base_prompt, hair_control_prompt, teeth_prompt};
use crate::references::ReferenceLibrary;
use crate::source::{ImageSource, default_allowed_domains, validate_image_url};

pub use plan::{TreatmentPlan, models_for, temperature_for};

/// Which cosmetic simulation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    Teeth,
    Hair,
}

impl Treatment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Treatment::Teeth => "teeth",
            Treatment::Hair => "hair",
        }
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Treatment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "teeth" => Ok(Treatment::Teeth),
            "hair" => Ok(Treatment::Hair),
            _ => Err(Error::invalid_input(
                "Invalid treatment type. Must be \"teeth\" or \"hair\"",
            )),
        }
    }
}

/// Generation pass within a transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Pass {
    TeethSingle,
    HairBase,
    HairControl,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pass::TeethSingle => "teeth",
            Pass::HairBase => "hair-base",
            Pass::HairControl => "hair-control",
        };
        f.write_str(name)
    }
}

/// Orchestrator stage, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformStage {
    ValidatingInput,
    FetchingSourceImage,
    BuildingPrompt,
    Generating(Pass),
    Done,
}

/// Incoming transform request, as posted by the site
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub image_url: Option<String>,
    pub treatment_type: Option<String>,
    pub teeth_shade: Option<String>,
    pub teeth_style: Option<String>,
    /// Hair only; feeds the control pass view angle
    pub hair_view: Option<String>,
}

/// Model that produced each pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub pass: Pass,
    pub model: String,
}

/// Successful transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    pub treatment: Treatment,
    /// Final image as a data URI
    pub transformed_url: String,
    pub passes: Vec<PassReport>,
}

/// Validated request, ready to run
#[derive(Debug, Clone)]
struct ValidatedRequest {
    url: Url,
    plan: TreatmentPlan,
}

/// Runs treatments end to end
pub struct TransformService {
    generator: Option<Arc<dyn GenerativeModel>>,
    source: Arc<dyn ImageSource>,
    references: Arc<ReferenceLibrary>,
    allowed_domains: Vec<String>,
}

impl TransformService {
    /// Create a service. A `None` generator means no API key is configured;
    /// every transform then fails with a configuration error after validation.
    pub fn new(
        generator: Option<Arc<dyn GenerativeModel>>,
        source: Arc<dyn ImageSource>,
        references: Arc<ReferenceLibrary>,
    ) -> Self {
        Self {
            generator,
            source,
            references,
            allowed_domains: default_allowed_domains(),
        }
    }

    pub fn with_allowed_domains(mut self, allowed_domains: Vec<String>) -> Self {
        self.allowed_domains = allowed_domains;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn references(&self) -> &ReferenceLibrary {
        &self.references
    }

    fn enter(&self, stage: TransformStage) {
        debug!(stage = ?stage, "Transform stage");
    }

    fn validate(&self, request: &TransformRequest) -> Result<ValidatedRequest> {
        let url = validate_image_url(request.image_url.as_deref(), &self.allowed_domains)?;

        let treatment: Treatment = request.treatment_type.as_deref().unwrap_or("").parse()?;
        let plan = TreatmentPlan::from_request(treatment, request)?;

        Ok(ValidatedRequest { url, plan })
    }

    /// Validate, fetch, build prompts and generate.
    pub async fn transform(&self, request: &TransformRequest) -> Result<TransformOutcome> {
        self.enter(TransformStage::ValidatingInput);
        let validated = self.validate(request)?;
        let treatment = validated.plan.treatment();

        let generator = self
            .generator
            .as_deref()
            .ok_or_else(|| Error::configuration("No image generation API is configured"))?;

        let references = match treatment {
            Treatment::Hair => self.references.load().await?.as_ref().clone(),
            Treatment::Teeth => Vec::new(),
        };

        self.enter(TransformStage::FetchingSourceImage);
        let source = self.source.fetch(&validated.url).await?;
        let image = source.to_inline();

        self.enter(TransformStage::BuildingPrompt);
        info!(treatment = %treatment, bytes = source.bytes.len(), "Transforming image");

        let (image, passes) = match &validated.plan {
            TreatmentPlan::Teeth { shade, style } => {
                let prompt = teeth_prompt(shade.as_deref(), style.as_deref());
                self.enter(TransformStage::Generating(Pass::TeethSingle));
                let (image, report) =
                    run_pass(generator, Pass::TeethSingle, prompt, image, Vec::new()).await?;
                (image, vec![report])
            }
            TreatmentPlan::Hair { context } => {
                self.enter(TransformStage::Generating(Pass::HairBase));
                let (base, base_report) = run_pass(
                    generator,
                    Pass::HairBase,
                    hair_base_prompt().to_string(),
                    image,
                    references.clone(),
                )
                .await?;

                self.enter(TransformStage::Generating(Pass::HairControl));
                let (controlled, control_report) = run_pass(
                    generator,
                    Pass::HairControl,
                    hair_control_prompt(context),
                    base,
                    references,
                )
                .await?;
                (controlled, vec![base_report, control_report])
            }
        };

        self.enter(TransformStage::Done);
        Ok(TransformOutcome {
            treatment,
            transformed_url: output_data_uri(&image),
            passes,
        })
    }
}

async fn run_pass(
    generator: &dyn GenerativeModel,
    pass: Pass,
    prompt: String,
    image: InlineImage,
    references: Vec<InlineImage>,
) -> Result<(InlineImage, PassReport)> {
    let request = ImageRequest::new("", prompt, image)
        .with_temperature(temperature_for(pass))
        .with_references(references);

    let success = run_with_fallback(generator, models_for(pass), &request).await?;
    debug!(pass = %pass, model = %success.model, "Pass complete");

    Ok((
        success.image,
        PassReport {
            pass,
            model: success.model,
        },
    ))
}

/// Data URI for the final image; PNG unless the model said otherwise.
fn output_data_uri(image: &InlineImage) -> String {
    let mime_type = if image.mime_type.starts_with("image/") {
        image.mime_type.as_str()
    } else {
        "image/png"
    };
    format!("data:{};base64,{}", mime_type, image.data)
}

/// Parse the optional hair view field
fn parse_hair_view(raw: Option<&str>) -> Result<HairView> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(view) => view.parse(),
        None => Ok(HairView::default()),
    }
}
