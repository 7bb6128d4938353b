//! Per-treatment plans: validated parameters, model order and temperatures.

use super::{Pass, TransformRequest, Treatment, parse_hair_view};
use crate::error::{Error, Result};
use crate::prompts::{HairPromptContext, is_valid_shade, is_valid_style};

/// Faster model first; teeth edits are small.
const TEETH_MODELS: &[&str] = &["gemini-2.5-flash-image", "gemini-3-pro-image-preview"];

/// Higher capability model first; hair fill needs it.
const HAIR_MODELS: &[&str] = &["gemini-3-pro-image-preview", "gemini-2.5-flash-image"];

const TEETH_TEMPERATURE: f32 = 0.4;
const HAIR_BASE_TEMPERATURE: f32 = 0.5;
const HAIR_CONTROL_TEMPERATURE: f32 = 0.65;

/// Ordered model list for a pass
pub fn models_for(pass: Pass) -> &'static [&'static str] {
    match pass {
        Pass::TeethSingle => TEETH_MODELS,
        Pass::HairBase | Pass::HairControl => HAIR_MODELS,
    }
}

pub fn temperature_for(pass: Pass) -> f32 {
    match pass {
        Pass::TeethSingle => TEETH_TEMPERATURE,
        Pass::HairBase => HAIR_BASE_TEMPERATURE,
        Pass::HairControl => HAIR_CONTROL_TEMPERATURE,
    }
}

/// Validated treatment parameters
#[derive(Debug, Clone, PartialEq)]
pub enum TreatmentPlan {
    Teeth {
        shade: Option<String>,
        style: Option<String>,
    },
    Hair {
        context: HairPromptContext,
    },
}

impl TreatmentPlan {
    /// Validate the treatment specific fields of a request.
    ///
    /// Teeth shade and style must be known codes. Hair ignores them.
    pub fn from_request(treatment: Treatment, request: &TransformRequest) -> Result<Self> {
        match treatment {
            Treatment::Teeth => {
                let shade = non_empty(request.teeth_shade.as_deref());
                let style = non_empty(request.teeth_style.as_deref());

                if let Some(code) = shade {
                    if !is_valid_shade(code) {
                        return Err(Error::invalid_input("Invalid teeth shade value"));
                    }
                }
                if let Some(code) = style {
                    if !is_valid_style(code) {
                        return Err(Error::invalid_input("Invalid teeth style value"));
                    }
                }

                Ok(TreatmentPlan::Teeth {
                    shade: shade.map(str::to_string),
                    style: style.map(str::to_string),
                })
            }
            Treatment::Hair => {
                let view = parse_hair_view(request.hair_view.as_deref())?;
                Ok(TreatmentPlan::Hair {
                    context: HairPromptContext::default().with_view(view),
                })
            }
        }
    }

    pub fn treatment(&self) -> Treatment {
        match self {
            TreatmentPlan::Teeth { .. } => Treatment::Teeth,
            TreatmentPlan::Hair { .. } => Treatment::Hair,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::HairView;

    fn request(shade: Option<&str>, style: Option<&str>) -> TransformRequest {
        TransformRequest {
            teeth_shade: shade.map(str::to_string),
            teeth_style: style.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_model_order_per_treatment() {
        assert_eq!(models_for(Pass::TeethSingle)[0], "gemini-2.5-flash-image");
        assert_eq!(models_for(Pass::HairBase)[0], "gemini-3-pro-image-preview");
        assert_eq!(models_for(Pass::HairControl), models_for(Pass::HairBase));
    }

    #[test]
    fn test_temperatures() {
        assert!(temperature_for(Pass::TeethSingle) < temperature_for(Pass::HairControl));
        assert!(temperature_for(Pass::HairBase) < temperature_for(Pass::HairControl));
    }

    #[test]
    fn test_teeth_accepts_known_codes() {
        let plan =
            TreatmentPlan::from_request(Treatment::Teeth, &request(Some("B2"), Some("OvalStyle")))
                .unwrap();
        assert_eq!(
            plan,
            TreatmentPlan::Teeth {
                shade: Some("B2".into()),
                style: Some("OvalStyle".into())
            }
        );
    }

    #[test]
    fn test_teeth_rejects_unknown_codes() {
        let err = TreatmentPlan::from_request(Treatment::Teeth, &request(Some("Z1"), None))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid teeth shade value");

        let err = TreatmentPlan::from_request(Treatment::Teeth, &request(None, Some("Wavy")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid teeth style value");
    }

    #[test]
    fn test_teeth_empty_codes_are_absent() {
        let plan =
            TreatmentPlan::from_request(Treatment::Teeth, &request(Some(""), Some(""))).unwrap();
        assert_eq!(
            plan,
            TreatmentPlan::Teeth {
                shade: None,
                style: None
            }
        );
    }

    #[test]
    fn test_hair_ignores_teeth_fields() {
        let plan =
            TreatmentPlan::from_request(Treatment::Hair, &request(Some("Z1"), Some("Wavy")))
                .unwrap();
        assert_eq!(plan.treatment(), Treatment::Hair);
    }

    #[test]
    fn test_hair_view() {
        let mut req = request(None, None);
        req.hair_view = Some("top".into());
        let plan = TreatmentPlan::from_request(Treatment::Hair, &req).unwrap();
        match plan {
            TreatmentPlan::Hair { context } => assert_eq!(context.view, HairView::Top),
            other => panic!("unexpected plan {other:?}"),
        }

        req.hair_view = Some("upside-down".into());
        assert!(TreatmentPlan::from_request(Treatment::Hair, &req).is_err());
    }
}
