//! Hair restoration prompts.
//!
//! Hair runs in two passes. The base pass inpaints thinning regions; the
//! control pass takes the base output and corrects color and geometry for
//! the photographed view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::render_template;
use crate::error::Error;

const HAIR_BASE_PROMPT: &str = "\
Role: Clinical hair restoration simulator.

Task: Inpaint the thinning and balding regions of the scalp in this photo to show \
the subject 6 to 9 months after a successful hair transplant.

Fill rules:
- Add individual strands only where the scalp shows through; leave dense areas alone.
- Take hair color, grey ratio and curl pattern from the subject's existing side hair \
and match it exactly.
- Keep the original hairline shape, softened with fine, shorter baby hairs at the edge.
- Layer new strands over each other so the hair has real depth and casts small \
shadows on the scalp.

Reference photos follow the subject photo: a patient before surgery, during the \
operation and after growth. Use them only as a guide for realistic density and \
growth direction, never copy their face or hair color.

Constraints:
- Modify only the hair. Face, skin, forehead, ears and background stay untouched.
- No smoothing, blurring or painted blocks of color; every addition is a distinct strand.";

const HAIR_CONTROL_PROMPT: &str = "\
Role: Clinical hair restoration simulator, color and geometry control pass.

The input photo already shows restored hair. Refine it so it reads as a real \
photograph of the same person.

View angle: {{VIEW_ANGLE}}.
Density before treatment: {{CURRENT_DENSITY}}.
Target density: {{TARGET_DENSITY}}.

Control rules:
- Re-anchor hair color to the subject's existing side hair; remove any color drift \
introduced in the restored areas.
- Correct growth direction for the view angle: keep the crown whorl from the top, \
connect temples to the sides in profile, keep donor density consistent from the back.
- Bring the restored regions to the target density without exceeding it.
- Keep the hairline geometry from the input photo; only soften its edge.

Use the reference photos as a density and direction guide only.

Constraints:
- Modify only the hair. Face, skin, forehead, ears and background stay untouched.
- No smoothing, blurring or painted blocks of color.";

/// Camera view of the subject, fed into `{{VIEW_ANGLE}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairView {
    #[default]
    Front,
    Top,
    Side,
    Back,
}

impl HairView {
    pub fn as_str(&self) -> &'static str {
        match self {
            HairView::Front => "front",
            HairView::Top => "top",
            HairView::Side => "side",
            HairView::Back => "back",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            HairView::Front => "front, facing the camera with the hairline visible",
            HairView::Top => "top/vertex, looking down on the crown",
            HairView::Side => "side profile, temples and side hair visible",
            HairView::Back => "back of the head, donor area visible",
        }
    }
}

impl fmt::Display for HairView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HairView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(HairView::Front),
            "top" => Ok(HairView::Top),
            "side" => Ok(HairView::Side),
            "back" => Ok(HairView::Back),
            other => Err(Error::invalid_input(format!(
                "Invalid hair view '{other}'. Must be one of front, top, side, back"
            ))),
        }
    }
}

/// Token values for the control pass template.
#[derive(Debug, Clone, PartialEq)]
pub struct HairPromptContext {
    pub view: HairView,
    pub current_density: String,
    pub target_density: String,
}

impl Default for HairPromptContext {
    fn default() -> Self {
        Self {
            view: HairView::Front,
            current_density: "thinning with visible scalp".to_string(),
            target_density: "full natural density of 60-80 follicular units per cm2".to_string(),
        }
    }
}

impl HairPromptContext {
    pub fn with_view(mut self, view: HairView) -> Self {
        self.view = view;
        self
    }
}

pub fn hair_base_prompt() -> &'static str {
    HAIR_BASE_PROMPT
}

pub fn hair_control_prompt(context: &HairPromptContext) -> String {
    render_template(
        HAIR_CONTROL_PROMPT,
        &[
            ("VIEW_ANGLE", context.view.describe()),
            ("CURRENT_DENSITY", context.current_density.as_str()),
            ("TARGET_DENSITY", context.target_density.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_prompt_anchors_color_to_side_hair() {
        let prompt = hair_base_prompt();
        assert!(prompt.contains("Inpaint"));
        assert!(prompt.contains("existing side hair"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_control_prompt_substitutes_all_tokens() {
        let context = HairPromptContext {
            view: HairView::Top,
            current_density: "sparse crown".into(),
            target_density: "dense crown".into(),
        };
        let prompt = hair_control_prompt(&context);

        assert!(prompt.contains("top/vertex"));
        assert!(prompt.contains("Density before treatment: sparse crown."));
        assert!(prompt.contains("Target density: dense crown."));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_default_context_is_front_view() {
        let prompt = hair_control_prompt(&HairPromptContext::default());
        assert!(prompt.contains("View angle: front"));
    }

    #[test]
    fn test_hair_view_parse() {
        assert_eq!("side".parse::<HairView>().unwrap(), HairView::Side);
        assert_eq!(HairView::Back.to_string(), "back");
        assert!("diagonal".parse::<HairView>().is_err());
    }
}
