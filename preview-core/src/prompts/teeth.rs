//! Teeth enhancement prompt and shade/style tables.

const TEETH_BASE_PROMPT: &str = "\
Enhance only the teeth of the person in this photo.

Goals:
- Straighten and align the teeth so they look naturally shaped.
- Whiten the teeth to a professional yet believable shade.
- Improve symmetry and surface finish while keeping natural enamel texture.

Strict rules:
- Do NOT change the face, lips, eyes, skin tone or expression.
- Do NOT change the mouth position or the width of the smile.
- Do NOT touch the hair, background, clothing or lighting.
- Avoid teeth that look glowing, plastic or unnaturally bright.

Target look:
- A realistic result from a high-end dental clinic, photographed after treatment.";

/// Shade code to descriptive phrase.
pub const SHADES: &[(&str, &str)] = &[
    ("0M1", "the ultra bright 0M1 bleach shade"),
    ("0M2", "the vibrant 0M2 bleach shade"),
    ("0M3", "the natural-looking 0M3 bleach shade"),
    ("A1", "the A1 warm reddish-brown shade"),
    ("A2", "the A2 balanced natural shade"),
    ("A3", "the A3 everyday natural shade"),
    ("A3.5", "the A3.5 deeper natural shade"),
    ("A4", "the A4 rich brownish shade"),
    ("B1", "the B1 bright yellowish shade"),
    ("B2", "the B2 creamy yellowish shade"),
    ("B3", "the B3 honey yellowish shade"),
    ("B4", "the B4 golden yellowish shade"),
    ("C1", "the C1 soft grey shade"),
    ("C2", "the C2 medium grey shade"),
    ("C3", "the C3 deep grey shade"),
    ("C4", "the C4 charcoal grey shade"),
    ("D2", "the D2 cool reddish-grey shade"),
    ("D3", "the D3 medium reddish-grey shade"),
    ("D4", "the D4 deep reddish-grey shade"),
];

/// Style code to descriptive phrase.
pub const STYLES: &[(&str, &str)] = &[
    ("AggressiveStyle", "aggressive style with bold incisal edges"),
    ("DominantStyle", "dominant style with pronounced central incisors"),
    ("EnhancedStyle", "enhanced style with refined contours"),
    ("FocusedStyle", "focused style emphasizing symmetry"),
    ("FunctionalStyle", "functional style with practical contours"),
    ("HollywoodStyle", "Hollywood style full, glamorous veneers"),
    ("MatureStyle", "mature style with softened anatomy"),
    ("NaturalStyle", "natural style with gentle texture"),
    ("OvalStyle", "oval style with rounded corners"),
    ("SoftenedStyle", "softened style with subtle transitions"),
    ("VigorousStyle", "vigorous style with energetic shapes"),
    ("YouthfulStyle", "youthful style with playful curvature"),
];

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, phrase)| *phrase)
}

pub fn describe_shade(code: &str) -> Option<&'static str> {
    lookup(SHADES, code)
}

pub fn describe_style(code: &str) -> Option<&'static str> {
    lookup(STYLES, code)
}

pub fn is_valid_shade(code: &str) -> bool {
    describe_shade(code).is_some()
}

pub fn is_valid_style(code: &str) -> bool {
    describe_style(code).is_some()
}

/// Compose the teeth prompt, appending shade and style settings when given.
///
/// Codes are rendered through their table phrase; a code missing from the
/// table falls back to the raw code. Callers validate codes beforehand, so
/// the fallback only matters for direct library use.
pub fn teeth_prompt(shade: Option<&str>, style: Option<&str>) -> String {
    let mut prompt = TEETH_BASE_PROMPT.to_string();

    if shade.is_none() && style.is_none() {
        return prompt;
    }

    prompt.push_str("\n\nApply the following specific settings:\n");
    if let Some(code) = shade {
        let phrase = describe_shade(code).unwrap_or(code);
        prompt.push_str(&format!("- Tooth shade: {phrase} (shade code: {code}).\n"));
    }
    if let Some(code) = style {
        let phrase = describe_style(code).unwrap_or(code);
        prompt.push_str(&format!("- Tooth style: {phrase} (style code: {code}).\n"));
    }
    prompt.push_str("\nEnsure the results remain natural and clinically realistic.\n");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shade_phrase_in_prompt() {
        for (code, phrase) in SHADES {
            let prompt = teeth_prompt(Some(*code), None);
            assert!(prompt.contains(phrase), "missing phrase for {code}");
            assert!(prompt.contains(&format!("(shade code: {code})")));
        }
    }

    #[test]
    fn test_every_style_phrase_in_prompt() {
        for (code, phrase) in STYLES {
            let prompt = teeth_prompt(None, Some(*code));
            assert!(prompt.contains(phrase), "missing phrase for {code}");
            assert!(prompt.contains(&format!("(style code: {code})")));
        }
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(SHADES.len(), 19);
        assert_eq!(STYLES.len(), 12);
    }

    #[test]
    fn test_plain_prompt_has_no_settings_block() {
        let prompt = teeth_prompt(None, None);
        assert!(prompt.starts_with("Enhance only the teeth"));
        assert!(!prompt.contains("Apply the following specific settings"));
    }

    #[test]
    fn test_shade_and_style_together() {
        let prompt = teeth_prompt(Some("A2"), Some("HollywoodStyle"));
        let shade_at = prompt.find("Tooth shade").unwrap();
        let style_at = prompt.find("Tooth style").unwrap();
        assert!(shade_at < style_at);
        assert!(prompt.ends_with("clinically realistic.\n"));
    }

    #[test]
    fn test_unmapped_code_falls_back_to_raw() {
        let prompt = teeth_prompt(Some("Z9"), None);
        assert!(prompt.contains("- Tooth shade: Z9 (shade code: Z9)."));
    }

    #[test]
    fn test_validity_checks() {
        assert!(is_valid_shade("A3.5"));
        assert!(!is_valid_shade("a3.5"));
        assert!(is_valid_style("OvalStyle"));
        assert!(!is_valid_style("Oval"));
    }
}
