//! Prompt library.
//!
//! Static prompt text per treatment plus the shade/style lookup tables the
//! teeth prompt is composed from. Hair prompts support `{{TOKEN}}`
//! substitution through [`render_template`].

mod hair;
mod photo;
mod teeth;

pub use hair::{HairPromptContext, HairView, hair_base_prompt, hair_control_prompt};
pub use photo::photo_check_prompt;
pub use teeth::{
    SHADES, STYLES, describe_shade, describe_style, is_valid_shade, is_valid_style, teeth_prompt,
};

/// Replace every `{{NAME}}` placeholder whose name appears in `tokens`.
///
/// Placeholders without a matching token are left untouched.
pub fn render_template(template: &str, tokens: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after_open[..end].trim();
        match tokens.iter().find(|(token, _)| *token == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                tracing::debug!(placeholder = %name, "Unresolved prompt placeholder");
                out.push_str(&rest[start..start + 2 + end + 2]);
            }
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_known_tokens() {
        let rendered = render_template(
            "View: {{VIEW_ANGLE}}, target {{TARGET_DENSITY}}.",
            &[("VIEW_ANGLE", "top"), ("TARGET_DENSITY", "dense")],
        );
        assert_eq!(rendered, "View: top, target dense.");
    }

    #[test]
    fn test_render_repeated_token() {
        let rendered = render_template("{{A}}-{{A}}", &[("A", "x")]);
        assert_eq!(rendered, "x-x");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let rendered = render_template("keep {{OTHER}} here", &[("A", "x")]);
        assert_eq!(rendered, "keep {{OTHER}} here");
    }

    #[test]
    fn test_render_tolerates_whitespace_in_placeholder() {
        let rendered = render_template("{{ A }}", &[("A", "x")]);
        assert_eq!(rendered, "x");
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        let rendered = render_template("open {{A and more", &[("A", "x")]);
        assert_eq!(rendered, "open {{A and more");
    }

    #[test]
    fn test_render_without_placeholders() {
        assert_eq!(render_template("plain text", &[]), "plain text");
    }
}
