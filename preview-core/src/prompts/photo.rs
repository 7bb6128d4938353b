//! Photo suitability prompts.

use crate::transform::Treatment;

const REPLY_FORMAT: &str = "
Analyze the photo and respond ONLY with a JSON object:
{
  \"isValid\": true or false,
  \"confidence\": number between 0.0 and 1.0,
  \"reason\": \"brief explanation\",
  \"issues\": [\"list of issues, empty when valid\"]
}";

const TEETH_CHECK_PROMPT: &str = "\
You check whether a photo is technically usable for an AI teeth preview.
Be reasonable: reject only for serious problems.

Required:
1. The full face is visible: eyes, nose and mouth are all in frame.
2. At least six upper front teeth are clearly visible.
3. The person is upright and facing the camera (up to about 30 degrees is fine).
4. The face is large enough in the frame to see individual teeth.

Reject, with the matching issue, when:
- only the mouth is shown: \"close-up of mouth only - need full face photo\"
- the eyes are cut off: \"eyes not visible - need full face photo\"
- lips are closed or teeth barely show: \"teeth not visible - please show a smile with teeth\"
- the person is far away: \"photo taken from too far - please take a closer photo\"
- the person is lying down: \"please take photo while standing or sitting upright\"
- the face is in profile: \"please look straight at the camera\"
- the photo is too blurry or dark: \"photo quality too low - please take a clearer photo\"

Never reject for a wide or exaggerated smile, small gaps, crooked or discolored teeth,
imperfect lighting or strong expressions. Imperfect teeth are what the preview fixes.";

const HAIR_CHECK_PROMPT: &str = "\
You check whether a photo is technically usable for an AI hair restoration preview.
Be reasonable: reject only for serious problems.

Required:
1. The full face is visible: eyes, nose and forehead are all in frame.
2. The frontal hairline is clearly visible and not covered.
3. Nothing covers the head: no hat, cap, scarf or similar.
4. The person is upright and facing the camera (up to about 30 degrees is fine).
5. The head is large enough in the frame to see hairline details.

Reject, with the matching issue, when:
- the head is covered: \"head covering detected - please remove hat or cap\"
- the forehead is hidden or cut off: \"forehead not visible - please show your hairline\"
- no face is visible: \"face not visible - need frontal photo\"
- only the scalp is shown: \"need full face photo with hairline visible\"
- the person is far away: \"photo taken from too far - please take a closer photo\"
- the person is lying down: \"please take photo while standing or sitting upright\"
- the face is in profile: \"please look straight at the camera\"
- the photo is too blurry or dark: \"photo quality too low - please take a clearer photo\"

Never reject for baldness, a receding hairline, thin hair, visible scalp, glasses,
imperfect lighting or any expression. Hair loss is what the preview simulates.";

pub fn photo_check_prompt(treatment: Treatment) -> String {
    let body = match treatment {
        Treatment::Teeth => TEETH_CHECK_PROMPT,
        Treatment::Hair => HAIR_CHECK_PROMPT,
    };
    format!("{body}\n{REPLY_FORMAT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_differ_per_treatment() {
        let teeth = photo_check_prompt(Treatment::Teeth);
        let hair = photo_check_prompt(Treatment::Hair);

        assert!(teeth.contains("front teeth"));
        assert!(hair.contains("hairline"));
        assert!(teeth.contains("\"isValid\""));
        assert!(hair.contains("\"isValid\""));
    }
}
