use serde_json::{json, Value};
use std::fmt::Write;

use super::{SelectionRequest, MAX_TAGS, MIN_TAGS};

pub static SELECTION_SYSTEM_PROMPT: &str = r#"
  You are a film programmer for an app that suggests exactly one video to watch right now.

  INPUT: The viewer's moods, how many minutes they have, and a numbered list of candidate
  videos with their id, title, channel, duration and the start of their description.

  TASK:
  1. Pick the single candidate that best fits the moods
  2. Prefer a duration close to the viewer's target
  3. Prefer hidden gems over generic viral hits
  4. Prefer something the viewer has likely not seen already

  OUTPUT: Return ONLY valid JSON:
  {
    "selectedVideoId": "the id of the chosen candidate, copied exactly",
    "tags": ["3 to 5 short descriptive tags"],
    "summary": "One paragraph of 3-4 sentences on why this video fits right now"
  }

  RULES:
  - selectedVideoId must be one of the listed ids
  - Do not invent videos that are not in the list
"#;

/// Renders the user message: the viewer's intent followed by the numbered
/// candidate listing
pub fn build_user_prompt(request: &SelectionRequest) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Moods: {}", request.moods.join(", "));
    let _ = writeln!(
        prompt,
        "Time available: about {} minutes. Closer to that is better.",
        request.target_minutes
    );
    let _ = writeln!(
        prompt,
        "Look for a hidden gem they probably haven't seen, not a generic viral hit."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Candidates:");

    for candidate in &request.candidates {
        let _ = writeln!(
            prompt,
            "{}. [{}] \"{}\" by {} ({})",
            candidate.index,
            candidate.video_id,
            candidate.title,
            candidate.channel_title,
            candidate.duration
        );
        let description = candidate.description.replace('\n', " ");
        let description = description.trim();
        if !description.is_empty() {
            let _ = writeln!(prompt, "   {}", description);
        }
    }

    prompt
}

/// JSON schema for the structured-output response format
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "selectedVideoId": {
                "type": "string",
                "description": "Id of the chosen candidate"
            },
            "tags": {
                "type": "array",
                "items": { "type": "string" },
                "description": format!("{} to {} short descriptive tags", MIN_TAGS, MAX_TAGS)
            },
            "summary": {
                "type": "string",
                "description": "One paragraph of 3-4 sentences"
            }
        },
        "required": ["selectedVideoId", "tags", "summary"],
        "additionalProperties": false
    })
}
