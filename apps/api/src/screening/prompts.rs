// Prompt constants for candidate screening.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

const SCREENER_ROLE: &str = "You are a careful recruiting screener. \
    Given a list of desired qualities and a single CV's text, judge the fit. \
    The JSON object must look like {\"score\": <number 0-100>, \"reason\": \"why the score\"}.";

/// System instruction sent with every screening call.
pub fn screening_system() -> String {
    format!("{SCREENER_ROLE} {JSON_ONLY_INSTRUCTION}")
}

/// User message for one candidate. `cv_text` should already be truncated.
pub fn screening_prompt(qualities: &str, candidate_name: &str, cv_text: &str) -> String {
    format!(
        "Qualities (one per line):\n{qualities}\n\n\
         Candidate: {candidate_name}\n\
         CV (truncated if long):\n{cv_text}\n"
    )
}
