//! Tolerant recovery of a JSON object from free-form model output.
//!
//! Models asked for "JSON only" still wrap replies in code fences or add a
//! sentence before or after the object. These helpers peel that off before
//! handing the text to serde.

use serde::de::DeserializeOwned;

/// Strips a leading ```` ``` ```` fence (with optional language tag) and a
/// trailing fence from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest
        .trim_start_matches(|c: char| c.is_alphanumeric() || c == '_' || c == '-')
        .trim();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

/// Narrows text to the span between the first `{` and the last `}`.
/// Returns the input unchanged when no such span exists.
pub fn slice_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Fence-strips, slices and parses model output as `T`.
pub fn coerce_json<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(slice_json_object(strip_json_fences(raw)))
}
