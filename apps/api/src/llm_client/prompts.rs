// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond ONLY with a compact JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include any text outside the JSON object.";
