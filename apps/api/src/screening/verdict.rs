//! Turning a raw model reply into a bounded score and rationale.

use serde_json::Value;
use tracing::warn;

use crate::llm_client::json::coerce_json;
use crate::screening::models::round2;

/// Score used when the model's reply cannot be parsed.
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const PARSE_ERROR_REASON: &str = "Parse error; defaulted to 50.";

const RAW_LOG_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: f64, // 0 – 100
    pub reason: String,
}

impl Verdict {
    /// Parses a model reply, degrading to the neutral score on any failure.
    pub fn from_reply(candidate_name: &str, raw: &str) -> Self {
        match parse_verdict(raw) {
            Ok(verdict) => verdict,
            Err(e) => {
                let head: String = raw.chars().take(RAW_LOG_CHARS).collect();
                warn!("[{candidate_name}] JSON parse error: {e}. Raw: {head}");
                Self::neutral()
            }
        }
    }

    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            reason: PARSE_ERROR_REASON.to_string(),
        }
    }
}

/// Pure parse: recovers the JSON object, reads `score` and `reason`, then
/// rounds and clamps the score into [0, 100].
///
/// A missing `score` counts as the neutral score; numeric strings are accepted.
/// An explicit `null` score is a parse failure.
pub fn parse_verdict(raw: &str) -> Result<Verdict, String> {
    let value: Value = coerce_json(raw).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| format!("expected a JSON object, got {value}"))?;

    let score = match object.get("score") {
        None => NEUTRAL_SCORE,
        Some(Value::Null) => return Err("score is null".to_string()),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("score {n} is not representable"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("score {s:?} is not a number: {e}"))?,
        Some(other) => return Err(format!("score has unexpected type: {other}")),
    };
    if !score.is_finite() {
        return Err(format!("score {score} is not finite"));
    }

    let reason = match object.get("reason") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    Ok(Verdict {
        score: round2(score).clamp(0.0, 100.0),
        reason,
    })
}
