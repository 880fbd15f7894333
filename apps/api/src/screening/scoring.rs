//! Candidate scoring — pluggable, trait-based scorer for (name, qualities, text).
//!
//! `MockScorer` is deterministic and offline. `LlmScorer` asks the model service.
//! `UnavailableScorer` stands in when external scoring is configured without a
//! credential, so the failure surfaces per request rather than at startup.
//!
//! `AppState` holds an `Arc<dyn CandidateScorer>`, chosen at startup via config.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{ChatModel, LlmClient, LlmError, ResponseMode};
use crate::screening::models::{round2, ScoreMode, ScoreResult};
use crate::screening::prompts::{screening_prompt, screening_system};
use crate::screening::verdict::Verdict;

/// Implement this to swap scoring backends without touching the handler.
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    async fn score(
        &self,
        candidate_name: &str,
        qualities: &str,
        text: &str,
    ) -> Result<ScoreResult, AppError>;

    /// Short label for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the scorer named by `USE_LLM_SCORING`.
pub fn scorer_from_config(config: &Config) -> anyhow::Result<Arc<dyn CandidateScorer>> {
    if !config.use_llm_scoring {
        return Ok(Arc::new(MockScorer));
    }

    match &config.openai_api_key {
        Some(api_key) => {
            let client = LlmClient::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Ok(Arc::new(LlmScorer::new(
                Arc::new(client),
                config.max_chars_per_cv,
            )))
        }
        None => {
            warn!("USE_LLM_SCORING is on but OPENAI_API_KEY is not set; screening requests will fail");
            Ok(Arc::new(UnavailableScorer::new(
                "OPENAI_API_KEY not set on server.",
            )))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MockScorer
// ────────────────────────────────────────────────────────────────────────────

pub const MOCK_MIN_SCORE: f64 = 10.0;
pub const MOCK_MAX_SCORE: f64 = 100.0;

/// Reproducible pseudo-random score in [10, 100], seeded from name + qualities.
/// Ignores the document text.
pub struct MockScorer;

#[async_trait]
impl CandidateScorer for MockScorer {
    async fn score(
        &self,
        candidate_name: &str,
        qualities: &str,
        _text: &str,
    ) -> Result<ScoreResult, AppError> {
        Ok(ScoreResult {
            score: mock_score(candidate_name, qualities),
            reason: "(mock) seeded by file+qualities".to_string(),
            mode: ScoreMode::Mock,
        })
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

pub fn mock_score(candidate_name: &str, qualities: &str) -> f64 {
    let digest = Sha256::digest(format!("{candidate_name}:{qualities}").as_bytes());
    let seed = digest
        .iter()
        .take(8)
        .fold(0_u64, |acc, b| (acc << 8) | u64::from(*b));

    let mut rng = StdRng::seed_from_u64(seed);
    round2(rng.random_range(MOCK_MIN_SCORE..=MOCK_MAX_SCORE))
}

// ────────────────────────────────────────────────────────────────────────────
// LlmScorer
// ────────────────────────────────────────────────────────────────────────────

const ELISION_MARKER: &str = "\n...\n";

/// Scores by asking the model service, preferring structured-output mode.
pub struct LlmScorer {
    model: Arc<dyn ChatModel>,
    max_chars: usize,
}

impl LlmScorer {
    pub fn new(model: Arc<dyn ChatModel>, max_chars: usize) -> Self {
        Self { model, max_chars }
    }

    /// Structured output first; on a capability rejection, the same prompt in
    /// plain mode. Anything else propagates.
    async fn request_reply(&self, prompt: &str) -> Result<(String, ScoreMode), AppError> {
        let system = screening_system();

        match self
            .model
            .complete(&system, prompt, ResponseMode::JsonObject)
            .await
        {
            Ok(raw) => Ok((raw, ScoreMode::JsonMode)),
            Err(LlmError::UnsupportedResponseFormat(message)) => {
                info!("Structured output rejected ({message}); retrying in plain mode");
                let raw = self
                    .model
                    .complete(&system, prompt, ResponseMode::Plain)
                    .await?;
                Ok((raw, ScoreMode::Plain))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CandidateScorer for LlmScorer {
    async fn score(
        &self,
        candidate_name: &str,
        qualities: &str,
        text: &str,
    ) -> Result<ScoreResult, AppError> {
        let cv_text = truncate_for_model(text, self.max_chars);
        let prompt = screening_prompt(qualities, candidate_name, &cv_text);

        let (raw, mode) = self.request_reply(&prompt).await?;
        let verdict = Verdict::from_reply(candidate_name, &raw);

        Ok(ScoreResult {
            score: verdict.score,
            reason: verdict.reason,
            mode,
        })
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Keeps the head and tail halves of over-budget text around an elision marker.
/// Budget is counted in characters, never splitting one.
pub fn truncate_for_model(text: &str, max_chars: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }

    let half = max_chars / 2;
    let head_end = text.char_indices().nth(half).map_or(text.len(), |(i, _)| i);
    let tail_start = text
        .char_indices()
        .nth(total - half)
        .map_or(text.len(), |(i, _)| i);

    Cow::Owned(format!(
        "{}{ELISION_MARKER}{}",
        &text[..head_end],
        &text[tail_start..]
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// UnavailableScorer
// ────────────────────────────────────────────────────────────────────────────

/// Fails every call with a configuration error (HTTP 500).
pub struct UnavailableScorer {
    reason: String,
}

impl UnavailableScorer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CandidateScorer for UnavailableScorer {
    async fn score(&self, _: &str, _: &str, _: &str) -> Result<ScoreResult, AppError> {
        Err(AppError::ScorerUnavailable(self.reason.clone()))
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
