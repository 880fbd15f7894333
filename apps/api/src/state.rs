use std::sync::Arc;

use crate::screening::scoring::CandidateScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable candidate scorer. Mock or LLM, chosen via USE_LLM_SCORING.
    pub scorer: Arc<dyn CandidateScorer>,
}
