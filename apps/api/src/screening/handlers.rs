//! Axum route handler for the Screening API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::screening::extract::extract_pdf_text_blocking;
use crate::screening::intake::{candidate_name, ScreeningRequest};
use crate::screening::models::{rank_candidates, CandidateRecord, ExtractedDocument};
use crate::screening::qualities::normalize_qualities;
use crate::screening::scoring::CandidateScorer;
use crate::state::AppState;

const REASON_LOG_CHARS: usize = 200;

/// POST /api/screen
///
/// Multipart form: one or more `files` (PDF) and a `qualities` text field.
/// Returns candidates sorted best → worst.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<CandidateRecord>>, AppError> {
    let request = ScreeningRequest::from_multipart(multipart?).await?;
    request.validate()?;

    let records = screen_candidates(state.scorer.as_ref(), request).await?;
    Ok(Json(records))
}

/// Extracts and scores each file in upload order, then ranks the batch.
/// Expects an already validated request.
pub async fn screen_candidates(
    scorer: &dyn CandidateScorer,
    request: ScreeningRequest,
) -> Result<Vec<CandidateRecord>, AppError> {
    info!(
        "Screening {} candidates for qualities:\n{}",
        request.files.len(),
        request.qualities
    );

    let qualities = normalize_qualities(&request.qualities);
    let mut records = Vec::with_capacity(request.files.len());

    for file in request.files {
        let document = ExtractedDocument {
            name: candidate_name(&file.filename),
            text: extract_pdf_text_blocking(file.content).await,
        };
        info!(
            "Parsed {} chars from '{}'",
            document.char_count(),
            document.name
        );

        let result = scorer
            .score(&document.name, &qualities, &document.text)
            .await?;
        let reason: String = result.reason.chars().take(REASON_LOG_CHARS).collect();
        info!(
            "[{}] score={} mode={} reason={}",
            document.name,
            result.score,
            result.mode.as_str(),
            reason
        );

        records.push(CandidateRecord::new(&document, result.score));
    }

    rank_candidates(&mut records);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::intake::UploadedFile;
    use crate::screening::models::{ScoreMode, ScoreResult};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Scores by looking the candidate name up in a fixed table.
    struct TableScorer {
        scores: Vec<(&'static str, f64)>,
        seen_qualities: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CandidateScorer for TableScorer {
        async fn score(
            &self,
            candidate_name: &str,
            qualities: &str,
            _text: &str,
        ) -> Result<ScoreResult, AppError> {
            self.seen_qualities
                .lock()
                .unwrap()
                .push(qualities.to_string());
            let score = self
                .scores
                .iter()
                .find(|(name, _)| *name == candidate_name)
                .map(|(_, s)| *s)
                .unwrap_or(0.0);
            Ok(ScoreResult {
                score,
                reason: "table".to_string(),
                mode: ScoreMode::Mock,
            })
        }

        fn backend(&self) -> &'static str {
            "table"
        }
    }

    fn request(files: &[&str], qualities: &str) -> ScreeningRequest {
        ScreeningRequest {
            files: files
                .iter()
                .map(|f| UploadedFile {
                    filename: f.to_string(),
                    content: Bytes::from_static(b"not a real pdf"),
                })
                .collect(),
            qualities: qualities.to_string(),
        }
    }

    #[tokio::test]
    async fn test_higher_score_listed_first() {
        let scorer = TableScorer {
            scores: vec![("bob", 40.0), ("alice", 90.0)],
            seen_qualities: Mutex::new(Vec::new()),
        };

        let records = screen_candidates(&scorer, request(&["bob.pdf", "alice.pdf"], "Rust"))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "alice");
        assert_eq!(records[0].score, 90.0);
        assert_eq!(records[1].name, "bob");
    }

    #[tokio::test]
    async fn test_unreadable_documents_are_still_scored() {
        let scorer = TableScorer {
            scores: vec![("carol", 55.0)],
            seen_qualities: Mutex::new(Vec::new()),
        };

        let records = screen_candidates(&scorer, request(&["carol.pdf"], "Rust"))
            .await
            .unwrap();

        assert_eq!(records[0].score, 55.0);
        assert_eq!(
            records[0].id,
            crate::screening::models::candidate_id("carol", 0)
        );
    }

    #[tokio::test]
    async fn test_scorer_receives_bulleted_qualities() {
        let scorer = TableScorer {
            scores: vec![],
            seen_qualities: Mutex::new(Vec::new()),
        };

        screen_candidates(&scorer, request(&["a.pdf"], "Rust\n\n  Go  "))
            .await
            .unwrap();

        assert_eq!(
            scorer.seen_qualities.lock().unwrap().as_slice(),
            ["- Rust\n- Go".to_string()]
        );
    }
}
