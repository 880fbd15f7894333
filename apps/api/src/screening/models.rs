use serde::Serialize;
use sha2::{Digest, Sha256};

/// Which path produced a score. Logged per candidate for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    Mock,
    /// Structured-output request accepted by the model service.
    JsonMode,
    /// Model service rejected structured output; reply requested as plain text.
    Plain,
}

impl ScoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreMode::Mock => "mock",
            ScoreMode::JsonMode => "json",
            ScoreMode::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64, // 0 – 100
    pub reason: String,
    pub mode: ScoreMode,
}

/// Text pulled out of one uploaded document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub name: String,
    pub text: String, // empty when extraction failed
}

impl ExtractedDocument {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One entry of the `/api/screen` response array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub url: Option<String>,
}

impl CandidateRecord {
    pub fn new(document: &ExtractedDocument, score: f64) -> Self {
        Self {
            id: candidate_id(&document.name, document.char_count()),
            name: document.name.clone(),
            score,
            url: None,
        }
    }
}

const ID_LEN: usize = 10;

/// Short hex fingerprint of name + text length. Only needs to tell candidates
/// apart within a single response.
pub fn candidate_id(name: &str, char_count: usize) -> String {
    let digest = Sha256::digest(format!("{name}:{char_count}").as_bytes());
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(ID_LEN)
        .collect()
}

/// Orders candidates best → worst. Ties keep upload order.
pub fn rank_candidates(records: &mut [CandidateRecord]) {
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: f64) -> CandidateRecord {
        CandidateRecord {
            id: candidate_id(name, 0),
            name: name.to_string(),
            score,
            url: None,
        }
    }

    #[test]
    fn test_candidate_id_is_ten_hex_chars() {
        let id = candidate_id("jane_doe", 1234);
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_candidate_id_stable_and_length_sensitive() {
        assert_eq!(candidate_id("jane", 10), candidate_id("jane", 10));
        assert_ne!(candidate_id("jane", 10), candidate_id("jane", 11));
        assert_ne!(candidate_id("jane", 10), candidate_id("john", 10));
    }

    #[test]
    fn test_record_counts_characters_not_bytes() {
        let doc = ExtractedDocument {
            name: "zoë".to_string(),
            text: "naïve".to_string(),
        };
        let rec = CandidateRecord::new(&doc, 70.0);
        assert_eq!(rec.id, candidate_id("zoë", 5));
        assert!(rec.url.is_none());
    }

    #[test]
    fn test_rank_puts_highest_first() {
        let mut records = vec![record("low", 40.0), record("high", 90.0)];
        rank_candidates(&mut records);
        assert_eq!(records[0].name, "high");
        assert_eq!(records[1].name, "low");
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let mut records = vec![record("a", 50.0), record("b", 75.0), record("c", 50.0)];
        rank_candidates(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_serializes_null_url() {
        let json = serde_json::to_value(record("a", 12.34)).unwrap();
        assert!(json["url"].is_null());
        assert_eq!(json["score"], 12.34);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(77.456), 77.46);
        assert_eq!(round2(10.0), 10.0);
    }
}
