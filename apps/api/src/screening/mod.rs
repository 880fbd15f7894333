// Candidate screening: intake → text extraction → scoring → ranking.
// All model calls go through llm_client via the CandidateScorer trait.

pub mod extract;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod prompts;
pub mod qualities;
pub mod scoring;
pub mod verdict;
