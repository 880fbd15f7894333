//! Best-effort PDF text extraction.
//!
//! Primary: lopdf, page by page, so one broken page does not lose the rest.
//! Fallback: pdf-extract over the whole document when the primary pass comes
//! back empty. Both libraries can panic on hostile input; a panic counts as a
//! failed strategy. The result is never an error, only possibly empty.

use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

use bytes::Bytes;
use lopdf::Document;
use tracing::{debug, warn};

/// Extracts plain text from PDF bytes. Returns an empty string if nothing
/// could be read.
pub fn extract_pdf_text(content: &[u8]) -> String {
    extract_with(
        || extract_by_page(content),
        || pdf_extract::extract_text_from_mem(content).map(|t| t.trim().to_string()),
    )
}

/// Runs `primary`; only when it fails, panics or yields nothing is `fallback` tried.
fn extract_with<P, F, PE, FE>(primary: P, fallback: F) -> String
where
    P: FnOnce() -> Result<String, PE>,
    F: FnOnce() -> Result<String, FE>,
    PE: Display,
    FE: Display,
{
    let text = guarded("primary", primary).unwrap_or_default();
    if !text.is_empty() {
        return text;
    }

    guarded("fallback", fallback).unwrap_or_default()
}

/// Runs extraction on the blocking pool so PDF parsing never stalls the executor.
pub async fn extract_pdf_text_blocking(content: Bytes) -> String {
    tokio::task::spawn_blocking(move || extract_pdf_text(&content))
        .await
        .unwrap_or_else(|e| {
            warn!("PDF extraction task failed: {e}");
            String::new()
        })
}

fn extract_by_page(content: &[u8]) -> Result<String, lopdf::Error> {
    let doc = Document::load_mem(content)?;

    let parts: Vec<String> = doc
        .get_pages()
        .keys()
        .filter_map(|&page| match doc.extract_text(&[page]) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Skipping unreadable page {page}: {e}");
                None
            }
        })
        .collect();

    Ok(parts.join("\n").trim().to_string())
}

fn guarded<E: Display>(
    strategy: &str,
    extract: impl FnOnce() -> Result<String, E>,
) -> Option<String> {
    match catch_unwind(AssertUnwindSafe(extract)) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            debug!("{strategy} extraction failed: {e}");
            None
        }
        Err(_) => {
            warn!("{strategy} panicked while extracting text");
            None
        }
    }
}
