//! Reading and validating the multipart screening form.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Multipart field carrying a résumé document. May repeat.
pub const FILES_FIELD: &str = "files";
/// Multipart field carrying the desired qualities, one per line.
pub const QUALITIES_FIELD: &str = "qualities";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct ScreeningRequest {
    pub files: Vec<UploadedFile>,
    pub qualities: String,
}

impl ScreeningRequest {
    /// Collects `files` parts in upload order and the `qualities` text.
    /// Unknown fields are ignored. Field read errors map through `AppError::from`.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut request = ScreeningRequest::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(str::to_owned);
            match field_name.as_deref() {
                Some(FILES_FIELD) => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content = field.bytes().await?;
                    request.files.push(UploadedFile { filename, content });
                }
                Some(QUALITIES_FIELD) => {
                    request.qualities = field.text().await?;
                }
                _ => {}
            }
        }

        Ok(request)
    }

    /// Rejects the batch before any document is read or scored.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.files.is_empty() {
            return Err(AppError::Validation("No files uploaded.".to_string()));
        }
        if self.qualities.trim().is_empty() {
            return Err(AppError::Validation("Qualities are required.".to_string()));
        }
        if let Some(file) = self.files.iter().find(|f| !is_pdf_filename(&f.filename)) {
            return Err(AppError::Validation(format!(
                "Only PDFs allowed: {}",
                file.filename
            )));
        }
        Ok(())
    }
}

pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Candidate display name: the upload's basename without its extension.
pub fn candidate_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rfind('.') {
        // a name made only of leading dots has no extension
        Some(i) if base[..i].chars().any(|c| c != '.') => base[..i].to_string(),
        _ => base.to_string(),
    }
}
