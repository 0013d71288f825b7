//! Document-to-text for uploaded resumes (PDF, DOCX, plain text).
//!
//! Failures are returned as `DocumentError`, never folded into the text.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Picks the format from the upload's file name; anything not `.pdf` or
    /// `.docx` is read as plain text.
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::PlainText
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Error reading DOCX: {0}")]
    Docx(String),

    #[error("Error reading text file: content is not valid UTF-8")]
    Encoding,

    #[error("Error reading document: no text could be extracted")]
    Empty,

    #[error("Error reading document: extraction task failed: {0}")]
    Worker(String),
}

/// Extracts text synchronously. Prefer `read_document` from async code.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, DocumentError> {
    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?,
        DocumentFormat::Docx => extract_docx_text(bytes)?,
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| DocumentError::Encoding)?,
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    debug!("Extracted {} chars from {:?} upload", text.len(), format);
    Ok(text)
}

/// Runs extraction on the blocking pool; PDF parsing is CPU-bound.
pub async fn read_document(bytes: Vec<u8>, format: DocumentFormat) -> Result<String, DocumentError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| DocumentError::Worker(e.to_string()))?
}

/// Top-level paragraphs joined by newlines.
fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = read_docx(bytes).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            _ => {}
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs.join("\n"))
}
