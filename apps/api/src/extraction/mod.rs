//! Text extraction for uploaded CVs (PDF, DOCX).
//!
//! Extraction is the only slow or failing step of a request. A failure is
//! terminal: the caller must not score an empty document.

mod docx;
mod pdf;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Document contains no extractable text")]
    NoText,

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
}

/// Declared document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    /// Resolves the format from a file name extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Synchronous extraction of raw text from document bytes.
///
/// Whitespace-only output is reported as `NoText`, never as an empty string.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes)?,
        DocumentFormat::Docx => docx::extract_docx(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text)
}

/// The extractor trait. Carried in `AppState` as `Arc<dyn TextExtractor>` so
/// handlers can be exercised without real documents.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Bytes, format: DocumentFormat)
        -> Result<String, ExtractionError>;
}

/// Runs `extract_text` on the blocking pool under a timeout.
pub struct BlockingTextExtractor {
    timeout: Duration,
}

impl BlockingTextExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TextExtractor for BlockingTextExtractor {
    async fn extract(
        &self,
        bytes: Bytes,
        format: DocumentFormat,
    ) -> Result<String, ExtractionError> {
        let size = bytes.len();
        let task = tokio::task::spawn_blocking(move || extract_text(&bytes, format));

        let text = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                warn!("Extraction task failed: {join_err}");
                return Err(match format {
                    DocumentFormat::Pdf => ExtractionError::Pdf(join_err.to_string()),
                    DocumentFormat::Docx => ExtractionError::Docx(join_err.to_string()),
                });
            }
            Err(_) => {
                warn!("Extraction of {size}-byte {} timed out", format.as_str());
                return Err(ExtractionError::Timeout(self.timeout));
            }
        };

        info!(
            "Extracted {} chars from {size}-byte {}",
            text.chars().count(),
            format.as_str()
        );
        Ok(text)
    }
}
