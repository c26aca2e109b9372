//! Text extraction
//!
//! Trait seam between the batch pipeline and the PDF parsing backend,
//! so the pipeline can be exercised against plain-text doubles in tests.

mod pdf;

pub use pdf::PdfTextExtractor;

pub use async_trait::async_trait;
use thiserror::Error;

/// Error type for text extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes were not a parseable document
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// The blocking extraction task died
    #[error("Extraction task failed: {0}")]
    TaskJoin(String),
}

/// Extracts the plain text of a document from its raw bytes.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Return the concatenation, in page order, of each page's extracted
    /// text. No separator is guaranteed between pages.
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError>;
}
