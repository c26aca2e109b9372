//! PDF text extraction via pdf-extract

use async_trait::async_trait;

use super::{ExtractError, TextExtractor};

/// Extracts the text layer of digital-native PDFs.
///
/// Scanned (image-only) documents yield little or no text; no OCR is
/// performed. Unparseable bytes are reported as `ExtractError::Parse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
        let data = data.to_vec();

        // PDF parsing is CPU-bound, keep it off the async workers
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ExtractError::Parse(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::TaskJoin(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_to_parse() {
        let result = PdfTextExtractor.extract_text(b"definitely not a pdf").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
