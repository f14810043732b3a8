use crate::error::ExtractError;
use crate::extract::{SourceFormat, TextExtractor};

/// PDF extractor: per-page text extraction in page order, newline-joined.
/// A page that fails extraction contributes an empty string instead of
/// aborting the whole document.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Corrupt {
            format: "pdf",
            reason: format!("Failed to load PDF: {}", e),
        })?;

        let mut pages: Vec<String> = Vec::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(page_text) => pages.push(page_text),
                Err(e) => {
                    tracing::warn!("Text extraction failed for page {}: {}", page_num, e);
                    pages.push(String::new());
                }
            }
        }

        Ok(pages.join("\n"))
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Pdf)
    }
}
