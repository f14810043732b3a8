use crate::error::ExtractError;
use crate::extract::{SourceFormat, TextExtractor};

/// Plain-text extractor. Decodes permissively: invalid UTF-8 sequences
/// become replacement characters instead of failing the upload.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Txt)
    }
}
