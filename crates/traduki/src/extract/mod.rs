pub mod docx;
pub mod pdf;
pub mod text;

use crate::error::ExtractError;

/// Source formats accepted at the intake boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Txt,
    Docx,
    Pdf,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Returns the extension of a declared filename, without the dot.
/// A name without a dot yields an empty string.
pub fn extension_of(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
    fn supports(&self, format: SourceFormat) -> bool;
}

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(text::PlainTextExtractor::new()),
                Box::new(docx::DocxExtractor::new()),
                Box::new(pdf::PdfExtractor::new()),
            ],
        }
    }

    /// Extracts plain text from uploaded bytes. The declared extension is
    /// checked before any byte is inspected.
    pub fn extract(&self, bytes: &[u8], declared_filename: &str) -> Result<String, ExtractError> {
        let ext = extension_of(declared_filename);
        let format = SourceFormat::from_extension(ext)
            .ok_or_else(|| ExtractError::UnsupportedFormat(ext.to_string()))?;

        for extractor in &self.extractors {
            if extractor.supports(format) {
                return extractor.extract(bytes);
            }
        }

        Err(ExtractError::UnsupportedFormat(ext.to_string()))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
