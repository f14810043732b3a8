use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;
use crate::extract::{SourceFormat, TextExtractor};

/// Word-processor extractor: unzips the document container and pulls the
/// paragraph text runs out of `word/document.xml`, one line per paragraph.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn corrupt(reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::Corrupt {
        format: "docx",
        reason: reason.to_string(),
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| corrupt(format!("Failed to open DOCX archive: {}", e)))?;

        let mut document_xml = archive
            .by_name("word/document.xml")
            .map_err(|e| corrupt(format!("Failed to find document.xml: {}", e)))?;

        let mut xml_content = String::new();
        document_xml
            .read_to_string(&mut xml_content)
            .map_err(|e| corrupt(format!("Failed to read document.xml: {}", e)))?;

        parse_docx_xml(&xml_content)
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Docx)
    }
}

fn parse_docx_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let decoded = e.unescape().unwrap_or_default();
                    current.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(corrupt(format!("XML parsing error: {}", e)));
            }
            _ => {}
        }
    }

    // Text runs outside a closed paragraph still count.
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const SIMPLE_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>Erster Absatz</w:t></w:r></w:p>
                <w:p><w:r><w:t>Zweiter Absatz</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

    #[test]
    fn test_paragraphs_newline_separated_in_order() {
        let bytes = docx_bytes(SIMPLE_DOC);
        let extractor = DocxExtractor::new();
        let text = extractor.extract(&bytes).unwrap();
        // Newline between paragraphs, none after the last.
        assert_eq!(text, "Erster Absatz\nZweiter Absatz");
    }

    #[test]
    fn test_escaped_entities_decoded() {
        let xml = r#"<w:document xmlns:w="ns">
            <w:body><w:p><w:r><w:t>Meier &amp; S&#246;hne &lt;GmbH&gt;</w:t></w:r></w:p></w:body>
        </w:document>"#;
        assert_eq!(parse_docx_xml(xml).unwrap(), "Meier & Söhne <GmbH>");
    }

    #[test]
    fn test_multiple_runs_in_one_paragraph() {
        let xml = r#"<w:document xmlns:w="ns">
            <w:body><w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>World</w:t></w:r></w:p></w:body>
        </w:document>"#;
        let text = parse_docx_xml(xml).unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
    }

    #[test]
    fn test_not_a_zip_is_corrupt() {
        let extractor = DocxExtractor::new();
        let result = extractor.extract(b"definitely not a zip file");
        assert!(matches!(result, Err(ExtractError::Corrupt { format: "docx", .. })));
    }

    #[test]
    fn test_zip_without_document_xml_is_corrupt() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("unrelated.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nope").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let extractor = DocxExtractor::new();
        let result = extractor.extract(&bytes);
        assert!(matches!(result, Err(ExtractError::Corrupt { .. })));
    }

    #[test]
    fn test_supports_only_docx() {
        let extractor = DocxExtractor::new();
        assert!(extractor.supports(SourceFormat::Docx));
        assert!(!extractor.supports(SourceFormat::Txt));
        assert!(!extractor.supports(SourceFormat::Pdf));
    }
}
