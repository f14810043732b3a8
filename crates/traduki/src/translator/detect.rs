//! Language detection over a bounded prefix of the input.
//!
//! Used to pick the direction for the local de/en pair: if the text is
//! already in the requested target language, the direction is flipped so
//! translation is never a no-op. Detection that fails or is unreliable
//! leaves the requested direction unchanged.

use whatlang::Lang;

/// Detection reads at most this many characters.
const DETECT_PREFIX_CHARS: usize = 5000;

/// Returns the dominant language of `text` as an ISO 639-1 code, or `None`
/// when the text is too short or ambiguous to classify confidently.
pub fn detect_lang(text: &str) -> Option<&'static str> {
    let prefix: String = text.chars().take(DETECT_PREFIX_CHARS).collect();
    let info = whatlang::detect(&prefix)?;
    if !info.is_reliable() {
        return None;
    }
    lang_to_code(info.lang())
}

fn lang_to_code(lang: Lang) -> Option<&'static str> {
    match lang {
        Lang::Deu => Some("de"),
        Lang::Eng => Some("en"),
        Lang::Fra => Some("fr"),
        Lang::Spa => Some("es"),
        Lang::Ita => Some("it"),
        Lang::Por => Some("pt"),
        Lang::Nld => Some("nl"),
        Lang::Pol => Some("pl"),
        Lang::Rus => Some("ru"),
        _ => None,
    }
}

/// Resolves the effective direction for one job. When the detected language
/// equals the requested target, source and target swap.
pub fn resolve_direction(
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> (String, String) {
    match detect_lang(text) {
        Some(detected) if detected == target_lang => {
            tracing::debug!(detected, "Input already in target language, flipping direction");
            (target_lang.to_string(), source_lang.to_string())
        }
        _ => (source_lang.to_string(), target_lang.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GERMAN: &str = "Die Vertragsparteien vereinbaren hiermit, dass alle Dokumente \
                          vor der Unterzeichnung beglaubigt und übersetzt werden müssen.";
    const ENGLISH: &str = "The contracting parties hereby agree that all documents \
                           must be certified and translated before signing.";

    #[test]
    fn test_detects_german() {
        assert_eq!(detect_lang(GERMAN), Some("de"));
    }

    #[test]
    fn test_detects_english() {
        assert_eq!(detect_lang(ENGLISH), Some("en"));
    }

    #[test]
    fn test_short_text_is_unknown() {
        assert_eq!(detect_lang(""), None);
    }

    #[test]
    fn test_direction_kept_when_source_matches() {
        let (src, tgt) = resolve_direction(GERMAN, "de", "en");
        assert_eq!((src.as_str(), tgt.as_str()), ("de", "en"));
    }

    #[test]
    fn test_direction_flipped_when_already_target() {
        let (src, tgt) = resolve_direction(ENGLISH, "de", "en");
        assert_eq!((src.as_str(), tgt.as_str()), ("en", "de"));
    }

    #[test]
    fn test_unknown_detection_keeps_direction() {
        let (src, tgt) = resolve_direction("xyz 123", "de", "en");
        assert_eq!((src.as_str(), tgt.as_str()), ("de", "en"));
    }
}
