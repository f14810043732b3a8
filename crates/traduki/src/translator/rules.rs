//! Rule-based bilingual dictionary. The terminal fallback: it never fails,
//! it just leaves unknown tokens untouched.

use std::collections::HashMap;

use super::{rewrite_tokens, TranslateError, Translator};

/// Fixed German/English term pairs. Both spellings of "Übersetzung" are
/// listed so ASCII-transliterated input still matches.
const DE_EN: &[(&str, &str)] = &[
    ("hallo", "hello"),
    ("angebot", "quote"),
    ("beglaubigt", "certified"),
    ("medizin", "medical"),
    ("übersetzung", "translation"),
    ("uebersetzung", "translation"),
    ("dokument", "document"),
    ("kontakt", "contact"),
];

pub struct RuleTranslator {
    de_en: HashMap<&'static str, &'static str>,
    en_de: HashMap<&'static str, &'static str>,
}

impl RuleTranslator {
    pub fn new() -> Self {
        let de_en: HashMap<_, _> = DE_EN.iter().copied().collect();
        // Reversed map; where two source spellings share a target, the
        // later pair wins.
        let en_de: HashMap<_, _> = DE_EN.iter().map(|&(de, en)| (en, de)).collect();
        Self { de_en, en_de }
    }

    fn map_for(&self, target_lang: &str) -> &HashMap<&'static str, &'static str> {
        if target_lang.starts_with("de") {
            &self.en_de
        } else {
            &self.de_en
        }
    }
}

impl Default for RuleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for RuleTranslator {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let map = self.map_for(target_lang);
        Ok(rewrite_tokens(text, |token| {
            map.get(token).map(|t| (*t).to_string())
        }))
    }
}
