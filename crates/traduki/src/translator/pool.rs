//! Lexicon pool: two directional word lexicons for the de/en pair, loaded
//! from disk once per process and shared across workers.
//!
//! Each model is a TSV file (`source<TAB>target`, one entry per line,
//! lowercase sources). Loading is best-effort: a missing or unreadable
//! directory makes the backend report unavailable, which a
//! [`FallbackChain`](super::FallbackChain) turns into a hand-off to the
//! rule dictionary.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::{rewrite_tokens, TranslateError, Translator};

struct LexiconModels {
    de_en: HashMap<String, String>,
    en_de: HashMap<String, String>,
}

pub struct LexiconPool {
    dir: Option<PathBuf>,
    models: OnceLock<Option<LexiconModels>>,
}

impl LexiconPool {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            models: OnceLock::new(),
        }
    }

    fn models(&self) -> Option<&LexiconModels> {
        self.models
            .get_or_init(|| {
                let dir = self.dir.as_deref()?;
                match load_models(dir) {
                    Ok(models) => {
                        tracing::info!(
                            dir = %dir.display(),
                            de_en = models.de_en.len(),
                            en_de = models.en_de.len(),
                            "Loaded lexicon models"
                        );
                        Some(models)
                    }
                    Err(e) => {
                        tracing::warn!(dir = %dir.display(), error = %e, "Lexicon models unavailable");
                        None
                    }
                }
            })
            .as_ref()
    }
}

fn load_models(dir: &Path) -> std::io::Result<LexiconModels> {
    Ok(LexiconModels {
        de_en: load_lexicon(&dir.join("de-en.tsv"))?,
        en_de: load_lexicon(&dir.join("en-de.tsv"))?,
    })
}

fn load_lexicon(path: &Path) -> std::io::Result<HashMap<String, String>> {
    let raw = fs::read_to_string(path)?;
    let mut map = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((source, target)) = line.split_once('\t') {
            let source = source.trim().to_lowercase();
            if !source.is_empty() {
                map.insert(source, target.trim().to_string());
            }
        }
    }
    Ok(map)
}

impl Translator for LexiconPool {
    fn name(&self) -> &'static str {
        "lexicon-pool"
    }

    fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let models = self.models().ok_or_else(|| {
            TranslateError::BackendUnavailable("lexicon models not loaded".to_string())
        })?;
        let map = if target_lang.starts_with("de") {
            &models.en_de
        } else {
            &models.de_en
        };
        Ok(rewrite_tokens(text, |token| map.get(token).cloned()))
    }
}
