//! Translation backends behind a single [`Translator`] contract.
//!
//! Three interchangeable variants: a rule-based bilingual dictionary that
//! never fails, a preloaded lexicon pool for one language pair, and a
//! remote HTTP API. Backends are composed into a [`FallbackChain`]: each
//! variant may fail into the next, and chains that include the rule-based
//! variant as their last entry are total.

pub mod detect;
pub mod pool;
pub mod remote;
pub mod rules;

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::{TranslatorBackend, TranslatorConfig};

pub use detect::resolve_direction;
pub use pool::LexiconPool;
pub use remote::RemoteTranslator;
pub use rules::RuleTranslator;

#[derive(Error, Debug)]
pub enum TranslateError {
    /// The backend cannot run at all (models missing, endpoint unreachable).
    #[error("Translation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The remote service answered but refused or garbled the request.
    #[error("Remote translation error: {0}")]
    Remote(String),
}

/// One translation backend. Implementations must be safe to share across
/// worker threads.
pub trait Translator: Send + Sync {
    fn name(&self) -> &'static str;

    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"\w+").unwrap_or_else(|e| panic!("word regex: {e}")))
}

/// Rewrites word tokens through `lookup`, leaving every separator byte in
/// place. Tokens are matched case-insensitively; misses pass through
/// verbatim.
pub(crate) fn rewrite_tokens<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in word_regex().find_iter(text) {
        out.push_str(&text[last..m.start()]);
        match lookup(&m.as_str().to_lowercase()) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// An ordered list of backends tried in sequence. A failing variant is
/// logged and the next one takes over; the last variant's error is the
/// chain's error.
pub struct FallbackChain {
    variants: Vec<Box<dyn Translator>>,
}

impl FallbackChain {
    pub fn new(variants: Vec<Box<dyn Translator>>) -> Self {
        Self { variants }
    }

    /// Builds the chain the configuration asks for.
    ///
    /// The lexicon backend falls back to the rule dictionary, so local
    /// translation always produces a result. The remote backend stands
    /// alone: its failures must reach the job record, not be papered over.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslateError> {
        let variants: Vec<Box<dyn Translator>> = match config.backend {
            TranslatorBackend::Rules => vec![Box::new(RuleTranslator::new())],
            TranslatorBackend::Lexicon => vec![
                Box::new(LexiconPool::new(config.lexicon_dir.clone())),
                Box::new(RuleTranslator::new()),
            ],
            TranslatorBackend::Remote => vec![Box::new(RemoteTranslator::from_config(config)?)],
        };
        Ok(Self::new(variants))
    }
}

impl Translator for FallbackChain {
    fn name(&self) -> &'static str {
        "fallback-chain"
    }

    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let mut last_err = TranslateError::BackendUnavailable("no backends configured".into());
        for variant in &self.variants {
            match variant.translate(text, source_lang, target_lang) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(
                        backend = variant.name(),
                        error = %e,
                        "Translation backend failed, trying next"
                    );
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}
