use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite database path. `None` falls back to `db::default_database_path`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Shared secret gating administrative operations.
    #[serde(default = "default_admin_token")]
    pub admin_token: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Default source language when a request does not carry one.
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    /// Default target language when a request does not carry one.
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

fn default_admin_token() -> String {
    "dev-secret".to_string()
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_source_lang() -> String {
    "de".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            admin_token: default_admin_token(),
            worker_count: default_worker_count(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            translator: TranslatorConfig::default(),
        }
    }
}

/// Which translation backend the pipeline uses. The lexicon pool and the
/// rule-based dictionary form an explicit fallback chain; the remote
/// backend surfaces its failures to the pipeline instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorBackend {
    Rules,
    Lexicon,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_backend")]
    pub backend: TranslatorBackend,
    /// Endpoint of the remote translation API (remote backend only).
    #[serde(default)]
    pub api_url: String,
    /// API key for the remote backend. Absent keys degrade to a visible
    /// placeholder translation rather than a failure.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory holding the directional lexicon models (lexicon backend).
    #[serde(default)]
    pub lexicon_dir: Option<PathBuf>,
}

fn default_backend() -> TranslatorBackend {
    TranslatorBackend::Rules
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: String::new(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            lexicon_dir: None,
        }
    }
}
