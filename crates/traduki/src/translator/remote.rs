//! Remote HTTP translation backend.
//!
//! Speaks a LibreTranslate-style API: `POST {q, source, target, format}`
//! with a bearer key, answered by `{"translatedText": ...}`. A missing key
//! is a deployment gap, not a job failure: the backend returns a clearly
//! marked placeholder embedding the original text so no content is lost.

use std::time::Duration;

use serde::Deserialize;

use crate::config::TranslatorConfig;

use super::{TranslateError, Translator};

#[derive(Deserialize)]
struct RemoteResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

pub struct RemoteTranslator {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: Option<String>,
}

impl RemoteTranslator {
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::BackendUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }
}

impl Translator for RemoteTranslator {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("No API key configured, returning placeholder translation");
            return Ok(format!(
                "[untranslated {}->{}] {}",
                source_lang, target_lang, text
            ));
        };

        let body = serde_json::json!({
            "q": text,
            "source": source_lang,
            "target": target_lang,
            "format": "text",
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    TranslateError::BackendUnavailable(e.to_string())
                } else {
                    TranslateError::Remote(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect::<String>();
            return Err(TranslateError::Remote(format!(
                "unexpected status {}: {}",
                status, detail
            )));
        }

        let parsed: RemoteResponse = response
            .json()
            .map_err(|e| TranslateError::Remote(format!("malformed response body: {}", e)))?;
        Ok(parsed.translated_text)
    }
}
