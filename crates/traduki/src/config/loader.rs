use std::path::Path;

use crate::config::schema::{Config, TranslatorBackend};
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.worker_count == 0 {
        return Err(ConfigError::Validation {
            message: "worker_count must be at least 1".to_string(),
        });
    }

    if config.source_lang.is_empty() || config.target_lang.is_empty() {
        return Err(ConfigError::Validation {
            message: "source_lang and target_lang must not be empty".to_string(),
        });
    }

    if config.translator.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "translator.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.translator.backend == TranslatorBackend::Remote && config.translator.api_url.is_empty()
    {
        return Err(ConfigError::Validation {
            message: "translator.api_url is required for the remote backend".to_string(),
        });
    }

    Ok(())
}
