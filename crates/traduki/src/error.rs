use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradukiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Intake rejected: {0}")]
    Intake(#[from] IntakeError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Store error: {0}")]
    Store(#[from] crate::job::store::StoreError),

    #[error("Translation error: {0}")]
    Translate(#[from] crate::translator::TranslateError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Service error: {0}")]
    Service(#[from] crate::service::ServiceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Errors converting uploaded bytes into plain text.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file extension: '{0}'")]
    UnsupportedFormat(String),

    #[error("Corrupt {format} content: {reason}")]
    Corrupt {
        format: &'static str,
        reason: String,
    },
}

/// Rejections raised before any job exists.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("No text or file provided")]
    Empty,

    #[error("Provide either pasted text or a file, not both")]
    BothSources,

    #[error("Unsupported file extension: '{0}' (allowed: txt, pdf, docx)")]
    UnsupportedExtension(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, TradukiError>;
