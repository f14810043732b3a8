pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod glossary;
pub mod job;
pub mod pipeline;
pub mod pricing;
pub mod service;
pub mod translator;
pub mod worker;

pub use config::{load_config, load_config_from_str, Config, TranslatorBackend, TranslatorConfig};
pub use error::{ConfigError, ExtractError, IntakeError, Result, TradukiError, WorkerError};
pub use extract::ExtractorRegistry;
pub use glossary::Glossary;
pub use job::store::{JobStore, StoreError};
pub use job::{AuditKind, Domain, IntakeUnit, JobMeta, JobStatus};
pub use pipeline::{Pipeline, PipelineError};
pub use service::{
    AuditEventSnapshot, DownloadArtifact, FileUpload, IntakeRequest, JobSnapshot, ServiceError,
    TranslationService,
};
pub use translator::{FallbackChain, TranslateError, Translator};
pub use worker::{WorkItem, WorkOutcome, WorkerPool};
